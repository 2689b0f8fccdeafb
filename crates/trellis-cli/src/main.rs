//! `trellis` - inspect the lifecycle event catalog and watch a simulated
//! renderer emit it.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod commands;
mod renderer;

/// Renderer lifecycle diagnostics
#[derive(Parser)]
#[command(name = "trellis", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Diagnostics configuration (TOML)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How results are printed
    #[arg(short = 'f', long, global = true, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Raise log verbosity on stderr (-v info, -vv debug incl. renderer records, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print results and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Output format options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text for terminals
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON
    JsonCompact,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the lifecycle event templates
    Catalog(commands::catalog::CatalogArgs),
    /// Check the event catalog and, if given, the configuration file
    Validate(commands::validate::ValidateArgs),
    /// Run a simulated component tree and print the records it emits
    Simulate(commands::simulate::SimulateArgs),
}

impl Cli {
    /// Log level for the `trellis` crates when `RUST_LOG` is unset.
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::ERROR;
        }
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    fn run(self) -> Result<()> {
        let config = self.config.as_deref();
        match self.command {
            Commands::Catalog(args) => commands::catalog::execute(args, self.format),
            Commands::Validate(args) => commands::validate::execute(args, config, self.format),
            Commands::Simulate(args) => {
                commands::simulate::execute(args, config, self.format, self.quiet)
            }
        }
    }
}

fn init_logging(level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("trellis={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let quiet = cli.quiet;
    if let Err(e) = cli.run() {
        if !quiet {
            eprintln!("Error: {e:#}");
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
