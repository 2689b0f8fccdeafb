//! Validate command - Validate the event catalog and configuration.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use trellis_core::{CATALOG, DiagnosticsConfig, Severity};

use crate::OutputFormat;
use crate::commands::print_json;

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Warn when the configuration keeps lifecycle events off
    #[arg(long)]
    pub strict: bool,
}

/// Validation result.
#[derive(Debug, Serialize)]
struct ValidationResult {
    valid: bool,
    templates: usize,
    config: Option<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
}

/// Execute the validate command.
pub fn execute(args: ValidateArgs, config: Option<&Path>, format: OutputFormat) -> Result<()> {
    let mut result = ValidationResult {
        valid: true,
        templates: CATALOG.len(),
        config: config.map(|path| path.display().to_string()),
        warnings: Vec::new(),
        errors: Vec::new(),
    };

    if let Err(e) = trellis::validate_catalog() {
        result.valid = false;
        result.errors.push(format!("Catalog: {}", e));
    }

    if let Some(path) = config {
        match DiagnosticsConfig::load(path) {
            Ok(loaded) => {
                if !loaded.enabled {
                    result
                        .warnings
                        .push("Diagnostics are disabled".to_string());
                } else if args.strict && loaded.min_severity > Severity::Detail {
                    result.warnings.push(format!(
                        "min_severity '{}' keeps lifecycle events (detail) off",
                        loaded.min_severity
                    ));
                }
            }
            Err(e) => {
                result.valid = false;
                result.errors.push(format!("Config: {}", e));
            }
        }
    }

    match format {
        OutputFormat::Human => {
            if result.valid {
                println!("Catalog is valid: {} templates", result.templates);
                if let Some(path) = &result.config {
                    println!("Config is valid: {}", path);
                }

                if !result.warnings.is_empty() {
                    println!("\nWarnings:");
                    for warning in &result.warnings {
                        println!("  - {}", warning);
                    }
                }
            } else {
                println!("Validation FAILED");
                for error in &result.errors {
                    println!("  Error: {}", error);
                }
            }
        }
        OutputFormat::Json | OutputFormat::JsonCompact => print_json(&result, format)?,
    }

    if result.valid {
        Ok(())
    } else {
        Err(anyhow::anyhow!("Validation failed"))
    }
}
