//! Simulate command - Drive a simulated component tree through its lifecycle.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use trellis::prelude::*;

use crate::OutputFormat;
use crate::commands::{load_config, print_json};
use crate::renderer::{ComponentKind, SimulatedRenderer, events};

/// Arguments for the simulate command.
#[derive(Args)]
pub struct SimulateArgs {
    /// Number of child components under the root
    #[arg(long, default_value = "2")]
    pub children: usize,

    /// Number of parameter update rounds
    #[arg(long, default_value = "1")]
    pub updates: usize,

    /// Number of inbound events to dispatch
    #[arg(long, default_value = "2")]
    pub events: usize,

    /// Turn diagnostics off (no records are produced)
    #[arg(long)]
    pub disabled: bool,

    /// Check the gate only for templates flagged for it
    #[arg(long)]
    pub per_template: bool,
}

#[derive(Debug, Serialize)]
struct RecordDisplay<'a> {
    #[serde(flatten)]
    record: &'a StructuredRecord,
    message: String,
}

#[derive(Debug, Serialize)]
struct SimulationReport<'a> {
    components: usize,
    records: Vec<RecordDisplay<'a>>,
    dropped: usize,
}

/// Execute the simulate command.
pub fn execute(
    args: SimulateArgs,
    config: Option<&Path>,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let mut config = load_config(config)?.unwrap_or_else(DiagnosticsConfig::verbose);
    if args.disabled {
        config.enabled = false;
    }
    if args.per_template {
        config.dispatch_policy = DispatchPolicy::PerTemplate;
    }

    let diagnostics = Trellis::builder()
        .with_config(config)
        .with_capture()
        .build()
        .context("Failed to configure diagnostics")?;

    if !quiet {
        tracing::info!(
            children = args.children,
            updates = args.updates,
            events = args.events,
            "Simulating component tree"
        );
    }

    let mut renderer = SimulatedRenderer::new(diagnostics.log());
    let root = renderer.attach_root(ComponentKind::App)?;
    let mut children = Vec::with_capacity(args.children);
    for i in 0..args.children {
        let kind = if i % 2 == 0 {
            ComponentKind::Counter
        } else {
            ComponentKind::TodoList
        };
        children.push(renderer.attach_child(root, kind)?);
    }
    let components = renderer.live_count();

    for _ in 0..args.updates {
        for child in &children {
            renderer.set_parameters(*child)?;
        }
    }

    for n in 0..args.events {
        let target = if children.is_empty() {
            root
        } else {
            children[n % children.len()]
        };
        let handler_id = n as u64 + 1;
        match n % 3 {
            0 => {
                let click = events::MouseEventArgs { x: 10, y: 20 };
                renderer.dispatch_event(handler_id, Some(&click), target)?;
            }
            1 => {
                let change = events::ChangeEventArgs {
                    value: format!("item {}", n),
                };
                renderer.dispatch_event(handler_id, Some(&change), target)?;
            }
            _ => renderer.dispatch_event(handler_id, None, target)?,
        }
    }

    renderer.dispose(root)?;

    let captured = diagnostics
        .capture()
        .map(|capture| (capture.records(), capture.dropped()))
        .unwrap_or_default();
    let (records, dropped) = &captured;

    match format {
        OutputFormat::Human => {
            if !quiet {
                println!(
                    "Simulated {} components: {} records ({} dropped)",
                    components,
                    records.len(),
                    dropped
                );
                println!();
            }
            for record in records {
                println!(
                    "{:>2}  {:<28} {}",
                    record.id().get(),
                    record.name(),
                    record.message()
                );
            }
        }
        OutputFormat::Json | OutputFormat::JsonCompact => {
            let report = SimulationReport {
                components,
                records: records
                    .iter()
                    .map(|record| RecordDisplay {
                        record,
                        message: record.message(),
                    })
                    .collect(),
                dropped: *dropped,
            };
            print_json(&report, format)?;
        }
    }

    Ok(())
}
