//! Catalog command - List the lifecycle event catalog.

use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;

use trellis_core::{CATALOG, EventId, EventTemplate, catalog};

use crate::OutputFormat;
use crate::commands::print_json;

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Show only the template with this id
    #[arg(long)]
    pub id: Option<u16>,
}

#[derive(Debug, Serialize)]
struct TemplateDisplay {
    id: u16,
    kind: &'static str,
    name: &'static str,
    severity: &'static str,
    precheck: bool,
    fields: Vec<FieldDisplay>,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct FieldDisplay {
    name: &'static str,
    kind: &'static str,
}

impl From<&EventTemplate> for TemplateDisplay {
    fn from(template: &EventTemplate) -> Self {
        Self {
            id: template.id.get(),
            kind: template.kind.as_str(),
            name: template.name,
            severity: template.severity.as_str(),
            precheck: template.precheck,
            fields: template
                .fields
                .iter()
                .map(|field| FieldDisplay {
                    name: field.name,
                    kind: field.kind.as_str(),
                })
                .collect(),
            message: template.message,
        }
    }
}

/// Execute the catalog command.
pub fn execute(args: CatalogArgs, format: OutputFormat) -> Result<()> {
    let templates: Vec<TemplateDisplay> = match args.id {
        Some(id) => match catalog::by_id(EventId::new(id)) {
            Some(template) => vec![TemplateDisplay::from(template)],
            None => bail!("No event template with id {}", id),
        },
        None => CATALOG.iter().map(TemplateDisplay::from).collect(),
    };

    match format {
        OutputFormat::Human => {
            println!("Event templates ({}):", templates.len());
            for template in &templates {
                let fields: Vec<String> = template
                    .fields
                    .iter()
                    .map(|field| format!("{}: {}", field.name, field.kind))
                    .collect();
                println!();
                println!("  [{}] {}", template.id, template.kind);
                println!("      name:     {}", template.name);
                println!("      severity: {}", template.severity);
                println!(
                    "      gate:     {}",
                    if template.precheck { "checked" } else { "sink" }
                );
                println!("      fields:   {}", fields.join(", "));
                println!("      message:  {}", template.message);
            }
        }
        OutputFormat::Json | OutputFormat::JsonCompact => print_json(&templates, format)?,
    }

    Ok(())
}
