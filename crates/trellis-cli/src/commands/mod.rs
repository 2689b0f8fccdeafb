pub mod catalog;
pub mod simulate;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use trellis_core::DiagnosticsConfig;

use crate::OutputFormat;

/// Load the configuration file if one was given.
pub fn load_config(path: Option<&Path>) -> Result<Option<DiagnosticsConfig>> {
    path.map(|path| {
        DiagnosticsConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))
    })
    .transpose()
}

/// Print a value as JSON in the requested layout.
pub fn print_json<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let json = match format {
        OutputFormat::JsonCompact => serde_json::to_string(value)?,
        _ => serde_json::to_string_pretty(value)?,
    };
    println!("{}", json);
    Ok(())
}
