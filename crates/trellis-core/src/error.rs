//! Core error types for Trellis.
//!
//! Emitting diagnostics never fails the caller, so these errors only arise
//! while setting the layer up: validating the event catalog and loading
//! configuration.

use thiserror::Error;

use crate::catalog::EventId;

/// Errors found while validating the event catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Id 0 is reserved.
    #[error("Template '{name}' uses reserved id 0")]
    ZeroId {
        /// Stable name of the offending template.
        name: String,
    },

    /// Two templates share a numeric id.
    #[error("Duplicate event id {id}: '{first}' and '{second}'")]
    DuplicateId {
        /// The duplicated id.
        id: EventId,
        /// Kind of the first template using it.
        first: String,
        /// Kind of the second template using it.
        second: String,
    },

    /// A template has no stable name.
    #[error("Template {id} has an empty name")]
    EmptyName {
        /// The template id.
        id: EventId,
    },

    /// A message template has unbalanced or empty braces.
    #[error("Template {id} has a malformed message at byte {offset}")]
    MalformedMessage {
        /// The template id.
        id: EventId,
        /// Byte offset of the offending brace.
        offset: usize,
    },

    /// The message placeholders do not match the field schema.
    #[error("Template {id} placeholders [{placeholders}] do not match fields [{fields}]")]
    PlaceholderMismatch {
        /// The template id.
        id: EventId,
        /// Field names in schema order.
        fields: String,
        /// Placeholder names in message order.
        placeholders: String,
    },
}

/// Errors while loading diagnostics configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but holds an invalid value.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// IO error reading the configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for catalog operations.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
