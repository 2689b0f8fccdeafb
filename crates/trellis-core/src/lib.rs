//! Trellis Core - Renderer Lifecycle Event Catalog
//!
//! This crate holds the pure data side of Trellis, the diagnostics layer for
//! component-tree renderers. It includes:
//!
//! - [`EventTemplate`] and the static [`CATALOG`]: the versioned vocabulary
//!   of lifecycle events
//! - [`ComponentIdentity`] and [`EventPayload`]: what the renderer lends to
//!   each lifecycle call
//! - [`StructuredRecord`]: the record produced when a template is bound
//! - [`DiagnosticsConfig`]: severity and gate policy settings
//!
//! # Quick Start
//!
//! ```
//! use trellis_core::prelude::*;
//!
//! catalog::validate().unwrap();
//!
//! let counter = ComponentRef::new(4u32, "app::Counter");
//! let record = EventKind::RenderingComponent.template().bind([
//!     FieldValue::from(counter.component_id()),
//!     FieldValue::from(counter.component_type()),
//! ]);
//!
//! assert_eq!(record.message(), "Rendering component 4 of type app::Counter");
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │                Renderer                 │
//! ├─────────────────────────────────────────┤
//! │           trellis (facade)              │
//! ├─────────────────────────────────────────┤
//! │  trellis-core  │  trellis-observe       │
//! ├─────────────────────────────────────────┤
//! │        tracing / custom sinks           │
//! └─────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod record;
pub mod severity;

// Re-export main types at crate root
pub use catalog::{CATALOG, EventId, EventKind, EventTemplate, FieldKind, FieldSpec};
pub use config::{DiagnosticsConfig, DispatchPolicy};
pub use error::{CatalogError, CatalogResult, ConfigError, ConfigResult};
pub use identity::{ComponentId, ComponentIdentity, ComponentRef, EventPayload, TypeDescriptor};
pub use record::{Field, FieldValue, NULL_TEXT, StructuredRecord};
pub use severity::Severity;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use trellis_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::catalog::{self, EventId, EventKind, EventTemplate};
    pub use crate::config::{DiagnosticsConfig, DispatchPolicy};
    pub use crate::error::{CatalogError, ConfigError};
    pub use crate::identity::{
        ComponentId, ComponentIdentity, ComponentRef, EventPayload, TypeDescriptor,
    };
    pub use crate::record::{FieldValue, StructuredRecord};
    pub use crate::severity::Severity;
}
