//! # Trellis - Renderer Lifecycle Diagnostics
//!
//! Trellis records every lifecycle transition of every component in a
//! component-tree renderer as a structured, strongly-typed record, while
//! costing a single branch when diagnostics are off and never changing what
//! the renderer does.
//!
//! ## Features
//!
//! - **Fixed catalog**: nine templates with durable numeric ids
//! - **Cheap gate**: type descriptors are only resolved once a record is wanted
//! - **Non-failing**: sink errors and panics never reach the renderer
//! - **Pluggable sinks**: `tracing`, in-memory capture, or your own
//!
//! ## Quick Start
//!
//! ```
//! use trellis::prelude::*;
//!
//! let diagnostics = Trellis::builder()
//!     .with_min_severity(Severity::Detail)
//!     .with_capture()
//!     .build()?;
//!
//! let app = ComponentRef::new(1u32, "app::App");
//! let log = diagnostics.log();
//! log.initializing_component(&app, None);
//! log.rendering_component(&app);
//!
//! let captured = diagnostics.capture().unwrap().records();
//! assert_eq!(captured.len(), 2);
//! # Ok::<(), trellis::TrellisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Your Renderer                      │
//! ├─────────────────────────────────────────────────────────┤
//! │                    trellis (facade)                     │
//! │                  ┌──────────────────┐                   │
//! │                  │ Trellis Builder  │                   │
//! │                  └────────┬─────────┘                   │
//! │                           │                             │
//! │  ┌────────────────────────┴─────┬───────────────────┐   │
//! │  │ trellis-core                 │ trellis-observe   │   │
//! │  │ (catalog, records, config)   │ (entry points,    │   │
//! │  │                              │  sinks)           │   │
//! │  └──────────────────────────────┴───────────────────┘   │
//! ├─────────────────────────────────────────────────────────┤
//! │                  tracing / custom sinks                 │
//! └─────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, OnceLock};

use trellis_core::{CatalogError, ConfigError, DiagnosticsConfig, DispatchPolicy, Severity};
use trellis_observe::{
    CollectingSink, DiagnosticSink, NullSink, RendererLog, SinkFanout, TracingSink,
};

// Re-export from sub-crates
pub use trellis_core;
pub use trellis_observe;

/// Validate the built-in catalog once per process.
pub fn validate_catalog() -> std::result::Result<(), CatalogError> {
    static CHECKED: OnceLock<std::result::Result<(), CatalogError>> = OnceLock::new();
    CHECKED
        .get_or_init(|| {
            let outcome = trellis_core::catalog::validate();
            match &outcome {
                Ok(()) => tracing::debug!(
                    templates = trellis_core::CATALOG.len(),
                    "Event catalog validated"
                ),
                Err(err) => tracing::error!(error = %err, "Event catalog is invalid"),
            }
            outcome
        })
        .clone()
}

/// Main entry point for Trellis.
pub struct Trellis;

impl Trellis {
    /// Create a new diagnostics builder.
    pub fn builder() -> TrellisBuilder {
        TrellisBuilder::new()
    }
}

/// Builder for configuring renderer diagnostics.
pub struct TrellisBuilder {
    config: DiagnosticsConfig,
    tracing: bool,
    capture: bool,
    sinks: Vec<Arc<dyn DiagnosticSink>>,
}

impl TrellisBuilder {
    /// Create a new builder with default configuration.
    ///
    /// Records go to `tracing` unless [`with_tracing`](Self::with_tracing)
    /// turns that off.
    pub fn new() -> Self {
        Self {
            config: DiagnosticsConfig::default(),
            tracing: true,
            capture: false,
            sinks: Vec::new(),
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: DiagnosticsConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable or disable diagnostics.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Set the lowest observed severity for the bundled sinks.
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.config.min_severity = severity;
        self
    }

    /// Set the gate policy.
    pub fn with_dispatch_policy(mut self, policy: DispatchPolicy) -> Self {
        self.config.dispatch_policy = policy;
        self
    }

    /// Set the capture limit.
    pub fn with_capture_limit(mut self, limit: usize) -> Self {
        self.config.capture_limit = limit;
        self
    }

    /// Forward records to `tracing`.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.tracing = enabled;
        self
    }

    /// Keep records in memory, readable through [`Diagnostics::capture`].
    pub fn with_capture(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Add a custom sink.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Build the diagnostics.
    ///
    /// Fails if the configuration or the event catalog is invalid.
    pub fn build(self) -> Result<Diagnostics> {
        self.config.validate()?;
        validate_catalog()?;

        if !self.config.enabled {
            return Ok(Diagnostics {
                log: RendererLog::new(Arc::new(NullSink))
                    .with_policy(self.config.dispatch_policy),
                capture: None,
                config: self.config,
            });
        }

        let mut sinks = self.sinks;
        if self.tracing {
            sinks.push(Arc::new(
                TracingSink::new().with_min_severity(self.config.min_severity),
            ));
        }
        let capture = self.capture.then(|| {
            Arc::new(CollectingSink::new(
                self.config.min_severity,
                self.config.capture_limit,
            ))
        });
        if let Some(capture) = &capture {
            sinks.push(Arc::clone(capture) as Arc<dyn DiagnosticSink>);
        }

        let sink: Arc<dyn DiagnosticSink> = match sinks.len() {
            0 => Arc::new(NullSink),
            1 => sinks.remove(0),
            _ => {
                let fanout = SinkFanout::new();
                for sink in sinks {
                    fanout.add(sink);
                }
                Arc::new(fanout)
            }
        };

        tracing::debug!(
            min_severity = %self.config.min_severity,
            policy = ?self.config.dispatch_policy,
            capture = capture.is_some(),
            "Renderer diagnostics configured"
        );

        Ok(Diagnostics {
            log: RendererLog::new(sink).with_policy(self.config.dispatch_policy),
            capture,
            config: self.config,
        })
    }
}

impl Default for TrellisBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Configured renderer diagnostics.
pub struct Diagnostics {
    config: DiagnosticsConfig,
    log: RendererLog,
    capture: Option<Arc<CollectingSink>>,
}

impl Diagnostics {
    /// Get the lifecycle entry points.
    pub fn log(&self) -> &RendererLog {
        &self.log
    }

    /// Get the configuration this was built from.
    pub fn config(&self) -> &DiagnosticsConfig {
        &self.config
    }

    /// Get the in-memory capture, if enabled.
    pub fn capture(&self) -> Option<&Arc<CollectingSink>> {
        self.capture.as_ref()
    }
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("config", &self.config)
            .field("capture", &self.capture.is_some())
            .finish()
    }
}

/// Errors from building Trellis diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum TrellisError {
    /// Catalog error.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for Trellis operations.
pub type Result<T> = std::result::Result<T, TrellisError>;

/// Prelude module for convenient imports.
pub mod prelude {
    // Main types
    pub use crate::{Diagnostics, Trellis, TrellisBuilder, TrellisError};

    // Core types
    pub use trellis_core::{
        ComponentId, ComponentIdentity, ComponentRef, DiagnosticsConfig, DispatchPolicy,
        EventKind, EventPayload, FieldValue, Severity, StructuredRecord, TypeDescriptor,
    };

    // Observability types
    pub use trellis_observe::{
        CollectingSink, DiagnosticSink, NullSink, RendererLog, SinkFanout, TracingSink,
    };

    // Common std types
    pub use std::sync::Arc;
}
