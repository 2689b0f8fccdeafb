//! Trellis Observe
//!
//! This crate turns renderer lifecycle calls into structured records and
//! delivers them to sinks:
//!
//! - [`RendererLog`]: the lifecycle entry points the renderer calls
//! - [`DiagnosticSink`]: the "is this severity active" / "emit this record"
//!   capability
//! - [`TracingSink`], [`CollectingSink`], [`NullSink`], [`SinkFanout`]:
//!   bundled sinks
//!
//! # Lifecycle Calls
//!
//! ```
//! use std::sync::Arc;
//! use trellis_core::{ComponentId, ComponentRef, Severity};
//! use trellis_observe::{CollectingSink, DiagnosticSink, RendererLog};
//!
//! let sink = Arc::new(CollectingSink::new(Severity::Detail, 1_000));
//! let log = RendererLog::new(Arc::clone(&sink) as Arc<dyn DiagnosticSink>);
//!
//! let app = ComponentRef::new(1u32, "app::App");
//! let counter = ComponentRef::new(2u32, "app::Counter");
//!
//! log.initializing_component(&counter, Some(&app));
//! log.rendering_component(&counter);
//! log.handling_event(42, None, Some(ComponentId::new(2)));
//!
//! assert_eq!(sink.len(), 3);
//! ```
//!
//! # Sink Composition
//!
//! ```
//! use std::sync::Arc;
//! use trellis_core::Severity;
//! use trellis_observe::{CollectingSink, SinkFanout, TracingSink};
//!
//! let fanout = SinkFanout::new();
//! fanout.add(Arc::new(TracingSink::new()));
//! fanout.add(Arc::new(CollectingSink::new(Severity::Detail, 1_000)));
//! assert_eq!(fanout.sink_count(), 2);
//! ```

pub mod collecting;
pub mod renderer_log;
pub mod sink;
pub mod tracing_sink;

#[cfg(test)]
mod testing;

// Re-export main types
pub use collecting::CollectingSink;
pub use renderer_log::{DIAGNOSTICS_TARGET, RendererLog};
pub use sink::{DiagnosticSink, NullSink, SinkError, SinkFanout, SinkResult};
pub use tracing_sink::{RENDERER_TARGET, TracingSink};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::collecting::CollectingSink;
    pub use crate::renderer_log::RendererLog;
    pub use crate::sink::{DiagnosticSink, NullSink, SinkFanout};
    pub use crate::tracing_sink::TracingSink;
}
