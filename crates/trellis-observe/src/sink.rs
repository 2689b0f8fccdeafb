//! The sink capability and sink composition.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use trellis_core::{Severity, StructuredRecord};

/// Errors a sink may report for a record it could not accept.
///
/// The dispatch layer logs and drops these; they never reach the renderer.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The destination is not reachable.
    #[error("Sink unavailable: {0}")]
    Unavailable(String),

    /// The sink panicked while handling a record.
    #[error("Sink panicked: {0}")]
    Panicked(String),
}

/// Result type for sink operations.
pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// Destination for structured records.
///
/// `is_active` is called on every guarded lifecycle call and must stay cheap.
/// `emit` may be reached for inactive severities when a template skips the
/// gate, so implementations should re-check activity there.
pub trait DiagnosticSink: Send + Sync {
    /// Whether records at `severity` are currently observed.
    fn is_active(&self, severity: Severity) -> bool;

    /// Accept one record.
    fn emit(&self, record: &StructuredRecord) -> SinkResult<()>;
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Arc<S> {
    fn is_active(&self, severity: Severity) -> bool {
        (**self).is_active(severity)
    }

    fn emit(&self, record: &StructuredRecord) -> SinkResult<()> {
        (**self).emit(record)
    }
}

/// A sink that observes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn is_active(&self, _severity: Severity) -> bool {
        false
    }

    fn emit(&self, _record: &StructuredRecord) -> SinkResult<()> {
        Ok(())
    }
}

/// Run `f`, turning a panic into [`SinkError::Panicked`].
pub(crate) fn isolate<T>(f: impl FnOnce() -> SinkResult<T>) -> SinkResult<T> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(SinkError::Panicked(panic_message(payload.as_ref()))))
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Forwards records to several sinks.
///
/// Active when any member is active. A record goes only to members active
/// for its severity; a failing member does not keep the others from
/// receiving it.
///
/// Members may add sinks from `emit`; those receive the next record. They
/// must not add sinks from `is_active`, which runs under the read lock.
#[derive(Default)]
pub struct SinkFanout {
    sinks: RwLock<Vec<Arc<dyn DiagnosticSink>>>,
}

impl SinkFanout {
    /// Create an empty fanout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink.
    pub fn add(&self, sink: Arc<dyn DiagnosticSink>) {
        self.sinks.write().push(sink);
    }

    /// Get sink count.
    pub fn sink_count(&self) -> usize {
        self.sinks.read().len()
    }
}

impl DiagnosticSink for SinkFanout {
    fn is_active(&self, severity: Severity) -> bool {
        self.sinks.read().iter().any(|sink| sink.is_active(severity))
    }

    fn emit(&self, record: &StructuredRecord) -> SinkResult<()> {
        let sinks = self.sinks.read().clone();
        let mut first_error = None;
        for sink in sinks.iter() {
            let outcome = isolate(|| {
                if sink.is_active(record.severity()) {
                    sink.emit(record)
                } else {
                    Ok(())
                }
            });
            if let Err(err) = outcome {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for SinkFanout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkFanout")
            .field("sink_count", &self.sink_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collecting::CollectingSink;
    use trellis_core::{ComponentId, EventKind, FieldValue, TypeDescriptor};

    fn disposing() -> StructuredRecord {
        EventKind::DisposingComponent.template().bind([
            FieldValue::ComponentId(ComponentId::new(9)),
            FieldValue::TypeName(TypeDescriptor::new("app::Counter")),
        ])
    }

    struct FailingSink;

    impl DiagnosticSink for FailingSink {
        fn is_active(&self, _severity: Severity) -> bool {
            true
        }

        fn emit(&self, _record: &StructuredRecord) -> SinkResult<()> {
            Err(SinkError::Unavailable("pipe closed".to_string()))
        }
    }

    struct PanickingSink;

    impl DiagnosticSink for PanickingSink {
        fn is_active(&self, _severity: Severity) -> bool {
            true
        }

        fn emit(&self, _record: &StructuredRecord) -> SinkResult<()> {
            panic!("sink exploded")
        }
    }

    #[test]
    fn test_null_sink_is_never_active() {
        assert!(Severity::ALL.iter().all(|s| !NullSink.is_active(*s)));
        assert!(NullSink.emit(&disposing()).is_ok());
    }

    #[test]
    fn test_fanout_activity_is_any() {
        let fanout = SinkFanout::new();
        assert!(!fanout.is_active(Severity::Detail));

        fanout.add(Arc::new(CollectingSink::new(Severity::Info, 10)));
        assert!(!fanout.is_active(Severity::Detail));

        fanout.add(Arc::new(CollectingSink::new(Severity::Trace, 10)));
        assert!(fanout.is_active(Severity::Detail));
        assert_eq!(fanout.sink_count(), 2);
    }

    #[test]
    fn test_fanout_skips_inactive_members() {
        let fanout = SinkFanout::new();
        let quiet = Arc::new(CollectingSink::new(Severity::Info, 10));
        let verbose = Arc::new(CollectingSink::new(Severity::Detail, 10));
        fanout.add(Arc::clone(&quiet) as Arc<dyn DiagnosticSink>);
        fanout.add(Arc::clone(&verbose) as Arc<dyn DiagnosticSink>);

        fanout.emit(&disposing()).unwrap();

        assert_eq!(quiet.len(), 0);
        assert_eq!(verbose.len(), 1);
    }

    #[test]
    fn test_fanout_isolates_failures() {
        let fanout = SinkFanout::new();
        let collector = Arc::new(CollectingSink::new(Severity::Trace, 10));
        fanout.add(Arc::new(FailingSink));
        fanout.add(Arc::new(PanickingSink));
        fanout.add(Arc::clone(&collector) as Arc<dyn DiagnosticSink>);

        let err = fanout.emit(&disposing()).unwrap_err();

        assert!(matches!(err, SinkError::Unavailable(_)));
        assert_eq!(collector.len(), 1);
    }

    /// Registers another sink the first time it receives a record.
    struct RegisteringSink {
        fanout: std::sync::Weak<SinkFanout>,
    }

    impl DiagnosticSink for RegisteringSink {
        fn is_active(&self, _severity: Severity) -> bool {
            true
        }

        fn emit(&self, _record: &StructuredRecord) -> SinkResult<()> {
            if let Some(fanout) = self.fanout.upgrade() {
                if fanout.sink_count() == 1 {
                    fanout.add(Arc::new(CollectingSink::new(Severity::Trace, 10)));
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_fanout_member_may_add_sinks_while_emitting() {
        let fanout = Arc::new(SinkFanout::new());
        fanout.add(Arc::new(RegisteringSink {
            fanout: Arc::downgrade(&fanout),
        }));

        fanout.emit(&disposing()).unwrap();
        assert_eq!(fanout.sink_count(), 2);

        fanout.emit(&disposing()).unwrap();
        assert_eq!(fanout.sink_count(), 2);
    }

    #[test]
    fn test_isolate_reports_panic_message() {
        let err = isolate::<()>(|| panic!("boom")).unwrap_err();
        match err {
            SinkError::Panicked(message) => assert_eq!(message, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
