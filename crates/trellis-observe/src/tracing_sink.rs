//! A sink backed by the `tracing` facade.

use tracing::Level;

use trellis_core::{Severity, StructuredRecord};

use crate::sink::{DiagnosticSink, SinkResult};

/// Target used for every record forwarded to `tracing`.
pub const RENDERER_TARGET: &str = "trellis::renderer";

macro_rules! record_event {
    ($level:expr, $record:expr) => {
        tracing::event!(
            target: RENDERER_TARGET,
            $level,
            event_id = $record.id().get(),
            event_name = $record.name(),
            event_kind = $record.kind().as_str(),
            component_id = $record.field("ComponentId").map(tracing::field::display),
            component_type = $record.field("ComponentType").map(tracing::field::display),
            fields = %$record.fields_display(),
            "{}",
            $record.message()
        )
    };
}

/// Forwards records to the installed `tracing` subscriber.
///
/// Active when the severity passes both the sink's own minimum and the
/// subscriber's filter for [`RENDERER_TARGET`].
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    min_severity: Severity,
}

impl TracingSink {
    /// Create a new tracing sink that defers entirely to the subscriber.
    pub fn new() -> Self {
        Self {
            min_severity: Severity::Trace,
        }
    }

    /// Set the minimum severity.
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Get the minimum severity.
    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for TracingSink {
    fn is_active(&self, severity: Severity) -> bool {
        if severity < self.min_severity {
            return false;
        }
        match severity {
            Severity::Trace => tracing::enabled!(target: RENDERER_TARGET, Level::TRACE),
            Severity::Detail => tracing::enabled!(target: RENDERER_TARGET, Level::DEBUG),
            Severity::Info => tracing::enabled!(target: RENDERER_TARGET, Level::INFO),
            Severity::Warn => tracing::enabled!(target: RENDERER_TARGET, Level::WARN),
            Severity::Error => tracing::enabled!(target: RENDERER_TARGET, Level::ERROR),
        }
    }

    fn emit(&self, record: &StructuredRecord) -> SinkResult<()> {
        if record.severity() < self.min_severity {
            return Ok(());
        }
        match record.severity() {
            Severity::Trace => record_event!(Level::TRACE, record),
            Severity::Detail => record_event!(Level::DEBUG, record),
            Severity::Info => record_event!(Level::INFO, record),
            Severity::Warn => record_event!(Level::WARN, record),
            Severity::Error => record_event!(Level::ERROR, record),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{ComponentId, EventKind, FieldValue, TypeDescriptor};

    use crate::testing::RecordingSubscriber;

    fn disposing() -> StructuredRecord {
        EventKind::DisposingComponent.template().bind([
            FieldValue::ComponentId(ComponentId::new(12)),
            FieldValue::TypeName(TypeDescriptor::new("app::Counter")),
        ])
    }

    #[test]
    fn test_min_severity_gates_before_subscriber() {
        let subscriber = RecordingSubscriber::new();
        let sink = TracingSink::new().with_min_severity(Severity::Warn);

        tracing::subscriber::with_default(subscriber.clone(), || {
            assert!(!sink.is_active(Severity::Detail));
            assert!(!sink.is_active(Severity::Info));
            assert!(sink.is_active(Severity::Warn));
            sink.emit(&disposing()).unwrap();
        });

        assert!(subscriber.events().is_empty());
    }

    #[test]
    fn test_inactive_without_subscriber() {
        let sink = TracingSink::new();
        assert!(!sink.is_active(Severity::Detail));
    }

    #[test]
    fn test_detail_record_reaches_subscriber_at_debug() {
        let subscriber = RecordingSubscriber::new();
        let sink = TracingSink::new();

        tracing::subscriber::with_default(subscriber.clone(), || {
            assert!(sink.is_active(Severity::Detail));
            sink.emit(&disposing()).unwrap();
        });

        let events = subscriber.events();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.target, RENDERER_TARGET);
        assert_eq!(event.level, Level::DEBUG);
        assert_eq!(event.field("event_id"), Some("4"));
        assert_eq!(event.field("event_name"), Some("DisposingComponent"));
        assert_eq!(event.field("event_kind"), Some("DisposingComponent"));
        assert_eq!(event.field("component_id"), Some("12"));
        assert_eq!(event.field("component_type"), Some("app::Counter"));
        assert_eq!(
            event.field("message"),
            Some("Disposing component 12 of type app::Counter")
        );
    }

    #[test]
    fn test_handling_event_has_no_component_type() {
        let subscriber = RecordingSubscriber::new();
        let record = EventKind::HandlingEvent.template().bind([
            FieldValue::Unsigned(42),
            FieldValue::null(),
            FieldValue::null(),
        ]);

        tracing::subscriber::with_default(subscriber.clone(), || {
            TracingSink::new().emit(&record).unwrap();
        });

        let events = subscriber.events();
        assert_eq!(events[0].field("component_id"), Some("null"));
        assert_eq!(events[0].field("component_type"), None);
    }
}
