//! A sink that keeps records in memory.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use trellis_core::{Severity, StructuredRecord};

use crate::sink::{DiagnosticSink, SinkResult};

/// A sink that collects records for later analysis.
///
/// Holds at most `max_records`; later records are counted as dropped.
pub struct CollectingSink {
    min_severity: Severity,
    records: RwLock<Vec<StructuredRecord>>,
    max_records: usize,
    dropped: AtomicUsize,
}

impl CollectingSink {
    /// Create a new collecting sink.
    pub fn new(min_severity: Severity, max_records: usize) -> Self {
        Self {
            min_severity,
            records: RwLock::new(Vec::new()),
            max_records,
            dropped: AtomicUsize::new(0),
        }
    }

    /// Get collected records.
    pub fn records(&self) -> Vec<StructuredRecord> {
        self.records.read().clone()
    }

    /// Clear collected records.
    pub fn clear(&self) {
        self.records.write().clear();
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Get record count.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Records refused because the sink was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for CollectingSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectingSink")
            .field("min_severity", &self.min_severity)
            .field("len", &self.len())
            .field("max_records", &self.max_records)
            .finish()
    }
}

impl DiagnosticSink for CollectingSink {
    fn is_active(&self, severity: Severity) -> bool {
        severity >= self.min_severity
    }

    fn emit(&self, record: &StructuredRecord) -> SinkResult<()> {
        if !self.is_active(record.severity()) {
            return Ok(());
        }
        let mut records = self.records.write();
        if records.len() < self.max_records {
            records.push(record.clone());
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{ComponentId, EventKind, FieldValue, TypeDescriptor};

    fn rendered(id: u32) -> StructuredRecord {
        EventKind::RenderedComponent.template().bind([
            FieldValue::ComponentId(ComponentId::new(id)),
            FieldValue::TypeName(TypeDescriptor::new("app::Counter")),
        ])
    }

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingSink::new(Severity::Detail, 100);

        sink.emit(&rendered(1)).unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.records()[0], rendered(1));
    }

    #[test]
    fn test_collecting_sink_max_records() {
        let sink = CollectingSink::new(Severity::Trace, 2);

        for i in 0..5 {
            sink.emit(&rendered(i)).unwrap();
        }

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.dropped(), 3);
    }

    #[test]
    fn test_collecting_sink_filters_severity() {
        let sink = CollectingSink::new(Severity::Info, 100);

        assert!(!sink.is_active(Severity::Detail));
        sink.emit(&rendered(1)).unwrap();

        assert!(sink.is_empty());
    }

    #[test]
    fn test_clear() {
        let sink = CollectingSink::new(Severity::Trace, 1);
        sink.emit(&rendered(1)).unwrap();
        sink.emit(&rendered(2)).unwrap();

        sink.clear();

        assert!(sink.is_empty());
        assert_eq!(sink.dropped(), 0);
    }
}
