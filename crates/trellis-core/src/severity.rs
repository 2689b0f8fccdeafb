//! Severity levels for lifecycle diagnostics.

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic record.
///
/// Ordered from most verbose to least verbose, so `a >= min` reads as
/// "`a` passes a gate configured at `min`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Trace level (most verbose).
    Trace = 0,
    /// Detail level: high-volume lifecycle tracing, not operational alerting.
    #[serde(alias = "debug")]
    Detail = 1,
    /// Info level.
    #[default]
    Info = 2,
    /// Warning level.
    Warn = 3,
    /// Error level.
    Error = 4,
}

impl Severity {
    /// All severities, most verbose first.
    pub const ALL: [Severity; 5] = [
        Severity::Trace,
        Severity::Detail,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
    ];

    /// Get the severity name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Detail => "detail",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    /// Check if this severity passes a gate set at `min`.
    pub fn is_at_least(&self, min: Severity) -> bool {
        *self >= min
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Detail);
        assert!(Severity::Detail < Severity::Info);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Detail.is_at_least(Severity::Detail));
        assert!(!Severity::Detail.is_at_least(Severity::Info));
    }

    #[test]
    fn test_severity_default_is_info() {
        assert_eq!(Severity::default(), Severity::Info);
    }
}
