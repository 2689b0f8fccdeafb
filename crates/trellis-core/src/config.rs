//! Configuration types for renderer diagnostics.
//!
//! This module provides the settings that decide which severities are
//! observed, how lifecycle entry points gate their work, and how many
//! records an in-memory capture keeps.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::EventTemplate;
use crate::error::{ConfigError, ConfigResult};
use crate::severity::Severity;

/// How lifecycle entry points use the severity gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchPolicy {
    /// Check the gate before resolving any field value, for every template.
    #[default]
    AlwaysGuard,

    /// Check the gate only for templates flagged `precheck`.
    ///
    /// Other templates build their record unconditionally and rely on the
    /// sink to drop it cheaply when the severity is inactive.
    PerTemplate,
}

impl DispatchPolicy {
    /// Whether `template` must pass the gate before its fields are resolved.
    pub fn requires_gate(self, template: &EventTemplate) -> bool {
        match self {
            DispatchPolicy::AlwaysGuard => true,
            DispatchPolicy::PerTemplate => template.precheck,
        }
    }
}

/// Configuration for renderer diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Master switch. When off, every entry point is a single branch.
    pub enabled: bool,

    /// Lowest severity the bundled sinks observe.
    ///
    /// Lifecycle events are emitted at [`Severity::Detail`], so the default
    /// of [`Severity::Info`] keeps them off.
    pub min_severity: Severity,

    /// Gate policy for the lifecycle entry points.
    pub dispatch_policy: DispatchPolicy,

    /// Maximum records kept by an in-memory capture.
    ///
    /// Defaults to 10,000.
    pub capture_limit: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_severity: Severity::Info,
            dispatch_policy: DispatchPolicy::AlwaysGuard,
            capture_limit: 10_000,
        }
    }
}

impl DiagnosticsConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable diagnostics.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the lowest observed severity.
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Set the gate policy.
    pub fn with_dispatch_policy(mut self, policy: DispatchPolicy) -> Self {
        self.dispatch_policy = policy;
        self
    }

    /// Set the capture limit.
    pub fn with_capture_limit(mut self, limit: usize) -> Self {
        self.capture_limit = limit;
        self
    }

    /// Create a configuration that emits nothing.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Create a configuration that observes every lifecycle event.
    pub fn verbose() -> Self {
        Self {
            enabled: true,
            min_severity: Severity::Trace,
            dispatch_policy: DispatchPolicy::AlwaysGuard,
            capture_limit: 100_000,
        }
    }

    /// Check the configuration for values that cannot work.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.enabled && self.capture_limit == 0 {
            return Err(ConfigError::Invalid(
                "capture_limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML configuration.
    ///
    /// ```
    /// use trellis_core::{DiagnosticsConfig, DispatchPolicy, Severity};
    ///
    /// let config = DiagnosticsConfig::from_toml_str(
    ///     "min_severity = \"detail\"\ndispatch_policy = \"per-template\"",
    /// )
    /// .unwrap();
    /// assert_eq!(config.min_severity, Severity::Detail);
    /// assert_eq!(config.dispatch_policy, DispatchPolicy::PerTemplate);
    /// ```
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
