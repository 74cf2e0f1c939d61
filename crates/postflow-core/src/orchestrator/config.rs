//! Orchestrator configuration

use crate::error::{Error, Result};
use std::time::Duration;

/// Configuration for the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Upper bound on any single executor call
    pub executor_timeout: Duration,
    /// Upper bound on any single audit write
    pub audit_timeout: Duration,
    /// Whether to record audit events
    pub enable_audit: bool,
    /// Whether the host resolved the publish capability as available
    pub publish_enabled: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            executor_timeout: Duration::from_secs(60),
            audit_timeout: Duration::from_secs(5),
            enable_audit: true,
            publish_enabled: false,
        }
    }
}

impl OrchestratorConfig {
    /// Create a new configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the executor timeout
    #[must_use]
    pub fn with_executor_timeout(mut self, timeout: Duration) -> Self {
        self.executor_timeout = timeout;
        self
    }

    /// Set the audit write timeout
    #[must_use]
    pub fn with_audit_timeout(mut self, timeout: Duration) -> Self {
        self.audit_timeout = timeout;
        self
    }

    /// Set whether to record audit events
    #[must_use]
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.enable_audit = enabled;
        self
    }

    /// Set whether publishing is available
    #[must_use]
    pub fn with_publish_enabled(mut self, enabled: bool) -> Self {
        self.publish_enabled = enabled;
        self
    }

    /// Reject settings the orchestrator cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.executor_timeout.is_zero() {
            return Err(Error::Configuration(
                "executor_timeout must be greater than zero".to_string(),
            ));
        }
        if self.audit_timeout.is_zero() {
            return Err(Error::Configuration(
                "audit_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
