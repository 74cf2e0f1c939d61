//! Application configuration types

use postflow_core::OrchestratorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub orchestrator: OrchestratorSettings,
    #[serde(default)]
    pub publish: PublishSettings,
    #[serde(default)]
    pub audit: AuditSettings,
}

impl AppConfig {
    /// Build the core configuration, with publishing resolved from the
    /// process environment
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        self.orchestrator_config_with(|name| std::env::var(name).ok())
    }

    pub fn orchestrator_config_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> OrchestratorConfig {
        OrchestratorConfig::new()
            .with_executor_timeout(Duration::from_secs(self.orchestrator.executor_timeout_secs))
            .with_audit_timeout(Duration::from_secs(self.orchestrator.audit_timeout_secs))
            .with_audit(self.orchestrator.enable_audit)
            .with_publish_enabled(self.publish.is_ready_with(lookup))
    }
}

/// Orchestrator configuration (exposed to TOML)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorSettings {
    #[serde(default = "default_executor_timeout_secs")]
    pub executor_timeout_secs: u64,
    #[serde(default = "default_audit_timeout_secs")]
    pub audit_timeout_secs: u64,
    #[serde(default = "default_true")]
    pub enable_audit: bool,
}

fn default_executor_timeout_secs() -> u64 {
    60
}

fn default_audit_timeout_secs() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            executor_timeout_secs: default_executor_timeout_secs(),
            audit_timeout_secs: default_audit_timeout_secs(),
            enable_audit: true,
        }
    }
}

/// Publishing capability
///
/// Posting is available only when `enabled` is set and every variable in
/// `required_credentials` is present and non-empty. Values are never read
/// beyond that check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_required_credentials")]
    pub required_credentials: Vec<String>,
}

fn default_required_credentials() -> Vec<String> {
    [
        "TWITTER_CONSUMER_KEY",
        "TWITTER_CONSUMER_SECRET",
        "TWITTER_ACCESS_TOKEN",
        "TWITTER_ACCESS_TOKEN_SECRET",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            required_credentials: default_required_credentials(),
        }
    }
}

impl PublishSettings {
    /// Names of required credentials that `lookup` cannot supply
    pub fn missing_credentials_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
        self.required_credentials
            .iter()
            .filter(|name| lookup(name).map_or(true, |v| v.trim().is_empty()))
            .cloned()
            .collect()
    }

    pub fn missing_credentials(&self) -> Vec<String> {
        self.missing_credentials_with(|name| std::env::var(name).ok())
    }

    pub fn is_ready_with(&self, lookup: impl Fn(&str) -> Option<String>) -> bool {
        self.enabled && self.missing_credentials_with(lookup).is_empty()
    }
}

/// Audit log storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditSettings {
    /// SQLite file; empty selects the default under the data directory
    #[serde(default)]
    pub db_path: String,
}

impl AuditSettings {
    pub fn resolved_db_path(&self) -> PathBuf {
        if self.db_path.trim().is_empty() {
            postflow_replay::default_db_path()
        } else {
            PathBuf::from(&self.db_path)
        }
    }
}
