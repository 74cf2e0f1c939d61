//! Orchestrator core structure
//!
//! Contains the main `Orchestrator` struct and its builder methods.

use crate::audit::{AuditFailure, AuditLog};
use crate::error::Result;
use crate::executors::{ArticleSearch, ContentCrawler, DraftGenerator, Publisher, Transcriber};
use postflow_replay::AuditSink;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::config::OrchestratorConfig;

/// Drives sessions through the workflow
///
/// The orchestrator holds no per-session state. Every operation borrows the
/// caller's [`Session`](crate::Session) mutably, so one orchestrator can serve
/// any number of independent sessions concurrently.
pub struct Orchestrator {
    pub(crate) search: Arc<dyn ArticleSearch>,
    pub(crate) crawler: Arc<dyn ContentCrawler>,
    pub(crate) generator: Arc<dyn DraftGenerator>,
    pub(crate) transcriber: Option<Arc<dyn Transcriber>>,
    pub(crate) publisher: Option<Arc<dyn Publisher>>,
    pub(crate) audit: AuditLog,
    pub(crate) config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create a new orchestrator
    ///
    /// The configuration is taken as given; use [`Orchestrator::try_new`]
    /// when it comes from outside the program.
    #[must_use]
    pub fn new(
        search: Arc<dyn ArticleSearch>,
        crawler: Arc<dyn ContentCrawler>,
        generator: Arc<dyn DraftGenerator>,
        audit_sink: Arc<dyn AuditSink>,
        config: OrchestratorConfig,
    ) -> Self {
        let audit = AuditLog::new(audit_sink, config.audit_timeout).with_enabled(config.enable_audit);

        Self {
            search,
            crawler,
            generator,
            transcriber: None,
            publisher: None,
            audit,
            config,
        }
    }

    /// Create a new orchestrator after validating the configuration
    pub fn try_new(
        search: Arc<dyn ArticleSearch>,
        crawler: Arc<dyn ContentCrawler>,
        generator: Arc<dyn DraftGenerator>,
        audit_sink: Arc<dyn AuditSink>,
        config: OrchestratorConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(search, crawler, generator, audit_sink, config))
    }

    /// Set the speech-to-text executor used by `submit_audio`
    #[must_use]
    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Set the publish executor
    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Forward audit write failures to an operational channel
    #[must_use]
    pub fn with_failure_channel(mut self, tx: mpsc::UnboundedSender<AuditFailure>) -> Self {
        self.audit = self.audit.with_failure_channel(tx);
        self
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Number of audit writes lost so far
    #[must_use]
    pub fn audit_failures(&self) -> u64 {
        self.audit.failure_count()
    }

    /// Whether `request_publish` will call the publisher
    #[must_use]
    pub fn publish_ready(&self) -> bool {
        self.config.publish_enabled && self.publisher.is_some()
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("transcriber", &self.transcriber.is_some())
            .field("publisher", &self.publisher.is_some())
            .field("audit", &self.audit)
            .field("config", &self.config)
            .finish()
    }
}
