//! Audit logging for the workflow
//!
//! [`AuditLog`] wraps an [`AuditSink`] so that recording can never break a
//! session. Each write is bounded by a timeout; sink errors and timeouts are
//! turned into [`AuditFailure`] values that are logged, counted and
//! optionally forwarded to an operational channel.

use crate::session::{Session, SessionId};
use postflow_replay::{AuditEvent, AuditEventType, AuditSink};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// A write the audit sink did not accept
#[derive(Debug, Clone, PartialEq)]
pub struct AuditFailure {
    /// Session the lost event belonged to
    pub session_id: SessionId,
    /// Category of the lost event
    pub event_type: AuditEventType,
    /// Content of the lost event
    pub content: String,
    /// Why the write failed
    pub reason: String,
}

/// Failure-isolating front for an audit sink
pub struct AuditLog {
    sink: Arc<dyn AuditSink>,
    timeout: Duration,
    enabled: bool,
    failures: Option<mpsc::UnboundedSender<AuditFailure>>,
    failure_count: AtomicU64,
}

impl AuditLog {
    /// Create a log over `sink` with the given per-write timeout
    #[must_use]
    pub fn new(sink: Arc<dyn AuditSink>, timeout: Duration) -> Self {
        Self {
            sink,
            timeout,
            enabled: true,
            failures: None,
            failure_count: AtomicU64::new(0),
        }
    }

    /// Turn recording on or off
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Forward every failed write to `tx`
    #[must_use]
    pub fn with_failure_channel(mut self, tx: mpsc::UnboundedSender<AuditFailure>) -> Self {
        self.failures = Some(tx);
        self
    }

    /// Name of the underlying sink
    #[must_use]
    pub fn sink_name(&self) -> &str {
        self.sink.name()
    }

    /// Number of writes lost so far
    #[must_use]
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Record one event for `session`
    ///
    /// Takes the next sequence number from the session. Never fails: a lost
    /// write is reported through [`AuditFailure`] instead.
    pub async fn record(
        &self,
        session: &mut Session,
        event_type: AuditEventType,
        content: impl Into<String>,
        metadata: Option<serde_json::Value>,
    ) {
        if !self.enabled {
            return;
        }

        let session_id = session.id();
        let sequence_num = session.next_audit_sequence();
        let mut event = AuditEvent::new(session_id.as_uuid(), sequence_num, event_type, content);
        if let Some(metadata) = metadata {
            event = event.with_metadata(metadata);
        }
        let content = event.content.clone();

        let reason = match tokio::time::timeout(self.timeout, self.sink.record(event)).await {
            Ok(Ok(())) => {
                debug!(
                    session_id = %session_id,
                    sequence_num,
                    event_type = %event_type,
                    "Audit event recorded"
                );
                return;
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("audit write timed out after {}s", self.timeout.as_secs_f64()),
        };

        self.report(AuditFailure {
            session_id,
            event_type,
            content,
            reason,
        });
    }

    fn report(&self, failure: AuditFailure) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
        warn!(
            session_id = %failure.session_id,
            event_type = %failure.event_type,
            sink = self.sink.name(),
            reason = %failure.reason,
            "Failed to record audit event"
        );

        if let Some(tx) = &self.failures {
            if tx.send(failure).is_err() {
                debug!("Audit failure channel closed");
            }
        }
    }
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog")
            .field("sink", &self.sink.name())
            .field("timeout", &self.timeout)
            .field("enabled", &self.enabled)
            .field("failure_count", &self.failure_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use postflow_replay::{MemoryAuditStore, Result as ReplayResult};
    use uuid::Uuid;

    struct BrokenSink;

    #[async_trait]
    impl AuditSink for BrokenSink {
        async fn record(&self, _event: AuditEvent) -> ReplayResult<()> {
            Err(postflow_replay::Error::Database("disk full".to_string()))
        }

        async fn session_events(&self, _session_id: Uuid) -> ReplayResult<Vec<AuditEvent>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    struct HangingSink;

    #[async_trait]
    impl AuditSink for HangingSink {
        async fn record(&self, _event: AuditEvent) -> ReplayResult<()> {
            std::future::pending::<()>().await;
            Ok(())
        }

        async fn session_events(&self, _session_id: Uuid) -> ReplayResult<Vec<AuditEvent>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            "hanging"
        }
    }

    #[tokio::test]
    async fn test_record_assigns_sequence_numbers() {
        let store = Arc::new(MemoryAuditStore::new());
        let log = AuditLog::new(store.clone(), Duration::from_secs(1));
        let mut session = Session::new();

        log.record(&mut session, AuditEventType::UserAction, "first", None)
            .await;
        log.record(
            &mut session,
            AuditEventType::System,
            "second",
            Some(serde_json::json!({"count": 2})),
        )
        .await;

        let events = store.session_events(session.id().as_uuid()).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].sequence_num, 1);
        assert_eq!(events[1].sequence_num, 2);
        assert_eq!(events[1].metadata, Some(serde_json::json!({"count": 2})));
        assert_eq!(log.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_sink_error_is_reported_not_raised() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let log = AuditLog::new(Arc::new(BrokenSink), Duration::from_secs(1))
            .with_failure_channel(tx);
        let mut session = Session::new();

        log.record(&mut session, AuditEventType::Error, "search failed", None)
            .await;

        assert_eq!(log.failure_count(), 1);
        let failure = rx.try_recv().unwrap();
        assert_eq!(failure.session_id, session.id());
        assert_eq!(failure.event_type, AuditEventType::Error);
        assert_eq!(failure.content, "search failed");
        assert!(failure.reason.contains("disk full"));
    }

    #[tokio::test]
    async fn test_hanging_sink_times_out() {
        let log = AuditLog::new(Arc::new(HangingSink), Duration::from_millis(20));
        let mut session = Session::new();

        log.record(&mut session, AuditEventType::System, "reset", None)
            .await;

        assert_eq!(log.failure_count(), 1);
    }

    #[tokio::test]
    async fn test_disabled_log_writes_nothing() {
        let store = Arc::new(MemoryAuditStore::new());
        let log = AuditLog::new(store.clone(), Duration::from_secs(1)).with_enabled(false);
        let mut session = Session::new();

        log.record(&mut session, AuditEventType::System, "ignored", None)
            .await;

        assert!(store.is_empty().await);
    }
}
