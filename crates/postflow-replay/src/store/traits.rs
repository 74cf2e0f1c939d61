//! Trait for audit sinks

use crate::error::Result;
use crate::event::AuditEvent;
use uuid::Uuid;

/// Destination for audit events
///
/// Implementations must accept concurrent writes from independent sessions.
/// Writes are append-only; no implementation may rewrite an earlier event.
#[async_trait::async_trait]
pub trait AuditSink: Send + Sync {
    /// Append an event
    async fn record(&self, event: AuditEvent) -> Result<()>;

    /// Get all events for a session, in sequence order
    async fn session_events(&self, session_id: Uuid) -> Result<Vec<AuditEvent>>;

    /// Get the sink name (for logging)
    fn name(&self) -> &str;
}
