//! MemoryAuditStore - in-process audit sink

use super::traits::AuditSink;
use crate::error::Result;
use crate::event::{AuditEvent, AuditEventType};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Audit sink that keeps every event in memory
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    events: RwLock<Vec<AuditEvent>>,
}

impl MemoryAuditStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded event, in arrival order
    pub async fn all_events(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }

    /// Events of one type for a session
    pub async fn events_of_type(
        &self,
        session_id: Uuid,
        event_type: AuditEventType,
    ) -> Vec<AuditEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.session_id == session_id && e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Total number of recorded events
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// Whether nothing has been recorded yet
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl AuditSink for MemoryAuditStore {
    async fn record(&self, event: AuditEvent) -> Result<()> {
        self.events.write().await.push(event);
        Ok(())
    }

    async fn session_events(&self, session_id: Uuid) -> Result<Vec<AuditEvent>> {
        let mut events: Vec<_> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.sequence_num);
        Ok(events)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
