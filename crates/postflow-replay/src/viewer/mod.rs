//! Viewer - Audit trail query API
//!
//! Turns raw audit events into per-session timelines and summaries for
//! operators inspecting what happened in a session.

mod stats;
mod timeline;
mod types;

use crate::error::{Error, Result};
use crate::event::{AuditEvent, AuditEventType, TimelineEntry};
use crate::store::AuditStore;
use stats::build_summary;
use timeline::build_timeline;
use tracing::instrument;
use uuid::Uuid;

pub use types::{SessionDetail, SessionSummary};


/// Viewer for querying and displaying session audit trails
#[derive(Clone)]
pub struct AuditViewer {
    store: AuditStore,
}

impl AuditViewer {
    /// Create a new viewer
    #[must_use]
    pub fn new(store: AuditStore) -> Self {
        Self { store }
    }

    /// Get the full view of a session: summary plus timeline
    #[instrument(skip(self))]
    pub async fn get_session_detail(&self, session_id: Uuid) -> Result<SessionDetail> {
        let events = self.load(session_id).await?;
        let timeline = build_timeline(&events);
        let summary = build_summary(session_id, &events)?;

        Ok(SessionDetail {
            summary,
            timeline,
            events,
        })
    }

    /// Get the timeline of a session, optionally restricted to one event type
    #[instrument(skip(self))]
    pub async fn get_timeline(
        &self,
        session_id: Uuid,
        event_type: Option<AuditEventType>,
    ) -> Result<Vec<TimelineEntry>> {
        let events = self.load(session_id).await?;
        let timeline = build_timeline(&events);
        Ok(match event_type {
            Some(kind) => timeline
                .into_iter()
                .filter(|entry| entry.event_type == kind)
                .collect(),
            None => timeline,
        })
    }

    /// Get summaries of the most recently active sessions
    #[instrument(skip(self))]
    pub async fn get_recent_summaries(&self, limit: i64) -> Result<Vec<SessionSummary>> {
        let session_ids = self.store.list_recent_sessions(limit).await?;

        let mut summaries = Vec::with_capacity(session_ids.len());
        for session_id in session_ids {
            let events = self.store.get_session_events(session_id).await?;
            summaries.push(build_summary(session_id, &events)?);
        }

        Ok(summaries)
    }

    async fn load(&self, session_id: Uuid) -> Result<Vec<AuditEvent>> {
        let events = self.store.get_session_events(session_id).await?;
        if events.is_empty() {
            return Err(Error::NotFound(session_id.to_string()));
        }
        Ok(events)
    }
}
