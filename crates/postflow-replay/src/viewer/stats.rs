//! Viewer Stats - Session summaries

use super::types::{truncate, SessionSummary};
use crate::error::{Error, Result};
use crate::event::{AuditEvent, AuditEventType};
use uuid::Uuid;

pub(super) fn build_summary(session_id: Uuid, events: &[AuditEvent]) -> Result<SessionSummary> {
    let (first, last) = match (events.first(), events.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(Error::NotFound(session_id.to_string())),
    };

    let count = |kind: AuditEventType| events.iter().filter(|e| e.event_type == kind).count();

    let started_at = events.iter().map(|e| e.timestamp).min().unwrap_or(first.timestamp);
    let last_activity_at = events.iter().map(|e| e.timestamp).max().unwrap_or(last.timestamp);

    Ok(SessionSummary {
        session_id,
        event_count: events.len(),
        user_action_count: count(AuditEventType::UserAction),
        system_count: count(AuditEventType::System),
        error_count: count(AuditEventType::Error),
        last_event: truncate(&last.content, 100),
        started_at,
        last_activity_at,
        duration_ms: (last_activity_at - started_at).num_milliseconds(),
    })
}
