//! Viewer Types

use crate::event::{AuditEvent, TimelineEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Detailed view of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetail {
    /// Summary information
    pub summary: SessionSummary,
    /// Timeline of events
    pub timeline: Vec<TimelineEntry>,
    /// Raw events, including metadata
    pub events: Vec<AuditEvent>,
}

/// Summary view of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session ID
    pub session_id: Uuid,
    /// Number of events
    pub event_count: usize,
    /// Number of user actions
    pub user_action_count: usize,
    /// Number of system events
    pub system_count: usize,
    /// Number of error events
    pub error_count: usize,
    /// Content of the latest event (truncated)
    pub last_event: String,
    /// First event timestamp
    pub started_at: DateTime<Utc>,
    /// Latest event timestamp
    pub last_activity_at: DateTime<Utc>,
    /// Time between first and latest event
    pub duration_ms: i64,
}

impl SessionSummary {
    /// Whether any failure was recorded
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

/// Truncate a string to `max_len` bytes on a char boundary, adding "..."
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let cut = max_len.saturating_sub(3);
        let safe_end = s
            .char_indices()
            .take_while(|(i, _)| *i < cut)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &s[..safe_end])
    }
}
