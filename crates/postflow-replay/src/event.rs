//! Event - Audit event types and schemas
//!
//! Every significant thing that happens to a session (a user action, a system
//! transition, an error) is captured as an [`AuditEvent`]. Events are
//! append-only: nothing in the workspace mutates or deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of an audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// Something the user did (submitted input, picked a draft)
    UserAction,
    /// A transition driven by the workflow itself
    System,
    /// A failure of any kind
    Error,
}

impl AuditEventType {
    /// Returns the string representation of the event type
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserAction => "user_action",
            Self::System => "system",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AuditEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user_action" => Ok(Self::UserAction),
            "system" => Ok(Self::System),
            "error" => Ok(Self::Error),
            _ => Err(format!("unknown audit event type: {s}")),
        }
    }
}

/// A single entry in a session's audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique identifier
    pub id: Uuid,

    /// Session this event belongs to
    pub session_id: Uuid,

    /// Sequence number within the session
    pub sequence_num: i32,

    /// Category of event
    pub event_type: AuditEventType,

    /// Human-readable summary
    pub content: String,

    /// Structured payload echoing the entities involved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,

    /// When the event occurred
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    /// Create a new event
    #[must_use]
    pub fn new(
        session_id: Uuid,
        sequence_num: i32,
        event_type: AuditEventType,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            sequence_num,
            event_type,
            content: content.into(),
            metadata: None,
            timestamp: Utc::now(),
        }
    }

    /// Set metadata
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Whether this event records a failure
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.event_type == AuditEventType::Error
    }
}

/// Timeline entry for displaying a session's history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Event ID
    pub event_id: Uuid,
    /// Sequence number within the session
    pub sequence_num: i32,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Event type
    pub event_type: AuditEventType,
    /// Human-readable summary
    pub summary: String,
    /// Milliseconds since the previous event in the session
    pub elapsed_ms: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_parse() {
        for event_type in [
            AuditEventType::UserAction,
            AuditEventType::System,
            AuditEventType::Error,
        ] {
            let parsed: AuditEventType = event_type.as_str().parse().unwrap();
            assert_eq!(event_type, parsed);
        }
        assert!("tool_call".parse::<AuditEventType>().is_err());
    }

    #[test]
    fn test_event_creation() {
        let session_id = Uuid::new_v4();
        let event = AuditEvent::new(session_id, 3, AuditEventType::UserAction, "Draft 2 selected")
            .with_metadata(serde_json::json!({"selected_draft": {"number": 2}}));

        assert_eq!(event.session_id, session_id);
        assert_eq!(event.sequence_num, 3);
        assert_eq!(event.content, "Draft 2 selected");
        assert!(!event.is_error());
        assert_eq!(
            event.metadata.unwrap()["selected_draft"]["number"],
            serde_json::json!(2)
        );
    }

    #[test]
    fn test_event_type_serialization() {
        let json = serde_json::to_string(&AuditEventType::UserAction).unwrap();
        assert_eq!(json, r#""user_action""#);

        let event = AuditEvent::new(Uuid::new_v4(), 1, AuditEventType::System, "reset");
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("metadata").is_none());
    }
}
