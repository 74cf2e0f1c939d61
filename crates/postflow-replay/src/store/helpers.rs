//! Helper functions for store module

use crate::error::Error;
use crate::event::{AuditEvent, AuditEventType};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Convert a SQLite row to an AuditEvent
pub(crate) fn row_to_event(row: SqliteRow) -> Result<AuditEvent, Error> {
    let id_str: String = row.get("id");
    let session_id_str: String = row.get("session_id");
    let event_type_str: String = row.get("event_type");
    let metadata_str: Option<String> = row.get("metadata");
    let timestamp_str: String = row.get("timestamp");

    let id =
        Uuid::parse_str(&id_str).map_err(|e| Error::Serialization(format!("invalid uuid: {e}")))?;
    let session_id = Uuid::parse_str(&session_id_str)
        .map_err(|e| Error::Serialization(format!("invalid uuid: {e}")))?;
    let event_type: AuditEventType = event_type_str
        .parse()
        .map_err(|e: String| Error::Serialization(e))?;
    let metadata = metadata_str
        .map(|s| {
            serde_json::from_str(&s)
                .map_err(|e| Error::Serialization(format!("invalid json: {e}")))
        })
        .transpose()?;
    let timestamp = parse_timestamp(&timestamp_str)?;

    Ok(AuditEvent {
        id,
        session_id,
        sequence_num: row.get("sequence_num"),
        event_type,
        content: row.get("content"),
        metadata,
        timestamp,
    })
}

pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Serialization(format!("invalid timestamp: {e}")))
}

/// Get the default data directory for postflow
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".postflow"))
        .unwrap_or_else(|| std::path::PathBuf::from(".postflow"))
}

/// Get the default audit database path
pub fn default_db_path() -> std::path::PathBuf {
    default_data_dir().join("audit.db")
}
