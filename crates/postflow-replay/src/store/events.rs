//! Event operations for AuditStore

use super::audit_store::AuditStore;
use super::helpers::row_to_event;
use crate::error::{Error, Result};
use crate::event::{AuditEvent, AuditEventType};
use sqlx::Row;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Record a new event
#[instrument(skip(store, event), fields(event_id = %event.id, session_id = %event.session_id))]
pub async fn record_event(store: &AuditStore, event: &AuditEvent) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_events (
            id, session_id, sequence_num, event_type, content, metadata, timestamp
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7
        )
        "#,
    )
    .bind(event.id.to_string())
    .bind(event.session_id.to_string())
    .bind(event.sequence_num)
    .bind(event.event_type.as_str())
    .bind(&event.content)
    .bind(event.metadata.as_ref().map(|m| m.to_string()))
    .bind(event.timestamp.to_rfc3339())
    .execute(store.pool())
    .await
    .map_err(|e| Error::Database(e.to_string()))?;

    debug!(
        "Recorded {} event {} for session {}",
        event.event_type, event.id, event.session_id
    );
    Ok(())
}

/// Get all events for a session
#[instrument(skip(store))]
pub async fn get_session_events(store: &AuditStore, session_id: Uuid) -> Result<Vec<AuditEvent>> {
    let rows = sqlx::query(
        r#"
        SELECT id, session_id, sequence_num, event_type, content, metadata, timestamp
        FROM audit_events
        WHERE session_id = ?1
        ORDER BY sequence_num ASC, timestamp ASC
        "#,
    )
    .bind(session_id.to_string())
    .fetch_all(store.pool())
    .await
    .map_err(|e| Error::Database(e.to_string()))?;

    rows.into_iter().map(row_to_event).collect()
}

/// Get events by type for a session
#[instrument(skip(store))]
pub async fn get_events_by_type(
    store: &AuditStore,
    session_id: Uuid,
    event_type: AuditEventType,
) -> Result<Vec<AuditEvent>> {
    let rows = sqlx::query(
        r#"
        SELECT id, session_id, sequence_num, event_type, content, metadata, timestamp
        FROM audit_events
        WHERE session_id = ?1 AND event_type = ?2
        ORDER BY sequence_num ASC, timestamp ASC
        "#,
    )
    .bind(session_id.to_string())
    .bind(event_type.as_str())
    .fetch_all(store.pool())
    .await
    .map_err(|e| Error::Database(e.to_string()))?;

    rows.into_iter().map(row_to_event).collect()
}

/// Count events for a session
#[instrument(skip(store))]
pub async fn count_events(store: &AuditStore, session_id: Uuid) -> Result<i64> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) as count
        FROM audit_events
        WHERE session_id = ?1
        "#,
    )
    .bind(session_id.to_string())
    .fetch_one(store.pool())
    .await
    .map_err(|e| Error::Database(e.to_string()))?;

    Ok(row.get::<i64, _>("count"))
}

/// List session ids, most recently active first
#[instrument(skip(store))]
pub async fn list_recent_sessions(store: &AuditStore, limit: i64) -> Result<Vec<Uuid>> {
    let rows = sqlx::query(
        r#"
        SELECT session_id, MAX(timestamp) as last_at
        FROM audit_events
        GROUP BY session_id
        ORDER BY last_at DESC
        LIMIT ?1
        "#,
    )
    .bind(limit)
    .fetch_all(store.pool())
    .await
    .map_err(|e| Error::Database(e.to_string()))?;

    rows.into_iter()
        .map(|row| {
            let id: String = row.get("session_id");
            Uuid::parse_str(&id).map_err(|e| Error::Serialization(format!("invalid uuid: {e}")))
        })
        .collect()
}
