//! AuditStore - SQLite-based audit storage

use super::traits::AuditSink;
use crate::error::{Error, Result};
use crate::event::{AuditEvent, AuditEventType};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Audit store persisting events to SQLite
#[derive(Clone)]
pub struct AuditStore {
    pool: SqlitePool,
}

impl AuditStore {
    /// Create a new audit store with the given connection pool
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (or create) the audit database at `db_path`
    ///
    /// Creates parent directories and the schema when missing.
    pub async fn from_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Database(format!("failed to create directory: {e}")))?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;

        info!("SQLite audit store initialized at {}", db_path.display());
        Ok(store)
    }

    /// Create a new in-memory audit store (for testing)
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;

        debug!("In-memory SQLite audit store initialized");
        Ok(store)
    }

    /// Get a reference to the underlying connection pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS audit_events (
                id TEXT PRIMARY KEY,
                session_id TEXT NOT NULL,
                sequence_num INTEGER NOT NULL,
                event_type TEXT NOT NULL,
                content TEXT NOT NULL,
                metadata TEXT,
                timestamp TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_audit_events_session
            ON audit_events(session_id, sequence_num)
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_audit_events_timestamp
            ON audit_events(timestamp)
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    // =========================================================================
    // Event operations
    // =========================================================================

    /// Record a new event
    #[instrument(skip(self, event), fields(event_id = %event.id, session_id = %event.session_id))]
    pub async fn record_event(&self, event: &AuditEvent) -> Result<()> {
        super::events::record_event(self, event).await
    }

    /// Get all events for a session
    #[instrument(skip(self))]
    pub async fn get_session_events(&self, session_id: Uuid) -> Result<Vec<AuditEvent>> {
        super::events::get_session_events(self, session_id).await
    }

    /// Get events of one type for a session
    #[instrument(skip(self))]
    pub async fn get_events_by_type(
        &self,
        session_id: Uuid,
        event_type: AuditEventType,
    ) -> Result<Vec<AuditEvent>> {
        super::events::get_events_by_type(self, session_id, event_type).await
    }

    /// Count events for a session
    #[instrument(skip(self))]
    pub async fn count_events(&self, session_id: Uuid) -> Result<i64> {
        super::events::count_events(self, session_id).await
    }

    /// Session ids ordered by most recent activity
    #[instrument(skip(self))]
    pub async fn list_recent_sessions(&self, limit: i64) -> Result<Vec<Uuid>> {
        super::events::list_recent_sessions(self, limit).await
    }
}

#[async_trait::async_trait]
impl AuditSink for AuditStore {
    async fn record(&self, event: AuditEvent) -> Result<()> {
        super::events::record_event(self, &event).await
    }

    async fn session_events(&self, session_id: Uuid) -> Result<Vec<AuditEvent>> {
        super::events::get_session_events(self, session_id).await
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
