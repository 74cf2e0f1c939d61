//! Audit log CLI commands
//!
//! `postflow audit sessions` - list recently active sessions
//! `postflow audit show`     - show one session's timeline

use super::AuditCommands;
use crate::loader::load_config;
use anyhow::{anyhow, Context, Result};
use postflow_replay::{AuditEventType, AuditStore, AuditViewer, TimelineEntry};
use tracing::info;
use uuid::Uuid;

/// Run an audit subcommand.
pub async fn run(cmd: AuditCommands) -> Result<()> {
    let config = load_config()?;
    let db_path = config.audit.resolved_db_path();
    let store = AuditStore::from_path(&db_path)
        .await
        .with_context(|| format!("Failed to open audit database at {}", db_path.display()))?;
    info!(path = %db_path.display(), "Audit database opened");
    let viewer = AuditViewer::new(store);

    match cmd {
        AuditCommands::Sessions { limit } => sessions(&viewer, limit).await,
        AuditCommands::Show {
            session_id,
            event_type,
            json,
        } => show(&viewer, &session_id, event_type.as_deref(), json).await,
    }
}

async fn sessions(viewer: &AuditViewer, limit: i64) -> Result<()> {
    let summaries = viewer.get_recent_summaries(limit).await?;

    println!("\n📜 Recent sessions\n");
    if summaries.is_empty() {
        println!("  No sessions recorded yet.");
        return Ok(());
    }

    for summary in summaries {
        let marker = if summary.has_errors() { "⚠️ " } else { "  " };
        println!(
            "{} {}  {}  {:>3} events ({} errors)  {}",
            marker,
            summary.session_id,
            summary.last_activity_at.format("%Y-%m-%d %H:%M:%S"),
            summary.event_count,
            summary.error_count,
            summary.last_event,
        );
    }
    println!();

    Ok(())
}

async fn show(
    viewer: &AuditViewer,
    session_id: &str,
    event_type: Option<&str>,
    json: bool,
) -> Result<()> {
    let session_id =
        Uuid::parse_str(session_id).with_context(|| format!("Invalid session ID: {}", session_id))?;
    let event_type = event_type
        .map(|s| s.parse::<AuditEventType>().map_err(|e| anyhow!(e)))
        .transpose()?;

    if json {
        let mut detail = viewer.get_session_detail(session_id).await?;
        if let Some(kind) = event_type {
            detail.timeline.retain(|entry| entry.event_type == kind);
            detail.events.retain(|event| event.event_type == kind);
        }
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let timeline = viewer.get_timeline(session_id, event_type).await?;
    println!("\n📜 Session {}\n", session_id);
    if timeline.is_empty() {
        println!("  No matching events.");
    }
    for entry in &timeline {
        println!("  {}", format_entry(entry));
    }
    println!();

    Ok(())
}

fn format_entry(entry: &TimelineEntry) -> String {
    let icon = match entry.event_type {
        AuditEventType::UserAction => "👤",
        AuditEventType::System => "⚙️ ",
        AuditEventType::Error => "❌",
    };
    let elapsed = entry
        .elapsed_ms
        .map(|ms| format!(" (+{}ms)", ms))
        .unwrap_or_default();

    format!(
        "{:>3}. {} {} {}{}",
        entry.sequence_num,
        entry.timestamp.format("%H:%M:%S"),
        icon,
        entry.summary,
        elapsed
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_entry() {
        let entry = TimelineEntry {
            event_id: Uuid::new_v4(),
            sequence_num: 4,
            timestamp: Utc::now(),
            event_type: AuditEventType::Error,
            summary: "[crawl] crawl failed: network error".to_string(),
            elapsed_ms: Some(120),
        };

        let line = format_entry(&entry);
        assert!(line.starts_with("  4."));
        assert!(line.contains("❌"));
        assert!(line.contains("[crawl]"));
        assert!(line.ends_with("(+120ms)"));
    }
}
