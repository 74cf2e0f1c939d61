//! Postflow Replay - Audit log
//!
//! This crate provides the append-only audit trail for postflow sessions:
//! - Event: audit event types and schemas
//! - Store: the `AuditSink` contract plus in-memory and SQLite sinks
//! - Viewer: per-session timelines and summaries

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod store;
pub mod viewer;

pub use error::{Error, Result};
pub use event::{AuditEvent, AuditEventType, TimelineEntry};
pub use store::{default_data_dir, default_db_path, AuditStore, AuditSink, MemoryAuditStore};
pub use viewer::{AuditViewer, SessionDetail, SessionSummary};
