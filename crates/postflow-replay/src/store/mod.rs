//! Store - Audit event persistence
//!
//! This module provides the [`AuditSink`] contract and two implementations:
//! an in-process store for tests and embedded hosts, and a SQLite store
//! (sqlx, embedded, no server required) for durable trails.

mod audit_store;
mod events;
mod helpers;
mod memory;
mod traits;


pub use audit_store::AuditStore;
pub use events::*;
pub use helpers::{default_data_dir, default_db_path};
pub use memory::MemoryAuditStore;
pub use traits::AuditSink;
