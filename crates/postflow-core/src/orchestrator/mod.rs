//! Orchestrator - Session workflow state machine
//!
//! This module drives one session from request to post, invoking the stage
//! executors in order and recording every transition to the audit log.
//!
//! # Module Structure
//!
//! - `config`: Configuration types (OrchestratorConfig)
//! - `core`: Orchestrator struct and builder methods
//! - `input`: Request submission (text and audio)
//! - `pipeline`: Search, crawl and draft generation
//! - `selection`: Draft choice and re-choice
//! - `publish`: Publishing and reset
//! - `helpers`: Executor invocation and transition guards

mod config;
mod core;
mod helpers;
mod input;
mod pipeline;
mod publish;
mod selection;


// Re-export public types
pub use config::OrchestratorConfig;
pub use core::Orchestrator;
