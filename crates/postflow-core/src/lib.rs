//! Postflow Core - Session workflow orchestration
//!
//! This crate drives a single user interaction from a request (text or
//! audio) to a published social-media post:
//! - Session: per-interaction working data and the current stage
//! - Executors: contracts for the external services the workflow calls
//! - Validator: parsing and bounds-checking of the user's draft choice
//! - Audit: fire-and-forget recording of every transition and failure
//! - Orchestrator: the state machine tying the pieces together

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
pub mod error;
pub mod executors;
pub mod model;
pub mod orchestrator;
pub mod session;
pub mod validator;

pub use audit::{AuditFailure, AuditLog};
pub use error::{format_error_for_chat, format_error_for_cli, Error, InputError, Result, UserFriendlyError};
pub use executors::{
    ArticleSearch, ContentCrawler, DraftGenerator, ExecutorError, ExecutorResult, PipelineStage,
    Publisher, Transcriber,
};
pub use model::{Article, AudioFormat, AudioInput, Draft, EnrichedArticle, PublishResult};
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use session::{Session, SessionId, SessionStateError, WorkflowStage};
pub use validator::{validate_selection, ValidationError, DRAFT_NUMBERS};

pub use postflow_replay::{AuditEvent, AuditEventType, AuditSink};
