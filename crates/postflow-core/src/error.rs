//! Error types for postflow-core
//!
//! This module provides the workflow error taxonomy and user-friendly
//! error formatting.

use crate::executors::{ExecutorError, PipelineStage};
use crate::session::WorkflowStage;
use crate::validator::ValidationError;
use thiserror::Error;

/// Rejected user input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Nothing but whitespace was submitted
    #[error("request is empty")]
    Empty,
}

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// The request text was unusable; the session is unchanged
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// A pipeline executor failed; the session is in `Failed(stage)`
    #[error("{stage} failed: {source}")]
    Stage {
        /// Which executor failed
        stage: PipelineStage,
        /// What went wrong
        #[source]
        source: ExecutorError,
    },

    /// The draft choice was rejected; the session is unchanged
    #[error("invalid selection: {0}")]
    Validation(#[from] ValidationError),

    /// Posting failed; the session is back in review and may retry
    #[error("publish failed: {0}")]
    Publish(#[source] ExecutorError),

    /// The operation is not allowed from the session's current stage
    #[error("cannot {operation} while session is {stage}")]
    InvalidTransition {
        /// Operation that was attempted
        operation: &'static str,
        /// Stage the session was in
        stage: WorkflowStage,
    },

    /// Invalid orchestrator configuration
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Whether the caller can simply re-prompt and try again
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Input(_) | Error::Validation(_) | Error::Publish(_)
        )
    }

    /// The external stage involved, if any
    #[must_use]
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Error::Stage { stage, .. } => Some(*stage),
            Error::Publish(_) => Some(PipelineStage::Publish),
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for user-friendly error messages
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get a suggestion for how to fix the error
    fn suggestion(&self) -> Option<String>;
}

fn stage_label(stage: PipelineStage) -> &'static str {
    match stage {
        PipelineStage::Transcription => "Transcribing audio",
        PipelineStage::Search => "Fetching relevant articles",
        PipelineStage::Crawl => "Analyzing article content",
        PipelineStage::DraftGeneration => "Generating drafts",
        PipelineStage::Publish => "Posting",
    }
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::Input(InputError::Empty) => "📝 Please enter a request first.".to_string(),
            Error::Stage { stage, source } => {
                format!("❌ {} failed: {}", stage_label(*stage), source)
            }
            Error::Validation(e) => format!("❌ {}", e),
            Error::Publish(e) => format!("❌ Error posting: {}", e),
            Error::InvalidTransition { operation, stage } => {
                format!("⚠️ Cannot {} right now (session is {}).", operation, stage)
            }
            Error::Configuration(msg) => format!("⚙️ Configuration error: {}", msg),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::Input(_) => {
                Some("💡 Example: Create a tweet about AI technology".to_string())
            }
            Error::Stage {
                source: ExecutorError::Timeout(_),
                ..
            } => Some("💡 The service was slow to answer. Submit the request again.".to_string()),
            Error::Stage { .. } => {
                Some("💡 Submit the request again to restart the workflow.".to_string())
            }
            Error::Validation(_) => Some("💡 Enter 1, 2, or 3.".to_string()),
            Error::Publish(ExecutorError::Auth(_)) => {
                Some("💡 Check the publishing credentials, then retry.".to_string())
            }
            Error::Publish(_) => {
                Some("💡 Retry posting, or choose a different draft.".to_string())
            }
            Error::InvalidTransition { .. } => None,
            Error::Configuration(_) => {
                Some("💡 Check the [orchestrator] section of the configuration.".to_string())
            }
        }
    }
}

/// Format an error for display in the CLI
pub fn format_error_for_cli(error: &Error) -> String {
    let mut output = String::new();

    output.push_str(&error.user_message());
    output.push_str("\n\n");

    if let Some(suggestion) = error.suggestion() {
        output.push_str(&suggestion);
        output.push('\n');
    }

    output
}

/// Format an error for display in a chat message
pub fn format_error_for_chat(error: &Error) -> String {
    let mut output = error.user_message();

    if let Some(suggestion) = error.suggestion() {
        output.push_str("\n\n");
        output.push_str(&suggestion);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_stage_error_names_stage_and_cause() {
        let error = Error::Stage {
            stage: PipelineStage::Crawl,
            source: ExecutorError::Network("connection reset".to_string()),
        };

        let msg = error.user_message();
        assert!(msg.contains("Analyzing article content"));
        assert!(msg.contains("connection reset"));
        assert!(!error.is_recoverable());
        assert_eq!(error.stage(), Some(PipelineStage::Crawl));
    }

    #[test]
    fn test_timeout_suggestion() {
        let error = Error::Stage {
            stage: PipelineStage::Search,
            source: ExecutorError::Timeout(Duration::from_secs(30)),
        };
        assert!(error.suggestion().unwrap().contains("slow"));
    }

    #[test]
    fn test_publish_error_is_recoverable() {
        let error = Error::Publish(ExecutorError::Auth("401".to_string()));
        assert!(error.is_recoverable());
        assert_eq!(error.stage(), Some(PipelineStage::Publish));
        assert!(error.suggestion().unwrap().contains("credentials"));
    }

    #[test]
    fn test_invalid_transition_message() {
        let error = Error::InvalidTransition {
            operation: "request publish",
            stage: WorkflowStage::DraftsGenerated,
        };
        assert_eq!(
            error.to_string(),
            "cannot request publish while session is drafts_generated"
        );
        assert!(error.suggestion().is_none());
    }

    #[test]
    fn test_format_error_for_cli() {
        let error = Error::Validation(ValidationError::NotANumber {
            token: "abc".to_string(),
        });

        let output = format_error_for_cli(&error);
        assert!(output.contains("'abc' is not a number"));
        assert!(output.contains("Enter 1, 2, or 3"));
    }

    #[test]
    fn test_format_error_for_chat() {
        let error = Error::Input(InputError::Empty);

        let output = format_error_for_chat(&error);
        assert!(output.contains("enter a request"));
        assert!(output.contains("Example"));
    }
}
