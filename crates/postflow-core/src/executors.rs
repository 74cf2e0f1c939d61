//! Stage executors
//!
//! One trait per external capability. Implementations live outside this
//! crate (speech-to-text, web search, crawling, text generation, posting);
//! the orchestrator only depends on these contracts.

use crate::model::{Article, AudioInput, Draft, EnrichedArticle, PublishResult};
use crate::session::SessionId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// The external capability a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Speech-to-text
    Transcription,
    /// Article search
    Search,
    /// Article content extraction
    Crawl,
    /// Draft text generation
    DraftGeneration,
    /// Posting to the social platform
    Publish,
}

impl PipelineStage {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transcription => "transcription",
            Self::Search => "search",
            Self::Crawl => "crawl",
            Self::DraftGeneration => "draft_generation",
            Self::Publish => "publish",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure raised by an executor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// The provider rejected or failed the request
    #[error("provider error: {0}")]
    Provider(String),

    /// The provider could not be reached
    #[error("network error: {0}")]
    Network(String),

    /// Credentials were rejected
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Input the executor cannot handle (e.g. an audio format)
    #[error("unsupported input: {0}")]
    Unsupported(String),

    /// The provider answered with nothing usable
    #[error("empty result: {0}")]
    EmptyResult(String),

    /// The provider answered with something that breaks the contract
    #[error("invalid output: {0}")]
    InvalidOutput(String),

    /// The call did not finish within the configured bound
    #[error("timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
}

impl ExecutorError {
    /// Short machine-readable kind, used in audit metadata
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Provider(_) => "provider",
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::Unsupported(_) => "unsupported",
            Self::EmptyResult(_) => "empty_result",
            Self::InvalidOutput(_) => "invalid_output",
            Self::Timeout(_) => "timeout",
        }
    }
}

/// Result type for executor calls
pub type ExecutorResult<T> = std::result::Result<T, ExecutorError>;

/// Speech-to-text
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a recording into request text
    async fn transcribe(&self, audio: &AudioInput, session_id: SessionId) -> ExecutorResult<String>;
}

/// Article search
#[async_trait::async_trait]
pub trait ArticleSearch: Send + Sync {
    /// Find source articles for a request, best match first
    async fn fetch_articles(&self, query: &str, session_id: SessionId)
        -> ExecutorResult<Vec<Article>>;
}

/// Article content extraction
///
/// Implementations may skip articles they cannot fetch and return fewer
/// items, but never more than they were given.
#[async_trait::async_trait]
pub trait ContentCrawler: Send + Sync {
    /// Fetch and extract the body of each article
    async fn enrich(
        &self,
        articles: &[Article],
        session_id: SessionId,
    ) -> ExecutorResult<Vec<EnrichedArticle>>;
}

/// Draft text generation
#[async_trait::async_trait]
pub trait DraftGenerator: Send + Sync {
    /// Produce exactly three drafts numbered 1, 2 and 3
    async fn generate(
        &self,
        articles: &[EnrichedArticle],
        session_id: SessionId,
    ) -> ExecutorResult<Vec<Draft>>;
}

/// Posting to the social platform
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    /// Publish a post body
    async fn publish(&self, text: &str, session_id: SessionId) -> ExecutorResult<PublishResult>;
}
