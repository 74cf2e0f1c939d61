//! Session state store
//!
//! A [`Session`] holds the working data of one user interaction. The calling
//! layer owns it and lends it to the orchestrator for each transition; only
//! the orchestrator mutates it.

use crate::executors::PipelineStage;
use crate::model::{Article, Draft, EnrichedArticle, PublishResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Opaque, globally unique session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh identifier
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SessionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Where a session is in the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    /// Waiting for a request
    Idle,
    /// Request text stored
    InputReceived,
    /// Search results stored
    ArticlesFetched,
    /// Article bodies stored
    ArticlesEnriched,
    /// Three drafts stored, none selected
    DraftsGenerated,
    /// A draft is selected and awaiting the publish decision
    DraftUnderReview,
    /// The publish executor is running
    PublishRequested,
    /// The selected draft was posted
    Published,
    /// Publishing was not available; the workflow ended without posting
    PublishSkipped,
    /// An executor failed; a new request is required
    Failed(PipelineStage),
}

impl WorkflowStage {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InputReceived => "input_received",
            Self::ArticlesFetched => "articles_fetched",
            Self::ArticlesEnriched => "articles_enriched",
            Self::DraftsGenerated => "drafts_generated",
            Self::DraftUnderReview => "draft_under_review",
            Self::PublishRequested => "publish_requested",
            Self::Published => "published",
            Self::PublishSkipped => "publish_skipped",
            Self::Failed(_) => "failed",
        }
    }

    /// Whether the workflow has ended and only `reset` remains
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Published | Self::PublishSkipped)
    }

    /// Whether a new request may be submitted from here
    #[must_use]
    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed(_))
    }
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed(stage) => write!(f, "failed({stage})"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Working data for one user interaction
///
/// A session can be stored between requests and read back. Deserialization
/// checks the stored data against the stage and keeps the audit sequence, so
/// a restored session continues its trail where it stopped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SessionRecord")]
pub struct Session {
    id: SessionId,
    stage: WorkflowStage,
    input_text: Option<String>,
    articles: Option<Vec<Article>>,
    enriched_articles: Option<Vec<EnrichedArticle>>,
    drafts: Option<Vec<Draft>>,
    selected_draft_number: Option<u8>,
    publish_result: Option<PublishResult>,
    created_at: DateTime<Utc>,
    audit_sequence: i32,
}

/// Stored session data that does not describe a reachable state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStateError {
    /// The stage needs data the record does not carry
    #[error("stage {stage} requires {missing}")]
    MissingData {
        /// Stored stage
        stage: WorkflowStage,
        /// Absent field
        missing: &'static str,
    },

    /// A later pipeline result is present without an earlier one
    #[error("{field} is set before the data it depends on")]
    OutOfOrder {
        /// Field that cannot exist yet
        field: &'static str,
    },

    /// The selection names no stored draft
    #[error("selected draft {0} is not among the stored drafts")]
    DanglingSelection(u8),

    /// The audit counter went below zero
    #[error("audit sequence {0} is negative")]
    NegativeSequence(i32),
}

#[derive(Deserialize)]
struct SessionRecord {
    id: SessionId,
    stage: WorkflowStage,
    input_text: Option<String>,
    articles: Option<Vec<Article>>,
    enriched_articles: Option<Vec<EnrichedArticle>>,
    drafts: Option<Vec<Draft>>,
    selected_draft_number: Option<u8>,
    publish_result: Option<PublishResult>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    audit_sequence: i32,
}

impl TryFrom<SessionRecord> for Session {
    type Error = SessionStateError;

    fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
        use WorkflowStage as S;

        if record.audit_sequence < 0 {
            return Err(SessionStateError::NegativeSequence(record.audit_sequence));
        }
        if record.enriched_articles.is_some() && record.articles.is_none() {
            return Err(SessionStateError::OutOfOrder {
                field: "enriched_articles",
            });
        }
        if record.drafts.is_some() && record.enriched_articles.is_none() {
            return Err(SessionStateError::OutOfOrder { field: "drafts" });
        }
        if record.articles.is_some() && record.input_text.is_none() {
            return Err(SessionStateError::OutOfOrder { field: "articles" });
        }

        if let Some(number) = record.selected_draft_number {
            let exists = record
                .drafts
                .as_deref()
                .is_some_and(|drafts| drafts.iter().any(|d| d.number == number));
            if !exists {
                return Err(SessionStateError::DanglingSelection(number));
            }
        }

        let stage = record.stage;
        let missing = |field| Err(SessionStateError::MissingData { stage, missing: field });
        match stage {
            S::InputReceived if record.input_text.is_none() => return missing("input_text"),
            S::ArticlesFetched if record.articles.is_none() => return missing("articles"),
            S::ArticlesEnriched if record.enriched_articles.is_none() => {
                return missing("enriched_articles")
            }
            S::DraftsGenerated if record.drafts.is_none() => return missing("drafts"),
            S::DraftUnderReview | S::PublishRequested | S::PublishSkipped
                if record.selected_draft_number.is_none() =>
            {
                return missing("selected_draft_number")
            }
            S::Published if record.publish_result.is_none() => return missing("publish_result"),
            S::Published if record.selected_draft_number.is_none() => {
                return missing("selected_draft_number")
            }
            _ => {}
        }

        Ok(Self {
            id: record.id,
            stage,
            input_text: record.input_text,
            articles: record.articles,
            enriched_articles: record.enriched_articles,
            drafts: record.drafts,
            selected_draft_number: record.selected_draft_number,
            publish_result: record.publish_result,
            created_at: record.created_at,
            audit_sequence: record.audit_sequence,
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Start a new interaction in `Idle` with a fresh id
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            stage: WorkflowStage::Idle,
            input_text: None,
            articles: None,
            enriched_articles: None,
            drafts: None,
            selected_draft_number: None,
            publish_result: None,
            created_at: Utc::now(),
            audit_sequence: 0,
        }
    }

    /// Session identifier
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current stage
    #[must_use]
    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    /// When this interaction started
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The request text
    #[must_use]
    pub fn input_text(&self) -> Option<&str> {
        self.input_text.as_deref()
    }

    /// Search results
    #[must_use]
    pub fn articles(&self) -> Option<&[Article]> {
        self.articles.as_deref()
    }

    /// Articles with extracted content
    #[must_use]
    pub fn enriched_articles(&self) -> Option<&[EnrichedArticle]> {
        self.enriched_articles.as_deref()
    }

    /// Generated drafts
    #[must_use]
    pub fn drafts(&self) -> Option<&[Draft]> {
        self.drafts.as_deref()
    }

    /// Number of the selected draft
    #[must_use]
    pub fn selected_draft_number(&self) -> Option<u8> {
        self.selected_draft_number
    }

    /// The selected draft itself
    #[must_use]
    pub fn selected_draft(&self) -> Option<&Draft> {
        let number = self.selected_draft_number?;
        self.drafts()?.iter().find(|d| d.number == number)
    }

    /// Publish outcome
    #[must_use]
    pub fn publish_result(&self) -> Option<&PublishResult> {
        self.publish_result.as_ref()
    }

    // ── Mutation (orchestrator only) ─────────────────────────────────

    pub(crate) fn next_audit_sequence(&mut self) -> i32 {
        self.audit_sequence += 1;
        self.audit_sequence
    }

    pub(crate) fn set_stage(&mut self, stage: WorkflowStage) {
        self.stage = stage;
    }

    /// Store a new request, dropping anything left from a failed attempt.
    pub(crate) fn begin_request(&mut self, text: String) {
        self.articles = None;
        self.enriched_articles = None;
        self.drafts = None;
        self.selected_draft_number = None;
        self.publish_result = None;
        self.input_text = Some(text);
        self.stage = WorkflowStage::InputReceived;
    }

    pub(crate) fn store_articles(&mut self, articles: Vec<Article>) {
        self.articles = Some(articles);
        self.stage = WorkflowStage::ArticlesFetched;
    }

    pub(crate) fn store_enriched_articles(&mut self, articles: Vec<EnrichedArticle>) {
        debug_assert!(self.articles.is_some());
        self.enriched_articles = Some(articles);
        self.stage = WorkflowStage::ArticlesEnriched;
    }

    pub(crate) fn store_drafts(&mut self, drafts: Vec<Draft>) {
        debug_assert!(self.enriched_articles.is_some());
        self.drafts = Some(drafts);
        self.selected_draft_number = None;
        self.stage = WorkflowStage::DraftsGenerated;
    }

    /// Record a selection. The caller has validated `number` against `drafts`.
    pub(crate) fn select(&mut self, number: u8) {
        debug_assert!(self.drafts().is_some_and(|d| d.iter().any(|d| d.number == number)));
        self.selected_draft_number = Some(number);
        self.stage = WorkflowStage::DraftUnderReview;
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected_draft_number = None;
    }

    pub(crate) fn store_publish_result(&mut self, result: PublishResult) {
        self.publish_result = Some(result);
        self.stage = WorkflowStage::Published;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle_and_empty() {
        let session = Session::new();
        assert_eq!(session.stage(), WorkflowStage::Idle);
        assert!(session.input_text().is_none());
        assert!(session.articles().is_none());
        assert!(session.drafts().is_none());
        assert!(session.selected_draft().is_none());
        assert_ne!(session.id(), Session::new().id());
    }

    #[test]
    fn test_begin_request_discards_previous_attempt() {
        let mut session = Session::new();
        session.begin_request("first".to_string());
        session.store_articles(vec![Article::new("a", "https://a")]);
        session.set_stage(WorkflowStage::Failed(PipelineStage::Crawl));

        let id = session.id();
        session.begin_request("second".to_string());
        assert_eq!(session.id(), id);
        assert_eq!(session.stage(), WorkflowStage::InputReceived);
        assert_eq!(session.input_text(), Some("second"));
        assert!(session.articles().is_none());
    }

    #[test]
    fn test_selected_draft_lookup() {
        let mut session = Session::new();
        session.begin_request("req".to_string());
        session.store_articles(vec![]);
        session.store_enriched_articles(vec![]);
        session.store_drafts(vec![Draft::new(1, "one"), Draft::new(2, "two"), Draft::new(3, "three")]);
        session.select(2);

        assert_eq!(session.stage(), WorkflowStage::DraftUnderReview);
        assert_eq!(session.selected_draft().map(|d| d.text.as_str()), Some("two"));
    }

    #[test]
    fn test_stage_display_and_serialization() {
        let failed = WorkflowStage::Failed(PipelineStage::Search);
        assert_eq!(failed.to_string(), "failed(search)");
        assert_eq!(
            serde_json::to_value(failed).unwrap(),
            serde_json::json!({"failed": "search"})
        );
        assert_eq!(
            serde_json::to_value(WorkflowStage::DraftUnderReview).unwrap(),
            serde_json::json!("draft_under_review")
        );
        assert!(WorkflowStage::Published.is_terminal());
        assert!(failed.accepts_input());
        assert!(!WorkflowStage::InputReceived.accepts_input());
    }

    fn reviewing() -> Session {
        let mut session = Session::new();
        session.begin_request("req".to_string());
        session.store_articles(vec![Article::new("a", "https://a")]);
        session.store_enriched_articles(vec![]);
        session.store_drafts(vec![Draft::new(1, "one"), Draft::new(2, "two"), Draft::new(3, "three")]);
        session.select(2);
        session
    }

    #[test]
    fn test_restored_session_keeps_audit_sequence() {
        let mut session = reviewing();
        for _ in 0..4 {
            session.next_audit_sequence();
        }

        let json = serde_json::to_string(&session).unwrap();
        let mut restored: Session = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.id(), session.id());
        assert_eq!(restored.stage(), WorkflowStage::DraftUnderReview);
        assert_eq!(restored.selected_draft().map(|d| d.number), Some(2));
        assert_eq!(restored.next_audit_sequence(), 5);
    }

    #[test]
    fn test_restore_rejects_dangling_selection() {
        let mut value = serde_json::to_value(reviewing()).unwrap();
        value["selected_draft_number"] = serde_json::json!(9);

        let err = serde_json::from_value::<Session>(value).unwrap_err();
        assert!(err.to_string().contains("selected draft 9"));
    }

    #[test]
    fn test_restore_rejects_inconsistent_stage_data() {
        let mut value = serde_json::to_value(reviewing()).unwrap();
        value["enriched_articles"] = serde_json::Value::Null;
        assert!(serde_json::from_value::<Session>(value).is_err());

        let mut value = serde_json::to_value(reviewing()).unwrap();
        value["selected_draft_number"] = serde_json::Value::Null;
        let err = serde_json::from_value::<Session>(value).unwrap_err();
        assert!(err.to_string().contains("selected_draft_number"));

        let mut value = serde_json::to_value(Session::new()).unwrap();
        value["audit_sequence"] = serde_json::json!(-1);
        assert!(serde_json::from_value::<Session>(value).is_err());
    }

    #[test]
    fn test_session_id_parse() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<SessionId>().is_err());
    }
}
