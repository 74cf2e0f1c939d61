//! Search, crawl and draft generation

use crate::error::Result;
use crate::executors::{ExecutorError, ExecutorResult, PipelineStage};
use crate::model::Draft;
use crate::session::{Session, WorkflowStage};
use crate::validator::DRAFT_NUMBERS;
use postflow_replay::AuditEventType;
use tracing::{info, instrument};

use super::core::Orchestrator;

impl Orchestrator {
    /// Run search, crawl and draft generation for the stored request
    ///
    /// Valid from `InputReceived`. Each step stores its output and advances
    /// the stage; the first failing step moves the session to
    /// `Failed(step)` and the remaining steps are skipped.
    #[instrument(skip(self, session), fields(session_id = %session.id(), stage = %session.stage()))]
    pub async fn run_pipeline(&self, session: &mut Session) -> Result<()> {
        if session.stage() != WorkflowStage::InputReceived {
            return Err(self.reject_transition(session, "run pipeline").await);
        }

        let session_id = session.id();
        let query = session.input_text().unwrap_or_default().to_string();

        // Search
        let stage = PipelineStage::Search;
        let articles = match self
            .call_executor(stage, session_id, self.search.fetch_articles(&query, session_id))
            .await
        {
            Ok(articles) => articles,
            Err(e) => return Err(self.fail_stage(session, stage, e).await),
        };

        let count = articles.len();
        let metadata = serde_json::json!({
            "count": count,
            "urls": articles.iter().map(|a| a.url.as_str()).collect::<Vec<_>>(),
        });
        session.store_articles(articles);
        info!(session_id = %session_id, count, "Articles fetched");
        self.audit
            .record(
                session,
                AuditEventType::System,
                format!("Found {} relevant articles", count),
                Some(metadata),
            )
            .await;

        // Crawl
        let stage = PipelineStage::Crawl;
        let fetched = session.articles().unwrap_or_default().to_vec();
        let enriched = match self
            .call_executor(stage, session_id, self.crawler.enrich(&fetched, session_id))
            .await
        {
            Ok(enriched) if enriched.len() > fetched.len() => {
                let source = ExecutorError::InvalidOutput(format!(
                    "crawler returned {} articles for {} inputs",
                    enriched.len(),
                    fetched.len()
                ));
                return Err(self.fail_stage(session, stage, source).await);
            }
            Ok(enriched) => enriched,
            Err(e) => return Err(self.fail_stage(session, stage, e).await),
        };

        let count = enriched.len();
        let metadata = serde_json::json!({"count": count, "skipped": fetched.len() - count});
        session.store_enriched_articles(enriched);
        info!(session_id = %session_id, count, "Articles enriched");
        self.audit
            .record(
                session,
                AuditEventType::System,
                format!("Extracted content from {} articles", count),
                Some(metadata),
            )
            .await;

        // Draft generation
        let stage = PipelineStage::DraftGeneration;
        let sources = session.enriched_articles().unwrap_or_default().to_vec();
        let drafts = match self
            .call_executor(stage, session_id, self.generator.generate(&sources, session_id))
            .await
            .and_then(check_draft_batch)
        {
            Ok(drafts) => drafts,
            Err(e) => return Err(self.fail_stage(session, stage, e).await),
        };

        let metadata = serde_json::json!({"drafts": drafts});
        session.store_drafts(drafts);
        info!(session_id = %session_id, "Drafts generated");
        self.audit
            .record(
                session,
                AuditEventType::System,
                "Generated 3 drafts",
                Some(metadata),
            )
            .await;

        Ok(())
    }
}

/// Require exactly one draft for each of 1, 2 and 3, returned in that order
fn check_draft_batch(mut drafts: Vec<Draft>) -> ExecutorResult<Vec<Draft>> {
    drafts.sort_by_key(|d| d.number);
    let numbers: Vec<u8> = drafts.iter().map(|d| d.number).collect();

    if numbers != DRAFT_NUMBERS {
        return Err(ExecutorError::InvalidOutput(format!(
            "expected drafts numbered {:?}, got {:?}",
            DRAFT_NUMBERS, numbers
        )));
    }

    Ok(drafts)
}
