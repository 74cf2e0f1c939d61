//! Draft choice

use crate::error::{Error, Result};
use crate::session::{Session, WorkflowStage};
use crate::validator::validate_selection;
use postflow_replay::AuditEventType;
use tracing::{info, instrument, warn};

use super::core::Orchestrator;

impl Orchestrator {
    /// Select a draft by the number the user typed
    ///
    /// Valid from `DraftsGenerated` and `DraftUnderReview`. On a bad token
    /// any earlier selection is dropped and the stage stays put.
    #[instrument(skip(self, session), fields(session_id = %session.id(), stage = %session.stage()))]
    pub async fn select_draft(&self, session: &mut Session, choice: &str) -> Result<u8> {
        if !matches!(
            session.stage(),
            WorkflowStage::DraftsGenerated | WorkflowStage::DraftUnderReview
        ) {
            return Err(self.reject_transition(session, "select draft").await);
        }

        let drafts = session.drafts().unwrap_or_default();
        let number = match validate_selection(choice, drafts) {
            Ok(number) => number,
            Err(e) => {
                session.clear_selection();
                warn!(session_id = %session.id(), error = %e, "Draft selection rejected");
                self.audit
                    .record(
                        session,
                        AuditEventType::Error,
                        format!("Invalid selection: {}", e),
                        Some(serde_json::json!({"reason": e.kind(), "input": choice})),
                    )
                    .await;
                return Err(Error::Validation(e));
            }
        };

        session.select(number);
        let metadata = serde_json::json!({"selected_draft": session.selected_draft()});
        info!(session_id = %session.id(), number, "Draft selected");
        self.audit
            .record(
                session,
                AuditEventType::UserAction,
                format!("Selected draft {}", number),
                Some(metadata),
            )
            .await;

        Ok(number)
    }

    /// Drop the current choice and go back to the three drafts
    #[instrument(skip(self, session), fields(session_id = %session.id(), stage = %session.stage()))]
    pub async fn choose_different_draft(&self, session: &mut Session) -> Result<()> {
        if session.stage() != WorkflowStage::DraftUnderReview {
            return Err(self.reject_transition(session, "choose a different draft").await);
        }

        let previous = session.selected_draft_number();
        session.clear_selection();
        session.set_stage(WorkflowStage::DraftsGenerated);
        info!(session_id = %session.id(), "Returned to draft list");
        self.audit
            .record(
                session,
                AuditEventType::UserAction,
                "Choosing a different draft",
                Some(serde_json::json!({"previous_draft": previous})),
            )
            .await;

        Ok(())
    }
}
