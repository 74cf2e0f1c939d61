//! Publishing and reset

use crate::error::{Error, Result};
use crate::executors::{ExecutorError, PipelineStage};
use crate::model::PublishResult;
use crate::session::{Session, SessionId, WorkflowStage};
use postflow_replay::AuditEventType;
use tracing::{info, instrument, warn};

use super::core::Orchestrator;

impl Orchestrator {
    /// Publish the selected draft
    ///
    /// Valid from `DraftUnderReview` with a draft selected. Returns
    /// `Ok(None)` when publishing is not available: the session ends in
    /// `PublishSkipped` and the publisher is never called. A failed post
    /// returns the session to `DraftUnderReview` so it can be retried.
    #[instrument(skip(self, session), fields(session_id = %session.id(), stage = %session.stage()))]
    pub async fn request_publish(&self, session: &mut Session) -> Result<Option<PublishResult>> {
        let selected = match (session.stage(), session.selected_draft()) {
            (WorkflowStage::DraftUnderReview, Some(draft)) => draft.clone(),
            _ => return Err(self.reject_transition(session, "request publish").await),
        };

        let publisher = match (&self.publisher, self.config.publish_enabled) {
            (Some(publisher), true) => publisher.clone(),
            (_, enabled) => {
                let reason = if enabled {
                    "no publisher is configured"
                } else {
                    "publishing is disabled"
                };
                session.set_stage(WorkflowStage::PublishSkipped);
                info!(session_id = %session.id(), reason, "Publish skipped");
                self.audit
                    .record(
                        session,
                        AuditEventType::System,
                        format!("Publish skipped: {}", reason),
                        Some(serde_json::json!({
                            "reason": reason,
                            "draft_number": selected.number,
                            "selected_draft": selected,
                        })),
                    )
                    .await;
                return Ok(None);
            }
        };

        session.set_stage(WorkflowStage::PublishRequested);
        self.audit
            .record(
                session,
                AuditEventType::System,
                format!("Publishing draft {}", selected.number),
                Some(serde_json::json!({
                    "draft_number": selected.number,
                    "selected_draft": selected,
                })),
            )
            .await;

        let session_id = session.id();
        let outcome = self
            .call_executor(
                PipelineStage::Publish,
                session_id,
                publisher.publish(&selected.text, session_id),
            )
            .await
            .and_then(|result| {
                if result.success {
                    Ok(result)
                } else {
                    Err(ExecutorError::Provider(format!(
                        "platform did not accept the post (id '{}')",
                        result.external_id
                    )))
                }
            });

        match outcome {
            Ok(result) => {
                let metadata = serde_json::json!({
                    "external_id": result.external_id,
                    "draft_number": selected.number,
                    "selected_draft": selected,
                });
                let content = format!("Published draft {} as {}", selected.number, result.external_id);
                session.store_publish_result(result.clone());
                info!(session_id = %session_id, external_id = %result.external_id, "Draft published");
                self.audit
                    .record(session, AuditEventType::System, content, Some(metadata))
                    .await;
                Ok(Some(result))
            }
            Err(e) => {
                session.set_stage(WorkflowStage::DraftUnderReview);
                warn!(session_id = %session_id, error = %e, "Publish failed");
                let metadata = serde_json::json!({
                    "stage": PipelineStage::Publish,
                    "error_kind": e.kind(),
                    "error": e.to_string(),
                    "draft_number": selected.number,
                    "selected_draft": selected,
                });
                self.audit
                    .record(
                        session,
                        AuditEventType::Error,
                        format!("Error posting: {}", e),
                        Some(metadata),
                    )
                    .await;
                Err(Error::Publish(e))
            }
        }
    }

    /// Abandon the session and start a fresh one
    ///
    /// Valid from any stage. The reset is recorded under the outgoing
    /// session id; the new session has a new id and starts `Idle`.
    #[instrument(skip(self, session), fields(session_id = %session.id(), stage = %session.stage()))]
    pub async fn reset(&self, session: &mut Session) -> SessionId {
        let previous_stage = session.stage();
        self.audit
            .record(
                session,
                AuditEventType::System,
                "Session reset",
                Some(serde_json::json!({"previous_stage": previous_stage.to_string()})),
            )
            .await;

        let old_id = session.id();
        *session = Session::new();
        info!(old_session_id = %old_id, session_id = %session.id(), "Session reset");
        session.id()
    }
}
