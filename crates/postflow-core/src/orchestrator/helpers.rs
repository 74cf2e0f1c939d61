//! Orchestrator helper methods
//!
//! Contains utility methods for the Orchestrator:
//! - Bounded executor invocation
//! - Stage failure and invalid transition handling

use crate::error::Error;
use crate::executors::{ExecutorError, ExecutorResult, PipelineStage};
use crate::session::{Session, SessionId, WorkflowStage};
use postflow_replay::AuditEventType;
use std::future::Future;
use std::time::Instant;
use tracing::{debug, warn};

use super::core::Orchestrator;

impl Orchestrator {
    /// Await an executor call under the configured timeout
    pub(crate) async fn call_executor<T, F>(
        &self,
        stage: PipelineStage,
        session_id: SessionId,
        call: F,
    ) -> ExecutorResult<T>
    where
        F: Future<Output = ExecutorResult<T>>,
    {
        let timeout = self.config.executor_timeout;
        let started = Instant::now();

        let result = match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ExecutorError::Timeout(timeout)),
        };

        debug!(
            session_id = %session_id,
            stage = %stage,
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "Executor call finished"
        );

        result
    }

    /// Move the session to `Failed(stage)` and record the failure
    pub(crate) async fn fail_stage(
        &self,
        session: &mut Session,
        stage: PipelineStage,
        source: ExecutorError,
    ) -> Error {
        session.set_stage(WorkflowStage::Failed(stage));
        warn!(
            session_id = %session.id(),
            stage = %stage,
            error = %source,
            "Pipeline stage failed"
        );

        let metadata = serde_json::json!({
            "stage": stage,
            "error_kind": source.kind(),
            "error": source.to_string(),
        });
        self.audit
            .record(
                session,
                AuditEventType::Error,
                format!("{} failed: {}", stage, source),
                Some(metadata),
            )
            .await;

        Error::Stage { stage, source }
    }

    /// Record an operation attempted from the wrong stage
    pub(crate) async fn reject_transition(
        &self,
        session: &mut Session,
        operation: &'static str,
    ) -> Error {
        let stage = session.stage();
        warn!(
            session_id = %session.id(),
            operation,
            stage = %stage,
            "Invalid workflow transition"
        );

        let metadata = serde_json::json!({
            "operation": operation,
            "current_stage": stage.to_string(),
        });
        self.audit
            .record(
                session,
                AuditEventType::Error,
                format!("Cannot {} while session is {}", operation, stage),
                Some(metadata),
            )
            .await;

        Error::InvalidTransition { operation, stage }
    }
}
