//! Request submission

use crate::error::{Error, InputError, Result};
use crate::executors::{ExecutorError, PipelineStage};
use crate::model::AudioInput;
use crate::session::Session;
use postflow_replay::AuditEventType;
use tracing::{info, instrument};

use super::core::Orchestrator;

impl Orchestrator {
    /// Store a text request and move to `InputReceived`
    ///
    /// Accepted from `Idle`, and from `Failed(_)` to start over. Leading and
    /// trailing whitespace is stripped; a blank request is rejected and the
    /// session is left as it was.
    #[instrument(skip(self, session, text), fields(session_id = %session.id(), stage = %session.stage()))]
    pub async fn submit_input(&self, session: &mut Session, text: &str) -> Result<()> {
        if !session.stage().accepts_input() {
            return Err(self.reject_transition(session, "submit input").await);
        }

        let text = text.trim();
        if text.is_empty() {
            self.audit
                .record(
                    session,
                    AuditEventType::Error,
                    "Input rejected: request is empty",
                    Some(serde_json::json!({"reason": "empty_input"})),
                )
                .await;
            return Err(Error::Input(InputError::Empty));
        }

        let metadata = serde_json::json!({"input_text": text, "source": "text"});
        self.accept_request(session, text.to_string(), metadata).await;
        Ok(())
    }

    /// Transcribe a recording and store it as the request
    ///
    /// Valid where [`submit_input`](Self::submit_input) is. A transcriber
    /// error, a missing transcriber or a blank transcript puts the session in
    /// `Failed(Transcription)`.
    #[instrument(skip(self, session, audio), fields(session_id = %session.id(), stage = %session.stage()))]
    pub async fn submit_audio(&self, session: &mut Session, audio: &AudioInput) -> Result<()> {
        if !session.stage().accepts_input() {
            return Err(self.reject_transition(session, "submit audio").await);
        }

        let stage = PipelineStage::Transcription;
        let Some(transcriber) = self.transcriber.clone() else {
            let source = ExecutorError::Unsupported("no transcriber is configured".to_string());
            return Err(self.fail_stage(session, stage, source).await);
        };

        let transcript = match self
            .call_executor(stage, session.id(), transcriber.transcribe(audio, session.id()))
            .await
        {
            Ok(text) => text,
            Err(e) => return Err(self.fail_stage(session, stage, e).await),
        };

        let text = transcript.trim();
        if text.is_empty() {
            let source = ExecutorError::EmptyResult("transcript is empty".to_string());
            return Err(self.fail_stage(session, stage, source).await);
        }

        let metadata = serde_json::json!({
            "input_text": text,
            "source": "audio",
            "format": audio.format.extension(),
            "audio_bytes": audio.bytes.len(),
        });
        self.accept_request(session, text.to_string(), metadata).await;
        Ok(())
    }

    async fn accept_request(
        &self,
        session: &mut Session,
        text: String,
        metadata: serde_json::Value,
    ) {
        let content = format!("Request submitted: {}", text);
        session.begin_request(text);
        info!(session_id = %session.id(), "Request received");

        self.audit
            .record(session, AuditEventType::UserAction, content, Some(metadata))
            .await;
    }
}
