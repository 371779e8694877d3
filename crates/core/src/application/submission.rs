// Submission Use Case

use crate::application::queue::RequestQueue;
use crate::domain::{GenerationRequest, RequesterToken};
use crate::error::{AppError, Result};
use crate::port::{ChatInteraction, Clock, IdProvider};
use std::sync::Arc;
use tracing::warn;

/// Longest prompt accepted on submission; chat platforms cap message
/// length around this.
const MAX_PROMPT_LENGTH: usize = 2000;

/// Plain submission request, as handed over by the chat front end after
/// it parsed the inbound command payload.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub prompt: String,
    pub requester_token: RequesterToken,
}

/// Submission Service
///
/// The single way work enters the core: validates the prompt, builds the
/// domain request with injected ID and timestamp, enqueues it and
/// acknowledges the requester with the assigned position.
pub struct SubmissionService {
    queue: Arc<RequestQueue>,
    chat: Arc<dyn ChatInteraction>,
    id_provider: Arc<dyn IdProvider>,
    clock: Arc<dyn Clock>,
}

impl SubmissionService {
    pub fn new(
        queue: Arc<RequestQueue>,
        chat: Arc<dyn ChatInteraction>,
        id_provider: Arc<dyn IdProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            queue,
            chat,
            id_provider,
            clock,
        }
    }

    /// Accept a submission and return its 1-indexed queue position.
    ///
    /// On success the requester has been acknowledged exactly once (ack
    /// delivery failures are logged and swallowed; the request still
    /// processes). On `QueueUnavailable` no ack is ever sent and the
    /// caller must surface the failure to the requester itself.
    pub async fn submit(&self, req: SubmitRequest) -> Result<usize> {
        validate_prompt(&req.prompt)?;

        let request = GenerationRequest::new(
            self.id_provider.generate_id(),
            self.clock.now_millis(),
            req.prompt,
            req.requester_token.clone(),
        );
        let position = self.queue.submit(request).await?;

        if let Err(e) = self.chat.ack(&req.requester_token, position).await {
            warn!(
                token = %req.requester_token,
                position,
                error = %e,
                "Acknowledgment delivery failed"
            );
        }

        Ok(position)
    }
}

fn validate_prompt(prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(AppError::Validation("Prompt must not be empty".to_string()));
    }
    if prompt.len() > MAX_PROMPT_LENGTH {
        return Err(AppError::Validation(format!(
            "Prompt too long: {} bytes (max {})",
            prompt.len(),
            MAX_PROMPT_LENGTH
        )));
    }
    Ok(())
}
