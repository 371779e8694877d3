//! Command Handlers
//!
//! Business entry points for each registered chat command.

use crate::dispatch::CommandHandler;
use crate::types::CommandEvent;
use async_trait::async_trait;
use dreambot_core::application::{SubmissionService, SubmitRequest};
use dreambot_core::domain::RequesterToken;
use dreambot_core::{AppError, Result};
use std::sync::Arc;
use tracing::info;

/// "imagine" - submit a prompt to the generation queue
pub struct ImagineHandler {
    submissions: Arc<SubmissionService>,
}

impl ImagineHandler {
    pub fn new(submissions: Arc<SubmissionService>) -> Self {
        Self { submissions }
    }
}

#[async_trait]
impl CommandHandler for ImagineHandler {
    async fn handle(&self, event: CommandEvent) -> Result<()> {
        let prompt = event
            .options
            .get("prompt")
            .ok_or_else(|| AppError::Validation("Missing 'prompt' option".to_string()))?;

        let position = self
            .submissions
            .submit(SubmitRequest {
                prompt: prompt.clone(),
                requester_token: RequesterToken::new(event.requester_token),
            })
            .await?;

        info!(position, "Imagine request accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dreambot_core::application::RequestQueue;
    use dreambot_core::port::chat_interaction::mocks::RecordingChat;
    use dreambot_core::port::clock::mocks::SteppingClock;
    use dreambot_core::port::id_provider::mocks::SequentialIdProvider;
    use std::collections::HashMap;

    fn handler() -> (ImagineHandler, Arc<RecordingChat>) {
        let queue = Arc::new(RequestQueue::new());
        let chat = Arc::new(RecordingChat::new());
        let submissions = Arc::new(SubmissionService::new(
            queue,
            chat.clone(),
            Arc::new(SequentialIdProvider::new()),
            Arc::new(SteppingClock::new(1000, 1000)),
        ));
        (ImagineHandler::new(submissions), chat)
    }

    fn imagine_event(options: HashMap<String, String>) -> CommandEvent {
        CommandEvent {
            command: "imagine".to_string(),
            options,
            requester_token: "t1".to_string(),
        }
    }

    #[tokio::test]
    async fn imagine_submits_the_prompt_option() {
        let (handler, chat) = handler();
        let options = HashMap::from([("prompt".to_string(), "a cat".to_string())]);

        handler.handle(imagine_event(options)).await.unwrap();
        assert_eq!(chat.acks_for("t1").len(), 1);
    }

    #[tokio::test]
    async fn missing_prompt_is_a_validation_error() {
        let (handler, chat) = handler();

        let result = handler.handle(imagine_event(HashMap::new())).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(chat.acks().is_empty());
    }
}
