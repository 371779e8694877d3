// Worker - serialized generation loop

pub mod constants;
mod shutdown;

pub use constants::GRACEFUL_SHUTDOWN_TIMEOUT;
pub use shutdown::{shutdown_channel, ShutdownHandle, ShutdownToken};

use crate::application::queue::RequestQueue;
use crate::domain::GenerationRequest;
use crate::error::Result;
use crate::port::{ChatInteraction, GenerationClient, ReplyContent};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Single consumer of the request queue.
///
/// Exactly one generate call is ever outstanding: the backend is slow and
/// rate-limited, and the queue position reported at submission is only
/// meaningful because processing is strictly serialized. Scaling out
/// would mean multiple independent workers each with their own queue, not
/// concurrency inside this loop.
pub struct Worker {
    queue: Arc<RequestQueue>,
    backend: Arc<dyn GenerationClient>,
    chat: Arc<dyn ChatInteraction>,
}

impl Worker {
    pub fn new(
        queue: Arc<RequestQueue>,
        backend: Arc<dyn GenerationClient>,
        chat: Arc<dyn ChatInteraction>,
    ) -> Self {
        Self {
            queue,
            backend,
            chat,
        }
    }

    /// Run the worker loop until shutdown is signalled or the queue
    /// closes. The stop signal is observed between requests, never
    /// preemptively.
    pub async fn run(&self, mut shutdown: ShutdownToken) {
        info!("Worker started");
        loop {
            if shutdown.is_shutdown() {
                info!("Worker shutting down");
                break;
            }
            let request = tokio::select! {
                next = self.queue.next() => match next {
                    Some(request) => request,
                    None => {
                        info!("Queue closed, worker exiting");
                        break;
                    }
                },
                _ = shutdown.wait() => {
                    info!("Worker interrupted while idle");
                    break;
                }
            };

            // A single request's failure never halts the loop.
            if let Err(e) = self.process(request).await {
                error!(error = %e, "Request processing aborted");
            }
            self.queue.finish().await;
        }
        info!("Worker stopped");
    }

    /// Drive one request to a terminal status and deliver the outcome.
    async fn process(&self, mut request: GenerationRequest) -> Result<()> {
        request.start()?;
        info!(
            request_id = %request.id,
            prompt = %request.prompt,
            "Processing generation request"
        );

        // Single attempt; any backend error is terminal for this request.
        match self.backend.generate(&request.prompt).await {
            Ok(result) => {
                request.complete()?;
                info!(
                    request_id = %request.id,
                    images = result.images.len(),
                    "Generation completed"
                );
                let content =
                    ReplyContent::with_images(completion_text(&request.prompt), result.images);
                self.deliver(&request, content).await;
            }
            Err(e) => {
                request.fail();
                warn!(request_id = %request.id, error = %e, "Generation failed");
                self.deliver(&request, ReplyContent::text_only(failure_text(&request.prompt)))
                    .await;
            }
        }
        Ok(())
    }

    /// Attempt the terminal edit. Delivery failures are logged and
    /// swallowed: no retry, no alternate path, the requester may silently
    /// miss the update.
    async fn deliver(&self, request: &GenerationRequest, content: ReplyContent) {
        if let Err(e) = self.chat.edit(&request.requester_token, content).await {
            warn!(request_id = %request.id, error = %e, "Outcome delivery failed");
        }
    }
}

fn completion_text(prompt: &str) -> String {
    format!("Here is what I imagined for \"{prompt}\".")
}

fn failure_text(prompt: &str) -> String {
    format!("I could not imagine \"{prompt}\". Please try again later.")
}
