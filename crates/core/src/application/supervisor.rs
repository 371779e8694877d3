// Supervisor - owns the queue lifetime and the worker task

use crate::application::queue::RequestQueue;
use crate::application::worker::{
    shutdown_channel, ShutdownHandle, Worker, GRACEFUL_SHUTDOWN_TIMEOUT,
};
use crate::error::{AppError, Result};
use crate::port::{ChatInteraction, GenerationClient};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Owns startup and shutdown of the worker loop and the lifetime of the
/// request queue. Collaborators are injected at construction; nothing is
/// read from process-global state.
pub struct Supervisor {
    queue: Arc<RequestQueue>,
    shutdown: ShutdownHandle,
    worker_handle: JoinHandle<()>,
}

impl Supervisor {
    /// Create the queue and launch the worker loop.
    pub fn start(backend: Arc<dyn GenerationClient>, chat: Arc<dyn ChatInteraction>) -> Self {
        let queue = Arc::new(RequestQueue::new());
        let (shutdown, token) = shutdown_channel();

        let worker = Worker::new(queue.clone(), backend, chat);
        let worker_handle = tokio::spawn(async move { worker.run(token).await });
        info!("Supervisor started generation worker");

        Self {
            queue,
            shutdown,
            worker_handle,
        }
    }

    /// Shared handle for the submission path.
    pub fn queue(&self) -> Arc<RequestQueue> {
        self.queue.clone()
    }

    /// Graceful shutdown: stop accepting submissions, signal the worker,
    /// and wait for it to finish the in-flight request.
    ///
    /// The in-flight request may complete and deliver its result within
    /// the graceful timeout; requests still pending and not yet dequeued
    /// are abandoned without delivery.
    pub async fn shutdown(self) -> Result<()> {
        info!("Supervisor shutting down");
        self.queue.close().await;
        self.shutdown.trigger();

        match tokio::time::timeout(GRACEFUL_SHUTDOWN_TIMEOUT, self.worker_handle).await {
            Ok(Ok(())) => {
                info!("Worker stopped cleanly");
                Ok(())
            }
            Ok(Err(join_err)) => Err(AppError::Internal(format!(
                "Worker task failed: {join_err}"
            ))),
            Err(_) => Err(AppError::Internal(
                "Worker did not stop within the shutdown timeout".to_string(),
            )),
        }
    }
}
