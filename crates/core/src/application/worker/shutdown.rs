// Cooperative shutdown signalling between supervisor and worker

use tokio::sync::watch;

/// Receiver half, observed by the worker between requests. Shutdown is
/// cooperative only; an in-flight generation call is never cancelled.
#[derive(Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    /// Check whether shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for the shutdown signal
    pub async fn wait(&mut self) {
        let _ = self.rx.changed().await;
    }
}

/// Sender half, held by the supervisor
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    /// Signal the worker to exit after the current request
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

/// Create a shutdown channel
pub fn shutdown_channel() -> (ShutdownHandle, ShutdownToken) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, ShutdownToken { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn token_observes_trigger() {
        let (handle, mut token) = shutdown_channel();
        assert!(!token.is_shutdown());

        handle.trigger();
        token.wait().await;
        assert!(token.is_shutdown());
    }

    #[tokio::test]
    async fn trigger_before_wait_is_not_lost() {
        let (handle, mut token) = shutdown_channel();
        handle.trigger();

        // wait() must return even though the signal fired first.
        tokio::time::timeout(std::time::Duration::from_millis(100), token.wait())
            .await
            .expect("wait should observe an earlier trigger");
        assert!(token.is_shutdown());
    }
}
