// Generation Client Port
// Abstraction for the external image-generation backend.

use async_trait::async_trait;
use thiserror::Error;

/// A single rendered image returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Outcome of one successful generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub images: Vec<GeneratedImage>,
}

/// Generation errors. The worker treats every variant uniformly as a
/// failed request; the split exists for logging and adapter tests.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    #[error("Backend rejected the request: {0}")]
    Rejected(String),

    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),
}

/// Generation Client trait
///
/// One call per request. The call is potentially long-running and no
/// timeout is imposed here; a hung backend stalls the queue.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Turn a prompt into rendered images, or fail. Single attempt.
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, GenerationError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted mock behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed with one placeholder image
        Success,
        /// Always fail with message
        Fail(String),
        /// Fail only for the given prompt, succeed otherwise
        FailForPrompt(String),
    }

    /// Mock generation backend for testing.
    ///
    /// Records every prompt in call order and tracks how many generate
    /// calls are outstanding at once, so tests can assert the
    /// at-most-one-in-flight property.
    pub struct MockGenerationClient {
        behavior: MockBehavior,
        latency: Duration,
        prompts: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MockGenerationClient {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                latency: Duration::from_millis(0),
                prompts: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }

        /// Simulate a slow backend; each call sleeps this long.
        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        /// Prompts seen so far, in call order
        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().expect("mock lock").clone()
        }

        pub fn call_count(&self) -> usize {
            self.prompts.lock().expect("mock lock").len()
        }

        /// Highest number of generate calls ever outstanding at once
        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }

        fn placeholder_result() -> GenerationResult {
            GenerationResult {
                images: vec![GeneratedImage {
                    file_name: "mock.png".to_string(),
                    bytes: vec![0x89, 0x50, 0x4e, 0x47],
                }],
            }
        }
    }

    #[async_trait]
    impl GenerationClient for MockGenerationClient {
        async fn generate(&self, prompt: &str) -> Result<GenerationResult, GenerationError> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
            self.prompts
                .lock()
                .expect("mock lock")
                .push(prompt.to_string());

            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }

            let result = match &self.behavior {
                MockBehavior::Success => Ok(Self::placeholder_result()),
                MockBehavior::Fail(msg) => Err(GenerationError::Rejected(msg.clone())),
                MockBehavior::FailForPrompt(bad) if bad == prompt => {
                    Err(GenerationError::Rejected(format!("cannot render '{prompt}'")))
                }
                MockBehavior::FailForPrompt(_) => Ok(Self::placeholder_result()),
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }
}
