// Generation Request Domain Model

use serde::{Deserialize, Serialize};

/// Request ID (UUID v4)
pub type RequestId = String;

/// Opaque handle to the originating chat interaction.
///
/// Owned by the chat front end; the core never inspects it and only
/// forwards it back on ack/edit deliveries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequesterToken(String);

impl RequesterToken {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequesterToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "PENDING"),
            RequestStatus::Processing => write!(f, "PROCESSING"),
            RequestStatus::Completed => write!(f, "COMPLETED"),
            RequestStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// One accepted image-generation request, from submission to terminal
/// status. Lives in the queue while PENDING, is owned by the worker while
/// PROCESSING, and is discarded after its outcome has been delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub id: RequestId,
    pub prompt: String,
    pub requester_token: RequesterToken,
    /// Epoch ms at submission; informational only.
    pub submitted_at: i64,
    pub status: RequestStatus,
}

impl GenerationRequest {
    /// Create a new PENDING request
    ///
    /// # Arguments
    ///
    /// * `id` - Unique request ID (injected, not generated)
    /// * `submitted_at` - Submission timestamp in epoch ms (injected, not system time)
    /// * `prompt` - Text prompt, opaque to the core
    /// * `requester_token` - Handle of the originating chat interaction
    pub fn new(
        id: impl Into<String>,
        submitted_at: i64,
        prompt: impl Into<String>,
        requester_token: RequesterToken,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            requester_token,
            submitted_at,
            status: RequestStatus::Pending,
        }
    }

    /// Transition to PROCESSING
    pub fn start(&mut self) -> crate::domain::error::Result<()> {
        if self.status != RequestStatus::Pending {
            return Err(crate::domain::error::DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: "PROCESSING".to_string(),
            });
        }
        self.status = RequestStatus::Processing;
        Ok(())
    }

    /// Transition to COMPLETED
    pub fn complete(&mut self) -> crate::domain::error::Result<()> {
        if self.status != RequestStatus::Processing {
            return Err(crate::domain::error::DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: "COMPLETED".to_string(),
            });
        }
        self.status = RequestStatus::Completed;
        Ok(())
    }

    /// Mark as FAILED. Terminal for the request; never retried.
    pub fn fail(&mut self) {
        self.status = RequestStatus::Failed;
    }

    /// Create a test request with deterministic ID and timestamp.
    ///
    /// Uses a simple counter (request-1, request-2, ...); timestamps start
    /// at 1000 and increment by 1000.
    ///
    /// **Note**: This method should only be used in tests. For production
    /// code, always inject ID and time via providers.
    pub fn new_test(prompt: impl Into<String>) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let id = format!("request-{}", counter);
        let token = RequesterToken::new(format!("token-{}", counter));

        Self::new(id, (counter * 1000) as i64, prompt, token)
    }
}
