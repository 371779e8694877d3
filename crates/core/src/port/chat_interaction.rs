// Chat Interaction Port
// Delivery of acknowledgments and terminal outcomes to the requester.

use crate::domain::RequesterToken;
use crate::port::generation_client::GeneratedImage;
use async_trait::async_trait;
use thiserror::Error;

/// Content of a terminal edit: final text plus any rendered images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyContent {
    pub text: String,
    pub images: Vec<GeneratedImage>,
}

impl ReplyContent {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            images: Vec::new(),
        }
    }

    pub fn with_images(text: impl Into<String>, images: Vec<GeneratedImage>) -> Self {
        Self {
            text: text.into(),
            images,
        }
    }
}

/// Delivery errors. Callers log and swallow these; there is no retry and
/// no alternate delivery path, so a requester may silently miss an update.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Delivery transport error: {0}")]
    Transport(String),

    #[error("Delivery rejected by chat service: {0}")]
    Rejected(String),
}

/// Chat Interaction trait
///
/// `ack` fires exactly once per accepted submission, before the request is
/// ever processed. `edit` fires exactly once per request once it reaches a
/// terminal status, replacing the acknowledgment.
#[async_trait]
pub trait ChatInteraction: Send + Sync {
    /// Confirm acceptance and report the 1-indexed queue position.
    async fn ack(&self, token: &RequesterToken, position: usize) -> Result<(), DeliveryError>;

    /// Replace the acknowledgment with the terminal outcome.
    async fn edit(&self, token: &RequesterToken, content: ReplyContent)
        -> Result<(), DeliveryError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Mutex;

    /// One recorded delivery with a global sequence number, so tests can
    /// assert ordering across acks and edits.
    #[derive(Debug, Clone)]
    pub struct RecordedAck {
        pub seq: u64,
        pub token: String,
        pub position: usize,
    }

    #[derive(Debug, Clone)]
    pub struct RecordedEdit {
        pub seq: u64,
        pub token: String,
        pub content: ReplyContent,
    }

    /// Recording chat mock. Optionally fails every delivery, to exercise
    /// the log-and-swallow path.
    pub struct RecordingChat {
        seq: AtomicU64,
        acks: Mutex<Vec<RecordedAck>>,
        edits: Mutex<Vec<RecordedEdit>>,
        fail_deliveries: AtomicBool,
    }

    impl RecordingChat {
        pub fn new() -> Self {
            Self {
                seq: AtomicU64::new(1),
                acks: Mutex::new(Vec::new()),
                edits: Mutex::new(Vec::new()),
                fail_deliveries: AtomicBool::new(false),
            }
        }

        /// Make every subsequent ack/edit return a transport error.
        pub fn fail_deliveries(&self, fail: bool) {
            self.fail_deliveries.store(fail, Ordering::SeqCst);
        }

        pub fn acks(&self) -> Vec<RecordedAck> {
            self.acks.lock().expect("mock lock").clone()
        }

        pub fn edits(&self) -> Vec<RecordedEdit> {
            self.edits.lock().expect("mock lock").clone()
        }

        pub fn acks_for(&self, token: &str) -> Vec<RecordedAck> {
            self.acks()
                .into_iter()
                .filter(|a| a.token == token)
                .collect()
        }

        pub fn edits_for(&self, token: &str) -> Vec<RecordedEdit> {
            self.edits()
                .into_iter()
                .filter(|e| e.token == token)
                .collect()
        }

        fn next_seq(&self) -> u64 {
            self.seq.fetch_add(1, Ordering::SeqCst)
        }
    }

    impl Default for RecordingChat {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ChatInteraction for RecordingChat {
        async fn ack(&self, token: &RequesterToken, position: usize) -> Result<(), DeliveryError> {
            let seq = self.next_seq();
            self.acks.lock().expect("mock lock").push(RecordedAck {
                seq,
                token: token.as_str().to_string(),
                position,
            });
            if self.fail_deliveries.load(Ordering::SeqCst) {
                return Err(DeliveryError::Transport("mock ack failure".to_string()));
            }
            Ok(())
        }

        async fn edit(
            &self,
            token: &RequesterToken,
            content: ReplyContent,
        ) -> Result<(), DeliveryError> {
            let seq = self.next_seq();
            self.edits.lock().expect("mock lock").push(RecordedEdit {
                seq,
                token: token.as_str().to_string(),
                content,
            });
            if self.fail_deliveries.load(Ordering::SeqCst) {
                return Err(DeliveryError::Transport("mock edit failure".to_string()));
            }
            Ok(())
        }
    }
}
