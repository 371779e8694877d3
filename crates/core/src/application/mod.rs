// Application Layer - Queue, Worker and Lifecycle

pub mod queue;
pub mod submission;
pub mod supervisor;
pub mod worker;

// Re-exports
pub use queue::{RequestQueue, SubmissionError};
pub use submission::{SubmissionService, SubmitRequest};
pub use supervisor::Supervisor;
pub use worker::{shutdown_channel, ShutdownHandle, ShutdownToken, Worker};
