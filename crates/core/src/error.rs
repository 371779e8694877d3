// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Submission rejected: {0}")]
    Submission(#[from] crate::application::queue::SubmissionError),

    #[error("Generation failed: {0}")]
    Generation(#[from] crate::port::GenerationError),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] crate::port::DeliveryError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
