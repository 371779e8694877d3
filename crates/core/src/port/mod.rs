// Port Layer - Interfaces for external collaborators

pub mod chat_interaction;
pub mod clock;
pub mod generation_client;
pub mod id_provider; // For deterministic testing

// Re-exports
pub use chat_interaction::{ChatInteraction, DeliveryError, ReplyContent};
pub use clock::Clock;
pub use generation_client::{GeneratedImage, GenerationClient, GenerationError, GenerationResult};
pub use id_provider::IdProvider;
