//! Webhook-based chat delivery adapter
//!
//! Implements the `ChatInteraction` port against interaction-token
//! webhook endpoints: the acknowledgment is POSTed as the interaction
//! response, the terminal outcome PATCHes that same message (multipart
//! when images are attached).

mod webhook;

pub use webhook::{ChatWebhookConfig, WebhookChat};
