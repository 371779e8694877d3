//! Inbound Command Event Types
//!
//! The chat connector parses platform payloads into these plain shapes
//! before forwarding them; the bot never sees raw platform frames.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// chat.command.v1 - one parsed slash-command invocation
#[derive(Debug, Clone, Deserialize)]
pub struct CommandEvent {
    /// Command identifier, e.g. "imagine"
    pub command: String,
    /// Named command options, e.g. {"prompt": "a cat"}
    #[serde(default)]
    pub options: HashMap<String, String>,
    /// Opaque interaction token used for ack/edit deliveries
    pub requester_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub command: String,
    /// False for unrecognized commands (logged no-op)
    pub handled: bool,
}
