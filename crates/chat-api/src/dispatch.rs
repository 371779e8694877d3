//! Command Dispatch Table
//!
//! Explicit mapping from command identifiers to handlers. Unrecognized
//! commands are a logged no-op, never a silent fallthrough.

use crate::types::{CommandEvent, CommandResponse};
use async_trait::async_trait;
use dreambot_core::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// One command's handler
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, event: CommandEvent) -> Result<()>;
}

/// Dispatch table: command identifier -> handler
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, command: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(command.into(), handler);
    }

    /// Route one event to its handler. Handler errors propagate to the
    /// caller; an unknown command is logged and reported as unhandled.
    pub async fn dispatch(&self, event: CommandEvent) -> Result<CommandResponse> {
        let command = event.command.clone();
        match self.handlers.get(&command) {
            Some(handler) => {
                handler.handle(event).await?;
                Ok(CommandResponse {
                    command,
                    handled: true,
                })
            }
            None => {
                warn!(command = %command, "Unknown command");
                Ok(CommandResponse {
                    command,
                    handled: false,
                })
            }
        }
    }

    pub fn registered_commands(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CommandHandler for CountingHandler {
        async fn handle(&self, _event: CommandEvent) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn event(command: &str) -> CommandEvent {
        CommandEvent {
            command: command.to_string(),
            options: Default::default(),
            requester_token: "t1".to_string(),
        }
    }

    #[tokio::test]
    async fn dispatch_routes_to_registered_handler() {
        let handler = Arc::new(CountingHandler {
            calls: AtomicUsize::new(0),
        });
        let mut registry = CommandRegistry::new();
        registry.register("imagine", handler.clone());

        let response = registry.dispatch(event("imagine")).await.unwrap();
        assert!(response.handled);
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_command_is_a_no_op() {
        let registry = CommandRegistry::new();

        let response = registry.dispatch(event("dance")).await.unwrap();
        assert!(!response.handled);
        assert_eq!(response.command, "dance");
    }
}
