//! JSON-RPC Server
//!
//! Receives parsed command events from the chat connector over JSON-RPC
//! 2.0 on localhost TCP and feeds them into the dispatch table.

use crate::dispatch::CommandRegistry;
use crate::error::to_rpc_error;
use crate::types::CommandEvent;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::sync::Arc;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9533;

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    registry: Arc<CommandRegistry>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, registry: Arc<CommandRegistry>) -> Self {
        Self { config, registry }
    }

    /// Start the JSON-RPC server.
    ///
    /// Security: only binds to 127.0.0.1; the chat connector runs on the
    /// same host.
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            commands = ?self.registry.registered_commands(),
            "Starting JSON-RPC server (localhost only)"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let mut module = RpcModule::new(());

        let registry = self.registry.clone();
        module
            .register_async_method("chat.command.v1", move |params, _, _| {
                let registry = registry.clone();
                async move {
                    let event: CommandEvent = params.parse()?;
                    registry.dispatch(event).await.map_err(to_rpc_error)
                }
            })
            .map_err(|e| e.to_string())?;

        info!("JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok(handle)
    }
}
