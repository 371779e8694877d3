//! Dreambot - Main Entry Point
//! Composition root: wires adapters to the core queue and worker.

mod telemetry;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dreambot_chat_api::{CommandRegistry, ImagineHandler, RpcServer, RpcServerConfig};
use dreambot_core::application::{SubmissionService, Supervisor};
use dreambot_core::port::clock::SystemClock;
use dreambot_core::port::id_provider::UuidProvider;
use dreambot_infra_chat::{ChatWebhookConfig, WebhookChat};
use dreambot_infra_sd::{SdApiConfig, StableDiffusionApi};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_SD_URL: &str = "http://127.0.0.1:7860";
const DEFAULT_CHAT_URL: &str = "http://127.0.0.1:8077";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("DREAMBOT_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("dreambot=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Dreambot v{} starting...", VERSION);

    // 1.1. Initialize OpenTelemetry (optional)
    if let Err(e) = telemetry::init_telemetry() {
        tracing::warn!(error = ?e, "Failed to initialize OpenTelemetry (continuing without it)");
    }

    // 2. Load configuration
    let sd_url = std::env::var("DREAMBOT_SD_URL").unwrap_or_else(|_| DEFAULT_SD_URL.to_string());
    let chat_url =
        std::env::var("DREAMBOT_CHAT_URL").unwrap_or_else(|_| DEFAULT_CHAT_URL.to_string());
    let rpc_port: Option<u16> = std::env::var("DREAMBOT_RPC_PORT")
        .ok()
        .and_then(|s| s.parse().ok());

    // 3. Setup collaborator adapters
    let backend = Arc::new(
        StableDiffusionApi::new(SdApiConfig {
            base_url: sd_url.clone(),
            ..Default::default()
        })
        .map_err(|e| anyhow::anyhow!("Generation backend setup failed: {}", e))?,
    );
    let chat = Arc::new(
        WebhookChat::new(ChatWebhookConfig {
            base_url: chat_url.clone(),
        })
        .map_err(|e| anyhow::anyhow!("Chat delivery setup failed: {}", e))?,
    );
    info!(sd_url = %sd_url, chat_url = %chat_url, "Collaborators configured");

    // 4. Start the queue and worker
    let supervisor = Supervisor::start(backend, chat.clone());

    // 5. Wire the submission path and the command dispatch table
    let submissions = Arc::new(SubmissionService::new(
        supervisor.queue(),
        chat,
        Arc::new(UuidProvider),
        Arc::new(SystemClock),
    ));

    let mut registry = CommandRegistry::new();
    registry.register("imagine", Arc::new(ImagineHandler::new(submissions)));

    // 6. Start the JSON-RPC server for inbound command events
    info!("Starting JSON-RPC server...");
    let mut rpc_config = RpcServerConfig::default();
    if let Some(port) = rpc_port {
        rpc_config.port = port;
    }
    let rpc_handle = RpcServer::new(rpc_config, Arc::new(registry))
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!("System ready. Waiting for imagine requests...");
    info!("Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 8. Graceful shutdown: stop inbound traffic first, then drain the
    // worker (the in-flight request may still complete and deliver).
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    if let Err(e) = supervisor.shutdown().await {
        tracing::error!(error = %e, "Worker shutdown was not clean");
    }

    info!("Shutdown complete.");

    Ok(())
}
