// Interaction webhook client

use async_trait::async_trait;
use dreambot_core::domain::RequesterToken;
use dreambot_core::port::{ChatInteraction, DeliveryError, ReplyContent};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::json;
use tracing::debug;

/// Chat delivery configuration
#[derive(Debug, Clone)]
pub struct ChatWebhookConfig {
    /// Base URL of the chat connector's webhook endpoint
    pub base_url: String,
}

/// Webhook-backed chat deliveries.
///
/// Both calls may fail; callers in the core log and swallow those
/// failures, so nothing here retries.
pub struct WebhookChat {
    http: Client,
    config: ChatWebhookConfig,
}

impl WebhookChat {
    pub fn new(config: ChatWebhookConfig) -> Result<Self, DeliveryError> {
        let http = Client::builder()
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        Ok(Self { http, config })
    }

    fn message_url(&self, token: &RequesterToken) -> String {
        format!(
            "{}/interactions/{}/messages",
            self.config.base_url.trim_end_matches('/'),
            token.as_str()
        )
    }

    fn check_status(status: reqwest::StatusCode, body: String) -> Result<(), DeliveryError> {
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Rejected(format!("HTTP {status}: {body}")))
        }
    }
}

#[async_trait]
impl ChatInteraction for WebhookChat {
    async fn ack(&self, token: &RequesterToken, position: usize) -> Result<(), DeliveryError> {
        let url = self.message_url(token);
        debug!(%url, position, "Delivering acknowledgment");

        let response = self
            .http
            .post(&url)
            .json(&json!({ "content": ack_content(position) }))
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::check_status(status, body)
    }

    async fn edit(
        &self,
        token: &RequesterToken,
        content: ReplyContent,
    ) -> Result<(), DeliveryError> {
        let url = self.message_url(token);
        debug!(%url, images = content.images.len(), "Delivering terminal edit");

        let request = self.http.patch(&url);
        let request = if content.images.is_empty() {
            request.json(&json!({ "content": content.text }))
        } else {
            let mut form = Form::new().text(
                "payload_json",
                serde_json::to_string(&json!({ "content": content.text }))
                    .map_err(|e| DeliveryError::Transport(e.to_string()))?,
            );
            for (index, image) in content.images.into_iter().enumerate() {
                form = form.part(
                    format!("files[{index}]"),
                    Part::bytes(image.bytes).file_name(image.file_name),
                );
            }
            request.multipart(form)
        };

        let response = request
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::check_status(status, body)
    }
}

/// Acknowledgment wording, position included so the requester knows how
/// long the wait is.
fn ack_content(position: usize) -> String {
    format!("I'm dreaming something up for you. You are currently #{position} in line.")
}
