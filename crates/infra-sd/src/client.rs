// txt2img HTTP client

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use dreambot_core::port::{GeneratedImage, GenerationClient, GenerationError, GenerationResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const TXT2IMG_PATH: &str = "/sdapi/v1/txt2img";

/// Backend configuration. Rendering parameters are fixed per deployment;
/// the prompt is the only per-request input.
#[derive(Debug, Clone)]
pub struct SdApiConfig {
    pub base_url: String,
    pub steps: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for SdApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:7860".to_string(),
            steps: 20,
            width: 512,
            height: 512,
        }
    }
}

#[derive(Debug, Serialize)]
struct Txt2ImgRequest<'a> {
    prompt: &'a str,
    steps: u32,
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct Txt2ImgResponse {
    images: Vec<String>,
}

/// Generation backend client.
///
/// The underlying HTTP client is built without a total request timeout:
/// the core imposes none, and a generation call legitimately runs for
/// minutes. A hung backend therefore stalls the queue.
pub struct StableDiffusionApi {
    http: Client,
    config: SdApiConfig,
}

impl StableDiffusionApi {
    pub fn new(config: SdApiConfig) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .build()
            .map_err(|e| GenerationError::Unreachable(e.to_string()))?;
        Ok(Self { http, config })
    }

    fn txt2img_url(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            TXT2IMG_PATH
        )
    }
}

#[async_trait]
impl GenerationClient for StableDiffusionApi {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, GenerationError> {
        let body = Txt2ImgRequest {
            prompt,
            steps: self.config.steps,
            width: self.config.width,
            height: self.config.height,
        };

        debug!(url = %self.txt2img_url(), steps = body.steps, "Dispatching txt2img call");
        let response = self
            .http
            .post(self.txt2img_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GenerationError::Rejected(format!(
                "HTTP {status}: {detail}"
            )));
        }

        let parsed: Txt2ImgResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        let images = decode_images(&parsed.images)?;
        info!(images = images.len(), "txt2img call succeeded");
        Ok(GenerationResult { images })
    }
}

/// Decode the base64 payloads the API returns into PNG bytes.
fn decode_images(encoded: &[String]) -> Result<Vec<GeneratedImage>, GenerationError> {
    if encoded.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "Response contained no images".to_string(),
        ));
    }

    encoded
        .iter()
        .enumerate()
        .map(|(index, data)| {
            let bytes = BASE64
                .decode(data)
                .map_err(|e| GenerationError::MalformedResponse(format!("image {index}: {e}")))?;
            Ok(GeneratedImage {
                file_name: format!("imagine-{index}.png"),
                bytes,
            })
        })
        .collect()
}
