//! Client for fal.ai image models using the queue API.
//!
//! A generation is a three-step exchange:
//!
//! 1. `POST {queue}/{model}` with the model input; the reply carries a
//!    `request_id` plus `status_url` and `response_url`.
//! 2. `GET status_url` until the status is `COMPLETED`.
//! 3. `GET response_url` for the model output.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::AiError;
use crate::provider::ImageGenerator;

/// Public queue endpoint.
pub const DEFAULT_QUEUE_URL: &str = "https://queue.fal.run";

/// Text-to-image model.
pub const TEXT_TO_IMAGE_MODEL: &str = "fal-ai/flux/dev";

/// Image-to-image model.
pub const IMAGE_TO_IMAGE_MODEL: &str = "fal-ai/flux/dev/image-to-image";

/// Delay between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Give up on a queued request after this long.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(180);

const PROVIDER: &str = "fal.ai";

/// HTTP client for fal.ai queued models.
pub struct FalClient {
    client: reqwest::Client,
    queue_url: String,
    api_key: SecretString,
    poll_interval: Duration,
    poll_timeout: Duration,
}

/// Reply to a queue submission.
#[derive(Debug, Deserialize)]
pub struct QueueSubmission {
    pub request_id: String,
    pub status_url: String,
    pub response_url: String,
}

/// Reply to a status poll.
#[derive(Debug, Deserialize)]
pub struct QueueStatus {
    pub status: String,
    #[serde(default)]
    pub queue_position: Option<u32>,
}

/// One image produced by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Output of the flux image models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    pub images: Vec<GeneratedImage>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub has_nsfw_concepts: Vec<bool>,
}

impl ImageResult {
    /// First image, which is the one the dashboard keeps.
    pub fn first(&self) -> Option<&GeneratedImage> {
        self.images.first()
    }
}

#[derive(Debug, Serialize)]
struct TextToImageInput<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
struct ImageToImageInput<'a> {
    prompt: &'a str,
    image_url: &'a str,
}

impl FalClient {
    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, queue_url: String, api_key: SecretString) -> Self {
        Self {
            client,
            queue_url: queue_url.trim_end_matches('/').to_string(),
            api_key,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }

    /// Override polling cadence and deadline.
    pub fn with_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.poll_timeout = timeout;
        self
    }

    /// Submit `input` to `model`, wait for completion and decode the output.
    pub async fn subscribe<I, O>(&self, model: &str, input: &I) -> Result<O, AiError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let submission: QueueSubmission = self
            .send_json(
                self.client
                    .post(format!("{}/{}", self.queue_url, model))
                    .json(input),
            )
            .await?;
        tracing::debug!(model, request_id = %submission.request_id, "fal request queued");

        let started = Instant::now();
        loop {
            let status: QueueStatus = self
                .send_json(self.client.get(&submission.status_url))
                .await?;
            match status.status.as_str() {
                "COMPLETED" => break,
                "IN_QUEUE" | "IN_PROGRESS" => {
                    tracing::trace!(
                        request_id = %submission.request_id,
                        status = %status.status,
                        queue_position = ?status.queue_position,
                        "fal request pending"
                    );
                }
                other => {
                    return Err(AiError::Decode {
                        provider: PROVIDER,
                        message: format!("unknown queue status '{other}'"),
                    });
                }
            }
            if started.elapsed() >= self.poll_timeout {
                tracing::warn!(request_id = %submission.request_id, "fal request timed out");
                return Err(AiError::Timeout("fal.ai queue request"));
            }
            tokio::time::sleep(self.poll_interval).await;
        }

        let output = self
            .send_json(self.client.get(&submission.response_url))
            .await?;
        tracing::debug!(
            model,
            request_id = %submission.request_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fal request completed"
        );
        Ok(output)
    }

    /// Generate an image from a text prompt.
    pub async fn generate_image_from_text(&self, prompt: &str) -> Result<ImageResult, AiError> {
        let result: ImageResult = self
            .subscribe(TEXT_TO_IMAGE_MODEL, &TextToImageInput { prompt })
            .await?;
        ensure_images(result)
    }

    /// Generate an image from a text prompt guided by `image_url`.
    pub async fn generate_image_from_text_and_image(
        &self,
        prompt: &str,
        image_url: &str,
    ) -> Result<ImageResult, AiError> {
        let result: ImageResult = self
            .subscribe(
                IMAGE_TO_IMAGE_MODEL,
                &ImageToImageInput { prompt, image_url },
            )
            .await?;
        ensure_images(result)
    }

    // ---- private helpers ----

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, AiError> {
        let response = request
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Key {}", self.api_key.expose_secret()),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AiError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(|e| AiError::Decode {
            provider: PROVIDER,
            message: e.to_string(),
        })
    }
}

fn ensure_images(result: ImageResult) -> Result<ImageResult, AiError> {
    if result.images.is_empty() {
        return Err(AiError::EmptyResult(PROVIDER));
    }
    Ok(result)
}

#[async_trait]
impl ImageGenerator for FalClient {
    async fn text_to_image(&self, prompt: &str) -> Result<ImageResult, AiError> {
        self.generate_image_from_text(prompt).await
    }

    async fn image_to_image(&self, prompt: &str, image_url: &str) -> Result<ImageResult, AiError> {
        self.generate_image_from_text_and_image(prompt, image_url)
            .await
    }
}
