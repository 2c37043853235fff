//! Client for the OpenAI responses endpoint.
//!
//! Only the subset the dashboard needs: send a single text input, read the
//! concatenated `output_text` parts back.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::AiError;
use crate::provider::TextGenerator;

/// Public API base URL.
pub const DEFAULT_API_URL: &str = "https://api.openai.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-5-nano";

const PROVIDER: &str = "OpenAI";

/// HTTP client for the responses API.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_url: String,
    api_key: SecretString,
    model: String,
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
}

/// Body returned by `POST /v1/responses`.
#[derive(Debug, Deserialize)]
pub struct ResponsesResponse {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

/// One item of the `output` array (messages, reasoning, tool calls ...).
#[derive(Debug, Deserialize)]
pub struct OutputItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Vec<ContentPart>,
}

/// One content part of a message item.
#[derive(Debug, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl ResponsesResponse {
    /// Concatenation of every `output_text` part across message items.
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content.iter())
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

impl OpenAiClient {
    /// Create a client reusing an existing [`reqwest::Client`].
    ///
    /// * `api_url` - Base URL without the `/v1` suffix.
    pub fn with_client(
        client: reqwest::Client,
        api_url: String,
        api_key: SecretString,
        model: String,
    ) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    /// Model name sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `input` to `POST /v1/responses` and return the parsed body.
    pub async fn create_response(&self, input: &str) -> Result<ResponsesResponse, AiError> {
        let body = ResponsesRequest {
            model: &self.model,
            input,
        };

        let response = self
            .client
            .post(format!("{}/v1/responses", self.api_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
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

    /// Run a prompt and return the model's text output.
    pub async fn inference(&self, prompt: &str) -> Result<String, AiError> {
        let response = self.create_response(prompt).await?;
        let text = response.output_text();
        tracing::debug!(
            response_id = %response.id,
            model = %self.model,
            chars = text.len(),
            "OpenAI inference complete"
        );
        if text.trim().is_empty() {
            return Err(AiError::EmptyResult(PROVIDER));
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn infer(&self, prompt: &str) -> Result<String, AiError> {
        self.inference(prompt).await
    }
}
