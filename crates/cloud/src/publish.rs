//! Publishing generated images to X.
//!
//! Uses the v2 API with an OAuth 2.0 user-context token:
//!
//! 1. Download the image from its media URL.
//! 2. `POST {api}/2/media/upload` (multipart, `media_category=tweet_image`).
//! 3. `POST {api}/2/tweets` with the text and the uploaded media id.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use studio_core::media::MediaType;

/// Public API base URL.
pub const DEFAULT_API_URL: &str = "https://api.x.com";

/// X rejects images above 5 MB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Longest post text accepted by X.
pub const MAX_POST_CHARS: usize = 280;

/// Errors from the publishing flow.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("X API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Could not download media ({status})")]
    Download { status: u16 },

    #[error("Media too large (exceeds {0} bytes)")]
    TooLarge(usize),

    #[error("{0}")]
    Unsupported(String),
}

/// Outcome of a successful post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostResult {
    pub post_id: String,
    pub media_id: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct UploadedMedia {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    id: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct CreatePostBody<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    text: &'a str,
    media: PostMedia<'a>,
}

#[derive(Debug, Serialize)]
struct PostMedia<'a> {
    media_ids: [&'a str; 1],
}

/// Posts images to an X account.
pub struct XPublisher {
    client: reqwest::Client,
    api_url: String,
    access_token: SecretString,
}

impl XPublisher {
    /// Create a publisher reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        api_url: String,
        access_token: SecretString,
    ) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    /// Post the media at `media_url` with `text`. An empty `text` posts the
    /// image alone.
    pub async fn post_media(
        &self,
        media_url: &str,
        media_type: MediaType,
        text: &str,
    ) -> Result<PostResult, PublishError> {
        if media_type != MediaType::Image {
            return Err(PublishError::Unsupported(format!(
                "Only images can be posted to X, got {media_type}"
            )));
        }
        if text.chars().count() > MAX_POST_CHARS {
            return Err(PublishError::Unsupported(format!(
                "Post text exceeds {MAX_POST_CHARS} characters"
            )));
        }

        let (bytes, content_type) =
            download_limited(&self.client, media_url, MAX_IMAGE_BYTES).await?;
        let media_id = self.upload_image(bytes, &content_type).await?;
        let post = self.create_post(text, &media_id).await?;

        tracing::info!(post_id = %post.id, media_id = %media_id, "Posted media to X");
        Ok(PostResult {
            post_id: post.id,
            media_id,
            text: post.text,
        })
    }

    async fn upload_image(&self, bytes: Vec<u8>, content_type: &str) -> Result<String, PublishError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("media")
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new()
            .text("media_category", "tweet_image")
            .part("media", part);

        let response = self
            .client
            .post(format!("{}/2/media/upload", self.api_url))
            .bearer_auth(self.access_token.expose_secret())
            .multipart(form)
            .send()
            .await?;
        let uploaded: DataEnvelope<UploadedMedia> = parse_response(response).await?;
        Ok(uploaded.data.id)
    }

    async fn create_post(&self, text: &str, media_id: &str) -> Result<CreatedPost, PublishError> {
        let body = CreatePostBody {
            text,
            media: PostMedia {
                media_ids: [media_id],
            },
        };
        let response = self
            .client
            .post(format!("{}/2/tweets", self.api_url))
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await?;
        let created: DataEnvelope<CreatedPost> = parse_response(response).await?;
        Ok(created.data)
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, PublishError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(PublishError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}

/// Download `url` into memory, refusing bodies larger than `limit`.
/// Returns the bytes and the reported content type.
async fn download_limited(
    client: &reqwest::Client,
    url: &str,
    limit: usize,
) -> Result<(Vec<u8>, String), PublishError> {
    let mut response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(PublishError::Download {
            status: status.as_u16(),
        });
    }
    if response.content_length().is_some_and(|len| len as usize > limit) {
        return Err(PublishError::TooLarge(limit));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("image/png")
        .to_string();

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(PublishError::TooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok((bytes, content_type))
}
