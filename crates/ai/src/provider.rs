//! Provider traits consumed by the generation pipeline.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AiError;
use crate::fal::ImageResult;

/// Produces text from a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn infer(&self, prompt: &str) -> Result<String, AiError>;
}

/// Produces images from a prompt, optionally guided by a reference image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn text_to_image(&self, prompt: &str) -> Result<ImageResult, AiError>;

    async fn image_to_image(&self, prompt: &str, image_url: &str) -> Result<ImageResult, AiError>;
}

/// Article text retrieved from a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchedArticle {
    /// Normalized URL that was fetched.
    pub url: String,
    pub title: Option<String>,
    pub text: String,
}

/// Turns a public link into article text.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedArticle, AiError>;
}
