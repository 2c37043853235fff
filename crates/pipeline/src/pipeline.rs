//! The [`MediaPipeline`] service and its single-step operations.
//!
//! The article-to-images flow lives in [`crate::generate`].

use std::sync::Arc;

use serde::Deserialize;
use studio_ai::validate::validate_public_url;
use studio_ai::{ArticleSource, ImageGenerator, ImageResult, TextGenerator};
use studio_cloud::ObjectStore;
use studio_core::error::CoreError;
use studio_core::prompt::{compose_article_prompt, PersonaVoice};
use studio_core::types::{DbId, DEFAULT_USER_ID};
use studio_db::models::article::{Article, CreateArticle, SOURCE_GENERATED};
use studio_db::models::persona::Persona;
use studio_db::repositories::{ArticleRepo, PersonaRepo};
use studio_db::DbPool;

use crate::error::PipelineError;

/// Concept images rendered at the same time.
pub const MAX_CONCURRENT_RENDERS: usize = 3;

/// Longest prompt accepted by the direct text and image operations.
pub const MAX_PROMPT_CHARS: usize = 4000;

/// Longest topic accepted when composing an article.
pub const MAX_TOPIC_CHARS: usize = 500;

/// Request to write a new article with the LLM.
#[derive(Debug, Clone, Deserialize)]
pub struct ComposeRequest {
    pub topic: String,
    pub persona_id: Option<DbId>,
    pub user_id: Option<DbId>,
}

/// Orchestrates text, image and storage providers over the database.
///
/// Cheap to clone: providers are shared behind `Arc`.
#[derive(Clone)]
pub struct MediaPipeline {
    pub(crate) pool: DbPool,
    pub(crate) articles: Arc<dyn ArticleSource>,
    pub(crate) text: Option<Arc<dyn TextGenerator>>,
    pub(crate) images: Option<Arc<dyn ImageGenerator>>,
    pub(crate) mirror: Option<Arc<dyn ObjectStore>>,
    pub(crate) http: reqwest::Client,
}

impl MediaPipeline {
    pub fn new(pool: DbPool, articles: Arc<dyn ArticleSource>) -> Self {
        Self {
            pool,
            articles,
            text: None,
            images: None,
            mirror: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_text(mut self, text: Arc<dyn TextGenerator>) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_images(mut self, images: Arc<dyn ImageGenerator>) -> Self {
        self.images = Some(images);
        self
    }

    /// Copy generated images into `store` instead of keeping provider URLs.
    /// `http` is used to download them.
    pub fn with_mirror(mut self, store: Arc<dyn ObjectStore>, http: reqwest::Client) -> Self {
        self.mirror = Some(store);
        self.http = http;
        self
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    pub fn has_images(&self) -> bool {
        self.images.is_some()
    }

    pub(crate) fn text_generator(&self) -> Result<&Arc<dyn TextGenerator>, PipelineError> {
        self.text
            .as_ref()
            .ok_or(PipelineError::NotConfigured("Text generation"))
    }

    pub(crate) fn image_generator(&self) -> Result<&Arc<dyn ImageGenerator>, PipelineError> {
        self.images
            .as_ref()
            .ok_or(PipelineError::NotConfigured("Image generation"))
    }

    /// Load a persona or fail with `NotFound`.
    pub(crate) async fn load_persona(&self, id: Option<DbId>) -> Result<Option<Persona>, PipelineError> {
        let Some(id) = id else {
            return Ok(None);
        };
        let persona = PersonaRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Persona",
                id,
            })?;
        Ok(Some(persona))
    }

    // -----------------------------------------------------------------------
    // Single-step operations
    // -----------------------------------------------------------------------

    /// Run a raw prompt through the LLM.
    pub async fn infer(&self, prompt: &str) -> Result<String, PipelineError> {
        let prompt = require_prompt(prompt)?;
        let text = self.text_generator()?;
        Ok(text.infer(prompt).await?)
    }

    /// Generate an image without storing it. With `image_url` the image
    /// model is guided by that reference picture.
    pub async fn generate_image(
        &self,
        prompt: &str,
        image_url: Option<&str>,
    ) -> Result<ImageResult, PipelineError> {
        let prompt = require_prompt(prompt)?;
        let images = self.image_generator()?;

        let result = match image_url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => {
                let url = validate_public_url(url)?;
                images.image_to_image(prompt, url.as_str()).await?
            }
            None => images.text_to_image(prompt).await?,
        };
        Ok(result)
    }

    /// Write an article about `topic`, in the persona's voice when one is
    /// given, and store it with source `generated`.
    pub async fn compose_article(&self, request: &ComposeRequest) -> Result<Article, PipelineError> {
        let topic = request.topic.trim();
        if topic.is_empty() {
            return Err(CoreError::Validation("Topic must not be empty".into()).into());
        }
        if topic.chars().count() > MAX_TOPIC_CHARS {
            return Err(CoreError::Validation(format!(
                "Topic must be at most {MAX_TOPIC_CHARS} characters"
            ))
            .into());
        }

        let text = self.text_generator()?;
        let persona = self.load_persona(request.persona_id).await?;
        let voice = persona.as_ref().map(|p| PersonaVoice {
            name: &p.name,
            description: &p.description,
        });

        let body = text.infer(&compose_article_prompt(topic, voice)).await?;
        let body = body.trim();
        if body.is_empty() {
            return Err(CoreError::Upstream("LLM returned an empty article".into()).into());
        }

        let article = ArticleRepo::create(
            &self.pool,
            &CreateArticle {
                user_id: request.user_id.unwrap_or(DEFAULT_USER_ID),
                persona_id: persona.as_ref().map(|p| p.id),
                source: SOURCE_GENERATED.to_string(),
                url: None,
                text: body.to_string(),
            },
        )
        .await?;

        tracing::info!(
            article_id = article.id,
            persona_id = ?article.persona_id,
            chars = article.text.len(),
            "Composed article"
        );
        Ok(article)
    }
}

fn require_prompt(prompt: &str) -> Result<&str, PipelineError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(CoreError::Validation("Prompt must not be empty".into()).into());
    }
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        return Err(CoreError::Validation(format!(
            "Prompt must be at most {MAX_PROMPT_CHARS} characters"
        ))
        .into());
    }
    Ok(prompt)
}
