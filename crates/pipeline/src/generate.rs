//! Article to images: the main generation flow.
//!
//! 1. Resolve the article text (fetch the link or take the pasted text).
//! 2. Store the article.
//! 3. Ask the LLM for visual concepts.
//! 4. Render one image per concept, at most
//!    [`MAX_CONCURRENT_RENDERS`] at a time.
//! 5. Store a media row for every image that succeeded.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use studio_core::error::CoreError;
use studio_core::media::{truncate_prompt, validate_style, MediaType, DEFAULT_STYLE};
use studio_core::prompt::{
    clamp_concept_count, concept_extraction_prompt, image_prompt, parse_concepts, PersonaVoice,
};
use studio_core::types::{DbId, DEFAULT_USER_ID};
use studio_db::models::article::{Article, CreateArticle, SOURCE_MANUAL};
use studio_db::models::media::CreateMedia;
use studio_db::models::persona::Persona;
use studio_db::repositories::{ArticleRepo, MediaRepo};

use crate::error::PipelineError;
use crate::mirror::mirror_image;
use crate::pipeline::{MediaPipeline, MAX_CONCURRENT_RENDERS};

/// Input to [`MediaPipeline::process_article`].
///
/// Exactly one of `link` and `text` is needed; when both are present the
/// link wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    pub user_id: Option<DbId>,
    pub link: Option<String>,
    pub text: Option<String>,
    pub style: Option<String>,
    pub persona_id: Option<DbId>,
    pub concept_count: Option<usize>,
}

/// One stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaEntry {
    pub media_id: DbId,
    pub media_url: String,
    pub concept: String,
}

/// Result of a completed generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub article_id: DbId,
    pub media_count: usize,
    pub media_entries: Vec<MediaEntry>,
}

/// Where the article text comes from.
enum ArticleInput {
    Link(String),
    Text(String),
}

impl GenerateRequest {
    fn article_input(&self) -> Result<ArticleInput, CoreError> {
        let non_empty = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        if let Some(link) = non_empty(&self.link) {
            return Ok(ArticleInput::Link(link));
        }
        if let Some(text) = non_empty(&self.text) {
            return Ok(ArticleInput::Text(text));
        }
        Err(CoreError::Validation(
            "Either 'link' or 'text' must be provided".into(),
        ))
    }
}

impl MediaPipeline {
    /// Turn an article into a set of stored, persona-aware images.
    ///
    /// Concepts whose image fails are logged and skipped. If no image
    /// succeeds the run fails with `Upstream`; the article row is kept.
    pub async fn process_article(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerationOutcome, PipelineError> {
        let input = request.article_input()?;
        let style = match request.style.as_deref() {
            Some(s) => validate_style(s)?,
            None => DEFAULT_STYLE.to_string(),
        };
        let count = clamp_concept_count(request.concept_count);
        let text_gen = self.text_generator()?;
        self.image_generator()?;
        let persona = self.load_persona(request.persona_id).await?;

        let article = self
            .store_article(input, request.user_id, persona.as_ref())
            .await?;
        tracing::info!(
            article_id = article.id,
            persona_id = ?request.persona_id,
            %style,
            count,
            "Starting generation run"
        );

        let voice = persona.as_ref().map(|p| PersonaVoice {
            name: &p.name,
            description: &p.description,
        });
        let raw = text_gen
            .infer(&concept_extraction_prompt(&article.text, count, voice))
            .await?;
        let concepts = parse_concepts(&raw, count);
        if concepts.is_empty() {
            return Err(CoreError::Upstream("LLM returned no usable concepts".into()).into());
        }

        let mut rendered: Vec<(usize, MediaEntry)> = stream::iter(0..concepts.len())
            .map(|idx| {
                let concept = &concepts[idx];
                let article = &article;
                let style = style.as_str();
                let persona = persona.as_ref();
                async move {
                    match self.render_concept(article, concept, style, persona).await {
                        Ok(entry) => Some((idx, entry)),
                        Err(e) => {
                            tracing::warn!(
                                article_id = article.id,
                                concept = %concept,
                                error = %e,
                                "Concept render failed, skipping"
                            );
                            None
                        }
                    }
                }
            })
            .buffer_unordered(MAX_CONCURRENT_RENDERS)
            .filter_map(|r| async move { r })
            .collect()
            .await;

        if rendered.is_empty() {
            return Err(CoreError::Upstream(format!(
                "No images could be generated for article {}",
                article.id
            ))
            .into());
        }
        rendered.sort_by_key(|(idx, _)| *idx);
        let media_entries: Vec<MediaEntry> = rendered.into_iter().map(|(_, e)| e).collect();

        tracing::info!(
            article_id = article.id,
            requested = concepts.len(),
            stored = media_entries.len(),
            "Generation run complete"
        );
        Ok(GenerationOutcome {
            article_id: article.id,
            media_count: media_entries.len(),
            media_entries,
        })
    }

    async fn store_article(
        &self,
        input: ArticleInput,
        user_id: Option<DbId>,
        persona: Option<&Persona>,
    ) -> Result<Article, PipelineError> {
        let (source, url, text) = match input {
            ArticleInput::Link(link) => {
                let fetched = self.articles.fetch(&link).await?;
                (fetched.url.clone(), Some(fetched.url), fetched.text)
            }
            ArticleInput::Text(text) => (SOURCE_MANUAL.to_string(), None, text),
        };

        let article = ArticleRepo::create(
            &self.pool,
            &CreateArticle {
                user_id: user_id.unwrap_or(DEFAULT_USER_ID),
                persona_id: persona.map(|p| p.id),
                source,
                url,
                text,
            },
        )
        .await?;
        Ok(article)
    }

    /// Render and store a single concept.
    async fn render_concept(
        &self,
        article: &Article,
        concept: &str,
        style: &str,
        persona: Option<&Persona>,
    ) -> Result<MediaEntry, PipelineError> {
        let images = self.image_generator()?;
        let voice = persona.map(|p| PersonaVoice {
            name: &p.name,
            description: &p.description,
        });
        let prompt = image_prompt(concept, style, voice);

        let result = match persona.and_then(|p| p.image_url.as_deref()) {
            Some(avatar) => images.image_to_image(&prompt, avatar).await?,
            None => images.text_to_image(&prompt).await?,
        };
        let provider_url = result
            .first()
            .map(|img| img.url.clone())
            .ok_or_else(|| CoreError::Upstream("Image model returned no images".into()))?;

        let media_url = match &self.mirror {
            Some(store) => match mirror_image(&self.http, store.as_ref(), &provider_url).await {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        url = %provider_url,
                        "Mirroring failed, keeping provider URL"
                    );
                    provider_url
                }
            },
            None => provider_url,
        };

        let media = MediaRepo::create(
            &self.pool,
            &CreateMedia {
                article_id: Some(article.id),
                persona_id: persona.map(|p| p.id),
                media_type: MediaType::Image.as_str().to_string(),
                style: style.to_string(),
                prompt: truncate_prompt(&prompt).to_string(),
                concept: Some(concept.to_string()),
                media_url,
            },
        )
        .await?;

        Ok(MediaEntry {
            media_id: media.id,
            media_url: media.media_url,
            concept: concept.to_string(),
        })
    }
}
