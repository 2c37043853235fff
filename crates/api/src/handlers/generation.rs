//! Handlers for `/generate`: the article pipeline and single-step
//! text and image generation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use studio_ai::GeneratedImage;
use studio_core::error::CoreError;
use studio_db::models::article::Article;
use studio_pipeline::{ComposeRequest, GenerateRequest, GenerationOutcome};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /generate/image`.
#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    /// Reference image; switches to image-to-image.
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub image_url: String,
    pub metadata: GeneratedImage,
}

/// Body of `POST /generate/text`.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub text: String,
}

/// POST /api/v1/generate
///
/// Runs the full article pipeline. Answers 201 with the article id and the
/// stored media.
pub async fn generate_from_article(
    State(state): State<AppState>,
    Json(input): Json<GenerateRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<GenerationOutcome>>)> {
    let outcome = state.pipeline.process_article(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

/// POST /api/v1/generate/image
///
/// The image is returned but not stored.
pub async fn generate_image(
    State(state): State<AppState>,
    Json(input): Json<ImageRequest>,
) -> AppResult<Json<DataResponse<ImageResponse>>> {
    let result = state
        .pipeline
        .generate_image(&input.prompt, input.image_url.as_deref())
        .await?;
    let image = result
        .images
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::Upstream("Image model returned no images".into()))?;

    Ok(Json(DataResponse {
        data: ImageResponse {
            image_url: image.url.clone(),
            metadata: image,
        },
    }))
}

/// POST /api/v1/generate/text
pub async fn generate_text(
    State(state): State<AppState>,
    Json(input): Json<TextRequest>,
) -> AppResult<Json<DataResponse<TextResponse>>> {
    let text = state.pipeline.infer(&input.prompt).await?;
    Ok(Json(DataResponse {
        data: TextResponse { text },
    }))
}

/// POST /api/v1/generate/article
///
/// Writes and stores a new article, in a persona's voice when `persona_id`
/// is given.
pub async fn compose_article(
    State(state): State<AppState>,
    Json(input): Json<ComposeRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Article>>)> {
    let article = state.pipeline.compose_article(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: article })))
}
