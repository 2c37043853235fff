//! Handler for publishing stored media to X.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use studio_cloud::PostResult;
use studio_core::error::CoreError;
use studio_core::media::MediaType;
use studio_core::types::DbId;
use studio_db::repositories::MediaRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /publish/x`.
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub media_id: DbId,
    #[serde(default)]
    pub text: String,
}

/// POST /api/v1/publish/x
///
/// Posts a stored image with `text`. Videos are rejected.
pub async fn post_to_x(
    State(state): State<AppState>,
    Json(input): Json<PublishRequest>,
) -> AppResult<Json<DataResponse<PostResult>>> {
    let publisher = state
        .publisher
        .clone()
        .ok_or_else(|| AppError::ServiceUnavailable("Publishing to X is not configured".into()))?;

    let media = MediaRepo::find_by_id(&state.pool, input.media_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Media",
            id: input.media_id,
        }))?;
    let media_type = MediaType::from_name(&media.media_type)?;

    let result = publisher
        .post_media(&media.media_url, media_type, input.text.trim())
        .await?;
    tracing::info!(media_id = media.id, post_id = %result.post_id, "Published media to X");
    Ok(Json(DataResponse { data: result }))
}
