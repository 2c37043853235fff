//! Handlers for the `/media` resource (the image browser).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use studio_core::error::CoreError;
use studio_core::search::{
    clamp_limit, clamp_offset, sanitize_search_term, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};
use studio_core::types::DbId;
use studio_db::models::media::{Media, MediaWithArticle};
use studio_db::repositories::MediaRepo;

use crate::error::{AppError, AppResult};
use crate::query::MediaListParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Media", id })
}

/// GET /api/v1/media?limit=&offset=&search=
///
/// Newest first, joined with the source article. A blank `search` lists
/// everything.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<MediaListParams>,
) -> AppResult<Json<DataResponse<Vec<MediaWithArticle>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let media = match params.search.as_deref().and_then(sanitize_search_term) {
        Some(term) => MediaRepo::search(&state.pool, &term, limit, offset).await?,
        None => MediaRepo::list_with_article(&state.pool, limit, offset).await?,
    };
    Ok(Json(DataResponse { data: media }))
}

/// GET /api/v1/media/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Media>>> {
    let media = MediaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(DataResponse { data: media }))
}

/// DELETE /api/v1/media/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if MediaRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
