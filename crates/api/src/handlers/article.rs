//! Handlers for the `/articles` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use studio_core::error::CoreError;
use studio_core::media::MediaType;
use studio_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use studio_core::types::DbId;
use studio_db::models::article::Article;
use studio_db::repositories::{ArticleRepo, MediaRepo};

use crate::error::{AppError, AppResult};
use crate::query::{MediaTypeParams, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Article",
        id,
    })
}

/// GET /api/v1/articles?limit=&offset=
///
/// Newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Article>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);
    let articles = ArticleRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: articles }))
}

/// GET /api/v1/articles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Article>>> {
    let article = ArticleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(DataResponse { data: article }))
}

/// DELETE /api/v1/articles/{id}
///
/// Media generated for the article is deleted with it.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if ArticleRepo::delete(&state.pool, id).await? {
        tracing::info!(article_id = id, "Article deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/articles/{id}/media?media_type=
///
/// URLs of the article's media in creation order.
pub async fn list_media_urls(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<MediaTypeParams>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let media_type = params
        .media_type
        .as_deref()
        .map(MediaType::from_name)
        .transpose()?;

    ArticleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    let urls = MediaRepo::urls_by_article(&state.pool, id, media_type.map(MediaType::as_str)).await?;
    Ok(Json(DataResponse { data: urls }))
}
