//! Route definitions for articles.

use axum::routing::get;
use axum::Router;

use crate::handlers::article;
use crate::state::AppState;

/// Routes mounted at `/articles`.
///
/// ```text
/// GET    /                  -> list
/// GET    /{id}              -> get_by_id
/// DELETE /{id}              -> delete
/// GET    /{id}/media        -> list_media_urls
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(article::list))
        .route("/{id}", get(article::get_by_id).delete(article::delete))
        .route("/{id}/media", get(article::list_media_urls))
}
