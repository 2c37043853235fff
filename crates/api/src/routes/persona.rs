//! Route definitions for personas.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use studio_core::persona::MAX_AVATAR_BYTES;

use crate::handlers::persona;
use crate::state::AppState;

/// Routes mounted at `/personas`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// POST   /{id}/avatar       -> upload_avatar
/// GET    /{id}/articles     -> list_articles
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(persona::list).post(persona::create))
        .route(
            "/{id}",
            get(persona::get_by_id)
                .put(persona::update)
                .delete(persona::delete),
        )
        .route(
            "/{id}/avatar",
            // Leave headroom over the file itself for multipart framing.
            post(persona::upload_avatar).layer(DefaultBodyLimit::max(MAX_AVATAR_BYTES + 64 * 1024)),
        )
        .route("/{id}/articles", get(persona::list_articles))
}
