//! Route definitions for generated media.

use axum::routing::get;
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Routes mounted at `/media`.
///
/// ```text
/// GET    /                  -> list (?limit=&offset=&search=)
/// GET    /{id}              -> get_by_id
/// DELETE /{id}              -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(media::list))
        .route("/{id}", get(media::get_by_id).delete(media::delete))
}
