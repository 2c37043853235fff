//! Route definitions for AI generation.

use axum::routing::post;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Routes mounted at `/generate`.
///
/// ```text
/// POST   /                  -> generate_from_article
/// POST   /image             -> generate_image
/// POST   /text              -> generate_text
/// POST   /article           -> compose_article
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(generation::generate_from_article))
        .route("/image", post(generation::generate_image))
        .route("/text", post(generation::generate_text))
        .route("/article", post(generation::compose_article))
}
