use axum::routing::post;
use axum::Router;

use crate::handlers::publish;
use crate::state::AppState;

/// Routes mounted at `/publish`.
///
/// ```text
/// POST   /x                 -> post_to_x
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/x", post(publish::post_to_x))
}
