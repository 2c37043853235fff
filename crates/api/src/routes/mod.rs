pub mod article;
pub mod generation;
pub mod health;
pub mod media;
pub mod persona;
pub mod publish;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /personas                          list, create
/// /personas/{id}                     get, update, delete
/// /personas/{id}/avatar              upload avatar (multipart)
/// /personas/{id}/articles            articles written for the persona
///
/// /articles                          list (paginated)
/// /articles/{id}                     get, delete
/// /articles/{id}/media               media URLs (?media_type=)
///
/// /media                             list / search (paginated)
/// /media/{id}                        get, delete
///
/// /generate                          article -> images pipeline
/// /generate/image                    single image
/// /generate/text                     raw LLM inference
/// /generate/article                  compose an article
///
/// /publish/x                         post media to X
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/personas", persona::router())
        .nest("/articles", article::router())
        .nest("/media", media::router())
        .nest("/generate", generation::router())
        .nest("/publish", publish::router())
}
