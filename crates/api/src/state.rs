use std::sync::Arc;

use studio_cloud::{ObjectStore, XPublisher};
use studio_pipeline::MediaPipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: studio_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Generation orchestration over the configured AI providers.
    pub pipeline: MediaPipeline,
    /// Object storage for avatars. `None` when storage is disabled.
    pub store: Option<Arc<dyn ObjectStore>>,
    /// X publishing client. `None` without a user access token.
    pub publisher: Option<Arc<XPublisher>>,
}
