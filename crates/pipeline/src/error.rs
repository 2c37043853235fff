use studio_ai::AiError;
use studio_cloud::StorageError;
use studio_core::error::CoreError;

/// Errors produced by [`MediaPipeline`](crate::MediaPipeline) operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Validation failures and missing entities.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A provider call failed.
    #[error(transparent)]
    Provider(#[from] AiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The operation needs a provider that has no credentials configured.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}
