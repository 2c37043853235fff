//! Generation orchestration for Persona Studio.
//!
//! [`MediaPipeline`] ties the provider traits from `studio-ai` to the
//! repositories in `studio-db`: it fetches or accepts article text, asks
//! the LLM for visual concepts, renders one image per concept and stores
//! the results. Providers are optional so the service can start without
//! API keys; operations that need a missing provider fail with
//! [`PipelineError::NotConfigured`].

pub mod error;
pub mod generate;
pub mod mirror;
pub mod pipeline;

pub use error::PipelineError;
pub use generate::{GenerateRequest, GenerationOutcome, MediaEntry};
pub use pipeline::{ComposeRequest, MediaPipeline, MAX_CONCURRENT_RENDERS};
