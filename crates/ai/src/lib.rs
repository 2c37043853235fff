//! Clients for the hosted AI providers used by Persona Studio.
//!
//! - [`openai`]: text inference through the OpenAI responses endpoint.
//! - [`fal`]: image generation through the fal.ai queue API.
//! - [`reader`]: article text extraction through a Jina-style reader.
//!
//! The [`provider`] traits let the pipeline run against fakes in tests.

pub mod error;
pub mod fal;
pub mod openai;
pub mod provider;
pub mod reader;
pub mod validate;

pub use error::AiError;
pub use fal::{FalClient, GeneratedImage, ImageResult};
pub use openai::OpenAiClient;
pub use provider::{ArticleSource, FetchedArticle, ImageGenerator, TextGenerator};
pub use reader::ReaderClient;
