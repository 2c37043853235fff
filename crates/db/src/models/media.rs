//! Media entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studio_core::types::{DbId, Timestamp};

/// A media row from the `media` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Media {
    pub id: DbId,
    pub article_id: Option<DbId>,
    pub persona_id: Option<DbId>,
    /// `image` or `video`; see [`studio_core::media::MediaType`].
    pub media_type: String,
    pub style: String,
    pub prompt: String,
    pub concept: Option<String>,
    pub media_url: String,
    pub date_created: Timestamp,
}

/// Media row joined with the article it illustrates.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MediaWithArticle {
    pub id: DbId,
    pub article_id: Option<DbId>,
    pub persona_id: Option<DbId>,
    pub media_type: String,
    pub style: String,
    pub prompt: String,
    pub concept: Option<String>,
    pub media_url: String,
    pub date_created: Timestamp,
    pub article_source: Option<String>,
    pub article_url: Option<String>,
}

/// DTO for storing a generated artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMedia {
    pub article_id: Option<DbId>,
    pub persona_id: Option<DbId>,
    pub media_type: String,
    pub style: String,
    /// Stored truncated; see [`studio_core::media::truncate_prompt`].
    pub prompt: String,
    pub concept: Option<String>,
    pub media_url: String,
}
