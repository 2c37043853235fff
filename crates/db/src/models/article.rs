//! Article entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studio_core::types::{DbId, Timestamp};

/// Source label for articles written by the LLM.
pub const SOURCE_GENERATED: &str = "generated";

/// Source label for articles supplied as raw text.
pub const SOURCE_MANUAL: &str = "manual";

/// An article row from the `articles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: DbId,
    pub user_id: DbId,
    pub persona_id: Option<DbId>,
    /// The link for fetched articles, otherwise [`SOURCE_GENERATED`] or [`SOURCE_MANUAL`].
    pub source: String,
    pub url: Option<String>,
    pub text: String,
    pub date_created: Timestamp,
}

/// DTO for inserting an article. Articles are immutable once stored.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticle {
    pub user_id: DbId,
    pub persona_id: Option<DbId>,
    pub source: String,
    pub url: Option<String>,
    pub text: String,
}
