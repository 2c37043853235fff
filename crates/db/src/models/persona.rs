//! Persona entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studio_core::types::{DbId, Timestamp};
use validator::Validate;

/// A persona row from the `personas` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Persona {
    pub id: DbId,
    pub name: String,
    /// NOT NULL in the database; defaults to an empty string.
    pub description: String,
    pub image_url: Option<String>,
    pub date_created: Timestamp,
    pub date_updated: Timestamp,
}

/// DTO for creating a new persona.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePersona {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(url)]
    pub image_url: Option<String>,
}

/// DTO for updating an existing persona. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePersona {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}
