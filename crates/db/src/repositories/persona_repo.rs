//! Repository for the `personas` table.

use sqlx::PgPool;
use studio_core::types::DbId;

use crate::models::persona::{CreatePersona, Persona, UpdatePersona};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, image_url, date_created, date_updated";

/// Provides CRUD operations for personas.
pub struct PersonaRepo;

impl PersonaRepo {
    /// Insert a new persona, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePersona) -> Result<Persona, sqlx::Error> {
        let query = format!(
            "INSERT INTO personas (name, description, image_url)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Persona>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Find a persona by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Persona>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM personas WHERE id = $1");
        sqlx::query_as::<_, Persona>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all personas, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Persona>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM personas ORDER BY date_created DESC, id DESC");
        sqlx::query_as::<_, Persona>(&query).fetch_all(pool).await
    }

    /// Update a persona. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePersona,
    ) -> Result<Option<Persona>, sqlx::Error> {
        let query = format!(
            "UPDATE personas SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                image_url = COALESCE($4, image_url),
                date_updated = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Persona>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Point a persona at a newly uploaded avatar.
    pub async fn set_image_url(
        pool: &PgPool,
        id: DbId,
        image_url: &str,
    ) -> Result<Option<Persona>, sqlx::Error> {
        let query = format!(
            "UPDATE personas SET image_url = $2, date_updated = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Persona>(&query)
            .bind(id)
            .bind(image_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a persona. Articles and media keep their rows with `persona_id`
    /// set to NULL. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM personas WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
