//! Repository for the `media` table.

use sqlx::PgPool;
use studio_core::search::contains_pattern;
use studio_core::types::DbId;

use crate::models::media::{CreateMedia, Media, MediaWithArticle};

const COLUMNS: &str =
    "id, article_id, persona_id, media_type, style, prompt, concept, media_url, date_created";

/// Media columns prefixed with the `m` alias plus the joined article fields.
const JOINED_COLUMNS: &str = "m.id, m.article_id, m.persona_id, m.media_type, m.style, m.prompt, \
     m.concept, m.media_url, m.date_created, a.source AS article_source, a.url AS article_url";

/// Provides storage, browsing and search for generated media.
pub struct MediaRepo;

impl MediaRepo {
    /// Insert a media row, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMedia) -> Result<Media, sqlx::Error> {
        let query = format!(
            "INSERT INTO media (article_id, persona_id, media_type, style, prompt, concept, media_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(input.article_id)
            .bind(input.persona_id)
            .bind(&input.media_type)
            .bind(&input.style)
            .bind(&input.prompt)
            .bind(&input.concept)
            .bind(&input.media_url)
            .fetch_one(pool)
            .await
    }

    /// Find a media row by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Media>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media WHERE id = $1");
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List media with article context, newest first.
    pub async fn list_with_article(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MediaWithArticle>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM media m
             LEFT JOIN articles a ON a.id = m.article_id
             ORDER BY m.date_created DESC, m.id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, MediaWithArticle>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive contains-search over prompt, concept, style and the
    /// article source. `term` must already be sanitized.
    pub async fn search(
        pool: &PgPool,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MediaWithArticle>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM media m
             LEFT JOIN articles a ON a.id = m.article_id
             WHERE m.prompt ILIKE $1
                OR m.concept ILIKE $1
                OR m.style ILIKE $1
                OR a.source ILIKE $1
             ORDER BY m.date_created DESC, m.id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, MediaWithArticle>(&query)
            .bind(contains_pattern(term))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// URLs of an article's media in creation order, optionally filtered by type.
    pub async fn urls_by_article(
        pool: &PgPool,
        article_id: DbId,
        media_type: Option<&str>,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT media_url FROM media
             WHERE article_id = $1 AND ($2::TEXT IS NULL OR media_type = $2)
             ORDER BY id ASC",
        )
        .bind(article_id)
        .bind(media_type)
        .fetch_all(pool)
        .await
    }

    /// Delete a media row. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
