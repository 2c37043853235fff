//! Repository for the `articles` table.

use sqlx::PgPool;
use studio_core::types::DbId;

use crate::models::article::{Article, CreateArticle};

const COLUMNS: &str = "id, user_id, persona_id, source, url, text, date_created";

/// Provides insert, lookup, listing and deletion for articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Insert a new article, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateArticle) -> Result<Article, sqlx::Error> {
        let query = format!(
            "INSERT INTO articles (user_id, persona_id, source, url, text)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(input.user_id)
            .bind(input.persona_id)
            .bind(&input.source)
            .bind(&input.url)
            .bind(&input.text)
            .fetch_one(pool)
            .await
    }

    /// Find an article by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List articles, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Article>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM articles
             ORDER BY date_created DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List the articles attributed to a persona, newest first.
    pub async fn list_by_persona(
        pool: &PgPool,
        persona_id: DbId,
    ) -> Result<Vec<Article>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM articles
             WHERE persona_id = $1
             ORDER BY date_created DESC, id DESC"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(persona_id)
            .fetch_all(pool)
            .await
    }

    /// Delete an article. Its media rows are removed by `ON DELETE CASCADE`.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
