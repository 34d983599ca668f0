/// Visitor feedback (Kritik & Saran)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub name: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Feedback {
    pub async fn create(pool: &PgPool, name: &str, message: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            "INSERT INTO feedback (name, message) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(message)
        .fetch_one(pool)
        .await
    }

    /// Unread first, then newest
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            r#"
            SELECT * FROM feedback
            ORDER BY is_read ASC, created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM feedback")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    pub async fn count_unread(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM feedback WHERE is_read = FALSE")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    pub async fn set_read(pool: &PgPool, id: Uuid, is_read: bool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            "UPDATE feedback SET is_read = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_read)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM feedback WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
