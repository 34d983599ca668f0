/// Announcement (Pengumuman) model
///
/// Announcements are written by administrators and shown publicly only once
/// `is_published` is set. Unpublished announcements stay visible in the admin
/// listing.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE announcements (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     content TEXT,
///     image_path VARCHAR(512),
///     is_published BOOLEAN NOT NULL DEFAULT FALSE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,

    /// Short summary shown in listings
    pub description: String,

    /// Optional rich-text body, stored verbatim
    pub content: Option<String>,

    /// Disk-relative path, legacy asset path, or absolute URL
    pub image_path: Option<String>,

    pub is_published: bool,

    /// Author
    pub user_id: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update input
#[derive(Debug, Clone)]
pub struct AnnouncementInput {
    pub title: String,
    pub description: String,
    pub content: Option<String>,
    pub image_path: Option<String>,
    pub is_published: bool,
}

impl Announcement {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: AnnouncementInput,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Announcement>(
            r#"
            INSERT INTO announcements (title, description, content, image_path, is_published, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.content)
        .bind(data.image_path)
        .bind(data.is_published)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Any announcement, published or not
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Announcement>("SELECT * FROM announcements WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Announcement visible to the public; None when missing or unpublished
    pub async fn find_published(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Announcement>(
            "SELECT * FROM announcements WHERE id = $1 AND is_published = TRUE",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Published announcements, newest first
    pub async fn list_published(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Announcement>(
            r#"
            SELECT * FROM announcements
            WHERE is_published = TRUE
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn count_published(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM announcements WHERE is_published = TRUE")
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Every announcement for the admin listing, optionally filtered by title
    pub async fn list_all(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Announcement>(
            r#"
            SELECT * FROM announcements
            WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn count_all(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM announcements WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')",
        )
        .bind(search)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: AnnouncementInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Announcement>(
            r#"
            UPDATE announcements
            SET title = $2, description = $3, content = $4, image_path = $5,
                is_published = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.content)
        .bind(data.image_path)
        .bind(data.is_published)
        .fetch_optional(pool)
        .await
    }

    pub async fn set_published(
        pool: &PgPool,
        id: Uuid,
        is_published: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Announcement>(
            r#"
            UPDATE announcements SET is_published = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_published)
        .fetch_optional(pool)
        .await
    }

    /// Deletes and returns the row so its image can be removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Announcement>("DELETE FROM announcements WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
