/// Community (Komunitas Basis) model
///
/// A community is a neighbourhood group inside the parish. Every member
/// belongs to one; worship schedules are assigned to one or more.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Community {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Community with its member count (admin listing)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommunitySummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub community: Community,

    pub member_count: i64,
}

/// Minimal reference embedded in other resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommunityRef {
    pub id: Uuid,
    pub name: String,
}

/// Create/update input
#[derive(Debug, Clone)]
pub struct CommunityInput {
    pub name: String,
    pub description: Option<String>,
}

impl Community {
    pub async fn create(pool: &PgPool, data: CommunityInput) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Community>(
            "INSERT INTO communities (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(data.name.trim().to_string())
        .bind(data.description)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Community>("SELECT * FROM communities WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: CommunityInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Community>(
            r#"
            UPDATE communities SET name = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.name.trim().to_string())
        .bind(data.description)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a community
    ///
    /// Fails with a foreign key violation while members still belong to it.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM communities WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All communities ordered by name (form dropdowns)
    pub async fn list_all(pool: &PgPool) -> Result<Vec<CommunityRef>, sqlx::Error> {
        sqlx::query_as::<_, CommunityRef>("SELECT id, name FROM communities ORDER BY name ASC")
            .fetch_all(pool)
            .await
    }

    pub async fn list_with_member_counts(
        pool: &PgPool,
    ) -> Result<Vec<CommunitySummary>, sqlx::Error> {
        sqlx::query_as::<_, CommunitySummary>(
            r#"
            SELECT c.*, COUNT(u.id) AS member_count
            FROM communities c
            LEFT JOIN users u ON u.community_id = c.id
            GROUP BY c.id
            ORDER BY c.name ASC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// How many of `ids` exist
    pub async fn count_existing(pool: &PgPool, ids: &[Uuid]) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM communities WHERE id = ANY($1)")
                .bind(ids)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM communities")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
