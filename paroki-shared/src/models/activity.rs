/// Parish activity (Kegiatan) model
///
/// Activities are dated events with a start time. Public listings split them
/// into upcoming and archive around the parish-local "today"; the activity
/// report selects them by date range.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::calendar::{DateRange, ScheduleFilter};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub location: Option<String>,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update input
#[derive(Debug, Clone)]
pub struct ActivityInput {
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub location: Option<String>,
    pub image_path: Option<String>,
}

const LIST_UPCOMING: &str = r#"
    SELECT * FROM activities
    WHERE date >= $1
    ORDER BY date ASC, start_time ASC, id ASC
    LIMIT $2 OFFSET $3
"#;

const LIST_ARCHIVE: &str = r#"
    SELECT * FROM activities
    WHERE date < $1
    ORDER BY date DESC, start_time DESC, id DESC
    LIMIT $2 OFFSET $3
"#;

impl Activity {
    pub async fn create(pool: &PgPool, data: ActivityInput) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities (name, description, date, start_time, location, image_path)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.date)
        .bind(data.start_time)
        .bind(data.location)
        .bind(data.image_path)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Activity>("SELECT * FROM activities WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: ActivityInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Activity>(
            r#"
            UPDATE activities
            SET name = $2, description = $3, date = $4, start_time = $5,
                location = $6, image_path = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.date)
        .bind(data.start_time)
        .bind(data.location)
        .bind(data.image_path)
        .fetch_optional(pool)
        .await
    }

    /// Deletes and returns the row so its image can be removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Activity>("DELETE FROM activities WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Upcoming (`date >= today`, ascending) or archive (`date < today`,
    /// descending) page
    pub async fn list_by_filter(
        pool: &PgPool,
        filter: ScheduleFilter,
        today: NaiveDate,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = match filter {
            ScheduleFilter::Upcoming => LIST_UPCOMING,
            ScheduleFilter::Archive => LIST_ARCHIVE,
        };

        sqlx::query_as::<_, Activity>(query)
            .bind(today)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_filter(
        pool: &PgPool,
        filter: ScheduleFilter,
        today: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        let query = match filter {
            ScheduleFilter::Upcoming => "SELECT COUNT(*) FROM activities WHERE date >= $1",
            ScheduleFilter::Archive => "SELECT COUNT(*) FROM activities WHERE date < $1",
        };

        let (count,): (i64,) = sqlx::query_as(query).bind(today).fetch_one(pool).await?;
        Ok(count)
    }

    /// Activities inside an inclusive date range, chronological
    pub async fn list_in_range(pool: &PgPool, range: DateRange) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Activity>(
            r#"
            SELECT * FROM activities
            WHERE date BETWEEN $1 AND $2
            ORDER BY date ASC, start_time ASC, id ASC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(pool)
        .await
    }

    /// Admin listing, newest date first
    pub async fn list_all(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities ORDER BY date DESC, start_time DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM activities")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
