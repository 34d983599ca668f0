/// Worship schedule (Jadwal Ibadah) model
///
/// A schedule names the service, its date and start time, and the person in
/// charge. It is assigned to one or more communities through the
/// `worship_schedule_communities` join table.
///
/// # Eager loading
///
/// Listings load schedules first and then attach communities for the whole
/// page with a single `= ANY($1)` query (see [`WorshipSchedule::with_communities`]).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use super::community::CommunityRef;
use crate::calendar::{DateRange, ScheduleFilter};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorshipSchedule {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub person_in_charge: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Schedule with its assigned communities
#[derive(Debug, Clone, Serialize)]
pub struct WorshipScheduleWithCommunities {
    #[serde(flatten)]
    pub schedule: WorshipSchedule,

    pub communities: Vec<CommunityRef>,
}

/// Create/update input
#[derive(Debug, Clone)]
pub struct WorshipScheduleInput {
    pub name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub person_in_charge: String,
    pub community_ids: Vec<Uuid>,
}

#[derive(sqlx::FromRow)]
struct ScheduleCommunityRow {
    worship_schedule_id: Uuid,
    id: Uuid,
    name: String,
}

const LIST_UPCOMING: &str = r#"
    SELECT * FROM worship_schedules
    WHERE date >= $1
    ORDER BY date ASC, start_time ASC, id ASC
    LIMIT $2 OFFSET $3
"#;

const LIST_ARCHIVE: &str = r#"
    SELECT * FROM worship_schedules
    WHERE date < $1
    ORDER BY date DESC, start_time DESC, id DESC
    LIMIT $2 OFFSET $3
"#;

impl WorshipSchedule {
    /// Creates a schedule and its community assignments in one transaction
    pub async fn create(
        pool: &PgPool,
        data: WorshipScheduleInput,
    ) -> Result<WorshipScheduleWithCommunities, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let schedule = sqlx::query_as::<_, WorshipSchedule>(
            r#"
            INSERT INTO worship_schedules (name, date, start_time, person_in_charge)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(data.date)
        .bind(data.start_time)
        .bind(&data.person_in_charge)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO worship_schedule_communities (worship_schedule_id, community_id)
            SELECT $1, UNNEST($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(schedule.id)
        .bind(&data.community_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut loaded = Self::with_communities(pool, vec![schedule]).await?;
        loaded.pop().ok_or(sqlx::Error::RowNotFound)
    }

    /// Replaces fields and community assignments in one transaction
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: WorshipScheduleInput,
    ) -> Result<Option<WorshipScheduleWithCommunities>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let schedule = sqlx::query_as::<_, WorshipSchedule>(
            r#"
            UPDATE worship_schedules
            SET name = $2, date = $3, start_time = $4, person_in_charge = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(data.date)
        .bind(data.start_time)
        .bind(&data.person_in_charge)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(schedule) = schedule else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("DELETE FROM worship_schedule_communities WHERE worship_schedule_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO worship_schedule_communities (worship_schedule_id, community_id)
            SELECT $1, UNNEST($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(id)
        .bind(&data.community_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut loaded = Self::with_communities(pool, vec![schedule]).await?;
        Ok(loaded.pop())
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM worship_schedules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<WorshipScheduleWithCommunities>, sqlx::Error> {
        let schedule = sqlx::query_as::<_, WorshipSchedule>("SELECT * FROM worship_schedules WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match schedule {
            Some(schedule) => Ok(Self::with_communities(pool, vec![schedule]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Upcoming or archive page with communities attached
    pub async fn list_by_filter(
        pool: &PgPool,
        filter: ScheduleFilter,
        today: NaiveDate,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorshipScheduleWithCommunities>, sqlx::Error> {
        let query = match filter {
            ScheduleFilter::Upcoming => LIST_UPCOMING,
            ScheduleFilter::Archive => LIST_ARCHIVE,
        };

        let schedules = sqlx::query_as::<_, WorshipSchedule>(query)
            .bind(today)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Self::with_communities(pool, schedules).await
    }

    pub async fn count_by_filter(
        pool: &PgPool,
        filter: ScheduleFilter,
        today: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        let query = match filter {
            ScheduleFilter::Upcoming => "SELECT COUNT(*) FROM worship_schedules WHERE date >= $1",
            ScheduleFilter::Archive => "SELECT COUNT(*) FROM worship_schedules WHERE date < $1",
        };

        let (count,): (i64,) = sqlx::query_as(query).bind(today).fetch_one(pool).await?;
        Ok(count)
    }

    /// Next schedules assigned to one community
    pub async fn list_upcoming_for_community(
        pool: &PgPool,
        community_id: Uuid,
        today: NaiveDate,
        limit: i64,
    ) -> Result<Vec<WorshipScheduleWithCommunities>, sqlx::Error> {
        let schedules = sqlx::query_as::<_, WorshipSchedule>(
            r#"
            SELECT ws.* FROM worship_schedules ws
            JOIN worship_schedule_communities wsc ON wsc.worship_schedule_id = ws.id
            WHERE wsc.community_id = $1 AND ws.date >= $2
            ORDER BY ws.date ASC, ws.start_time ASC, ws.id ASC
            LIMIT $3
            "#,
        )
        .bind(community_id)
        .bind(today)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Self::with_communities(pool, schedules).await
    }

    /// Schedules inside an inclusive date range, chronological
    pub async fn list_in_range(
        pool: &PgPool,
        range: DateRange,
    ) -> Result<Vec<WorshipScheduleWithCommunities>, sqlx::Error> {
        let schedules = sqlx::query_as::<_, WorshipSchedule>(
            r#"
            SELECT * FROM worship_schedules
            WHERE date BETWEEN $1 AND $2
            ORDER BY date ASC, start_time ASC, id ASC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(pool)
        .await?;

        Self::with_communities(pool, schedules).await
    }

    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM worship_schedules")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Attaches communities to a batch of schedules, keeping their order
    pub async fn with_communities(
        pool: &PgPool,
        schedules: Vec<WorshipSchedule>,
    ) -> Result<Vec<WorshipScheduleWithCommunities>, sqlx::Error> {
        if schedules.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = schedules.iter().map(|s| s.id).collect();
        let rows = sqlx::query_as::<_, ScheduleCommunityRow>(
            r#"
            SELECT wsc.worship_schedule_id, c.id, c.name
            FROM worship_schedule_communities wsc
            JOIN communities c ON c.id = wsc.community_id
            WHERE wsc.worship_schedule_id = ANY($1)
            ORDER BY c.name ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut by_schedule: HashMap<Uuid, Vec<CommunityRef>> = HashMap::new();
        for row in rows {
            by_schedule
                .entry(row.worship_schedule_id)
                .or_default()
                .push(CommunityRef {
                    id: row.id,
                    name: row.name,
                });
        }

        Ok(schedules
            .into_iter()
            .map(|schedule| {
                let communities = by_schedule.remove(&schedule.id).unwrap_or_default();
                WorshipScheduleWithCommunities {
                    schedule,
                    communities,
                }
            })
            .collect())
    }
}

impl WorshipScheduleWithCommunities {
    /// Comma-separated community names for reports
    pub fn community_names(&self) -> String {
        if self.communities.is_empty() {
            return "-".to_string();
        }

        self.communities
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
