/// Church official (Pengurus Gereja) model
///
/// The public roster lists active officials ordered by position rank and then
/// name. Rank is the declaration order of the `official_position` enum, so
/// `ORDER BY position` sorts priests first and plain members last.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "official_position", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OfficialPosition {
    ParishPriest,
    AssistantPriest,
    CouncilChair,
    ViceChair,
    Secretary,
    Treasurer,
    CommunityLeader,
    SectionHead,
    Member,
}

impl OfficialPosition {
    pub const ALL: [OfficialPosition; 9] = [
        OfficialPosition::ParishPriest,
        OfficialPosition::AssistantPriest,
        OfficialPosition::CouncilChair,
        OfficialPosition::ViceChair,
        OfficialPosition::Secretary,
        OfficialPosition::Treasurer,
        OfficialPosition::CommunityLeader,
        OfficialPosition::SectionHead,
        OfficialPosition::Member,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OfficialPosition::ParishPriest => "parish_priest",
            OfficialPosition::AssistantPriest => "assistant_priest",
            OfficialPosition::CouncilChair => "council_chair",
            OfficialPosition::ViceChair => "vice_chair",
            OfficialPosition::Secretary => "secretary",
            OfficialPosition::Treasurer => "treasurer",
            OfficialPosition::CommunityLeader => "community_leader",
            OfficialPosition::SectionHead => "section_head",
            OfficialPosition::Member => "member",
        }
    }

    /// Indonesian display title
    pub fn label(&self) -> &'static str {
        match self {
            OfficialPosition::ParishPriest => "Pastor Paroki",
            OfficialPosition::AssistantPriest => "Pastor Rekan",
            OfficialPosition::CouncilChair => "Ketua Dewan Pastoral",
            OfficialPosition::ViceChair => "Wakil Ketua",
            OfficialPosition::Secretary => "Sekretaris",
            OfficialPosition::Treasurer => "Bendahara",
            OfficialPosition::CommunityLeader => "Ketua Lingkungan",
            OfficialPosition::SectionHead => "Ketua Seksi",
            OfficialPosition::Member => "Anggota",
        }
    }
}

impl fmt::Display for OfficialPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfficialPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OfficialPosition::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown position: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChurchOfficial {
    pub id: Uuid,
    pub name: String,
    pub position: OfficialPosition,
    pub tenure_start: NaiveDate,
    pub tenure_end: Option<NaiveDate>,
    pub is_active: bool,
    pub community_id: Option<Uuid>,
    pub department: Option<String>,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update input
#[derive(Debug, Clone)]
pub struct ChurchOfficialInput {
    pub name: String,
    pub position: OfficialPosition,
    pub tenure_start: NaiveDate,
    pub tenure_end: Option<NaiveDate>,
    pub is_active: bool,
    pub community_id: Option<Uuid>,
    pub department: Option<String>,
    pub image_path: Option<String>,
}

impl ChurchOfficial {
    pub async fn create(pool: &PgPool, data: ChurchOfficialInput) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, ChurchOfficial>(
            r#"
            INSERT INTO church_officials
                (name, position, tenure_start, tenure_end, is_active, community_id, department, image_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(data.name)
        .bind(data.position)
        .bind(data.tenure_start)
        .bind(data.tenure_end)
        .bind(data.is_active)
        .bind(data.community_id)
        .bind(data.department)
        .bind(data.image_path)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ChurchOfficial>("SELECT * FROM church_officials WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: ChurchOfficialInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ChurchOfficial>(
            r#"
            UPDATE church_officials
            SET name = $2, position = $3, tenure_start = $4, tenure_end = $5,
                is_active = $6, community_id = $7, department = $8, image_path = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.position)
        .bind(data.tenure_start)
        .bind(data.tenure_end)
        .bind(data.is_active)
        .bind(data.community_id)
        .bind(data.department)
        .bind(data.image_path)
        .fetch_optional(pool)
        .await
    }

    /// Deletes and returns the row so its photo can be removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ChurchOfficial>("DELETE FROM church_officials WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Public roster
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ChurchOfficial>(
            r#"
            SELECT * FROM church_officials
            WHERE is_active = TRUE
            ORDER BY position ASC, name ASC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Admin listing including inactive officials
    pub async fn list_all(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ChurchOfficial>(
            r#"
            SELECT * FROM church_officials
            ORDER BY is_active DESC, position ASC, name ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM church_officials")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_rank_follows_declaration() {
        let mut shuffled = vec![
            OfficialPosition::Member,
            OfficialPosition::Treasurer,
            OfficialPosition::ParishPriest,
            OfficialPosition::CouncilChair,
        ];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![
                OfficialPosition::ParishPriest,
                OfficialPosition::CouncilChair,
                OfficialPosition::Treasurer,
                OfficialPosition::Member,
            ]
        );
    }

    #[test]
    fn test_position_parse() {
        for position in OfficialPosition::ALL {
            assert_eq!(position.as_str().parse::<OfficialPosition>(), Ok(position));
        }
        assert!("bishop".parse::<OfficialPosition>().is_err());
    }

    #[test]
    fn test_position_serde_matches_db_names() {
        let json = serde_json::to_string(&OfficialPosition::AssistantPriest).unwrap();
        assert_eq!(json, "\"assistant_priest\"");
    }
}
