/// Member document (PDF) model
///
/// Each member has four numbered document slots (0..=3). A slot holds at most
/// one file; the schema enforces this with `CHECK (slot BETWEEN 0 AND 3)` and
/// `UNIQUE (user_id, slot)`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_pdfs (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     slot SMALLINT NOT NULL CHECK (slot BETWEEN 0 AND 3),
///     file_path VARCHAR(512) NOT NULL,
///     file_name VARCHAR(255) NOT NULL,
///     file_size BIGINT NOT NULL,
///     checksum CHAR(64) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (user_id, slot)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

/// Number of document slots per member
pub const MAX_SLOTS: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserPdf {
    pub id: Uuid,
    pub user_id: Uuid,
    pub slot: i16,

    /// Disk-relative path under `user_pdfs/{user_id}/`
    #[serde(skip_serializing)]
    pub file_path: String,

    /// Client file name, used for downloads
    pub file_name: String,

    pub file_size: i64,

    /// SHA-256 of the content, hex encoded
    pub checksum: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for recording a stored document
#[derive(Debug, Clone)]
pub struct CreateUserPdf {
    pub user_id: Uuid,
    pub slot: i16,
    pub file_path: String,
    pub file_name: String,
    pub file_size: i64,
    pub checksum: String,
}

/// Hex-encoded SHA-256 of a file body
pub fn checksum(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

impl UserPdf {
    pub async fn create(pool: &PgPool, data: CreateUserPdf) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, UserPdf>(
            r#"
            INSERT INTO user_pdfs (user_id, slot, file_path, file_name, file_size, checksum)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(data.user_id)
        .bind(data.slot)
        .bind(data.file_path)
        .bind(data.file_name)
        .bind(data.file_size)
        .bind(data.checksum)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserPdf>("SELECT * FROM user_pdfs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A member's documents in slot order
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserPdf>("SELECT * FROM user_pdfs WHERE user_id = $1 ORDER BY slot ASC")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_pdfs WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_pdfs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes the record at a slot, returning it so the file can be deleted
    pub async fn delete_by_user_slot(
        pool: &PgPool,
        user_id: Uuid,
        slot: i16,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserPdf>(
            "DELETE FROM user_pdfs WHERE user_id = $1 AND slot = $2 RETURNING *",
        )
        .bind(user_id)
        .bind(slot)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_sha256_hex() {
        assert_eq!(
            checksum(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(checksum(b"%PDF-1.4").len(), 64);
    }

    #[test]
    fn test_file_path_not_serialized() {
        let owner = Uuid::new_v4();
        let pdf = UserPdf {
            id: Uuid::new_v4(),
            user_id: owner,
            slot: 2,
            file_path: format!("user_pdfs/{}/x.pdf", owner),
            file_name: "baptis.pdf".to_string(),
            file_size: 1024,
            checksum: checksum(b"x"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&pdf).unwrap();
        assert!(json.get("file_path").is_none());
        assert_eq!(json["slot"], 2);
    }
}
