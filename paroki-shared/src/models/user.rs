/// User model and database operations
///
/// Every user belongs to exactly one community and has exactly one role.
/// Members (`umat`) use the portal; administrators manage content.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'umat');
/// CREATE TYPE user_status AS ENUM ('active', 'inactive');
/// CREATE TYPE gender AS ENUM ('male', 'female');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,          -- unique on LOWER(email)
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'umat',
///     community_id UUID NOT NULL REFERENCES communities(id),
///     address TEXT,
///     birth_date DATE,
///     gender gender,
///     phone VARCHAR(32),
///     status user_status NOT NULL DEFAULT 'active',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use paroki_shared::models::user::{CreateUser, Role, User};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, community_id: Uuid) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     name: "Maria Goreti".to_string(),
///     email: "maria@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: Role::Umat,
///     community_id,
///     address: None,
///     birth_date: None,
///     gender: None,
///     phone: None,
/// }).await?;
///
/// let found = User::find_by_email(&pool, "MARIA@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Portal role
///
/// Older data identified roles by number (admin = 1, umat = 2); the
/// conversions below keep that mapping available for imports and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Parish administrator
    Admin,

    /// Parish member
    Umat,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Umat => "umat",
        }
    }

    pub fn legacy_id(&self) -> i16 {
        match self {
            Role::Admin => 1,
            Role::Umat => 2,
        }
    }

    pub fn from_legacy_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Umat),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Umat => "Umat",
        }
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn toggled(&self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Inactive,
            UserStatus::Inactive => UserStatus::Active,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserStatus::Active => "Aktif",
            UserStatus::Inactive => "Tidak Aktif",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Laki-laki",
            Gender::Female => "Perempuan",
        }
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,

    /// Argon2id hash, never serialized into responses
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub role: Role,
    pub community_id: Uuid,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// User joined with the name of their community
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserWithCommunity {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub user: User,

    pub community_name: String,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,

    /// Argon2id hash (NOT the plaintext password)
    pub password_hash: String,

    pub role: Role,
    pub community_id: Uuid,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
}

/// Profile fields a member may edit about themselves
#[derive(Debug, Clone)]
pub struct UpdateProfile {
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
}

/// Full replacement performed from the admin user form
#[derive(Debug, Clone)]
pub struct AdminUpdateUser {
    pub profile: UpdateProfile,
    pub role: Role,
    pub community_id: Uuid,
    pub status: UserStatus,
}

/// Filters for the admin user listing
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive match on name or email
    pub search: Option<String>,
    pub community_id: Option<Uuid>,
    pub status: Option<UserStatus>,
}

impl UserFilter {
    fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

const FILTERED_FROM: &str = r#"
    FROM users u
    JOIN communities c ON c.id = u.community_id
    WHERE ($1::text IS NULL OR u.name ILIKE '%' || $1 || '%' OR u.email ILIKE '%' || $1 || '%')
      AND ($2::uuid IS NULL OR u.community_id = $2)
      AND ($3::user_status IS NULL OR u.status = $3)
"#;

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Fails on a duplicate email (`users_email_key`) or an unknown community.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role, community_id,
                               address, birth_date, gender, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(data.name)
        .bind(data.email.trim().to_string())
        .bind(data.password_hash)
        .bind(data.role)
        .bind(data.community_id)
        .bind(data.address)
        .bind(data.birth_date)
        .bind(data.gender)
        .bind(data.phone)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive email lookup
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email.trim())
            .fetch_optional(pool)
            .await
    }

    /// User plus community name
    pub async fn find_with_community(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<UserWithCommunity>, sqlx::Error> {
        sqlx::query_as::<_, UserWithCommunity>(
            r#"
            SELECT u.*, c.name AS community_name
            FROM users u
            JOIN communities c ON c.id = u.community_id
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Replaces the self-editable profile fields
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProfile,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, email = $3, address = $4, birth_date = $5,
                gender = $6, phone = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.email.trim().to_string())
        .bind(data.address)
        .bind(data.birth_date)
        .bind(data.gender)
        .bind(data.phone)
        .fetch_optional(pool)
        .await
    }

    /// Replaces every admin-editable field
    pub async fn update_by_admin(
        pool: &PgPool,
        id: Uuid,
        data: AdminUpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, email = $3, address = $4, birth_date = $5,
                gender = $6, phone = $7, role = $8, community_id = $9,
                status = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.profile.name)
        .bind(data.profile.email.trim().to_string())
        .bind(data.profile.address)
        .bind(data.profile.birth_date)
        .bind(data.profile.gender)
        .bind(data.profile.phone)
        .bind(data.role)
        .bind(data.community_id)
        .bind(data.status)
        .fetch_optional(pool)
        .await
    }

    pub async fn update_password(
        pool: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_status(
        pool: &PgPool,
        id: Uuid,
        status: UserStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await
    }

    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a user (documents and announcements cascade)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Filtered page of users, ordered by name
    pub async fn list(
        pool: &PgPool,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserWithCommunity>, sqlx::Error> {
        let query = format!(
            "SELECT u.*, c.name AS community_name {} ORDER BY u.name ASC, u.id ASC LIMIT $4 OFFSET $5",
            FILTERED_FROM
        );

        sqlx::query_as::<_, UserWithCommunity>(&query)
            .bind(filter.search_term())
            .bind(filter.community_id)
            .bind(filter.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Every user matching the filter (roster export)
    pub async fn list_all(
        pool: &PgPool,
        filter: &UserFilter,
    ) -> Result<Vec<UserWithCommunity>, sqlx::Error> {
        let query = format!(
            "SELECT u.*, c.name AS community_name {} ORDER BY c.name ASC, u.name ASC",
            FILTERED_FROM
        );

        sqlx::query_as::<_, UserWithCommunity>(&query)
            .bind(filter.search_term())
            .bind(filter.community_id)
            .bind(filter.status)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &UserFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) {}", FILTERED_FROM);

        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(filter.search_term())
            .bind(filter.community_id)
            .bind(filter.status)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts users with the given role
    pub async fn count_by_role(pool: &PgPool, role: Role) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_legacy_mapping() {
        assert_eq!(Role::Admin.legacy_id(), 1);
        assert_eq!(Role::Umat.legacy_id(), 2);
        assert_eq!(Role::from_legacy_id(1), Some(Role::Admin));
        assert_eq!(Role::from_legacy_id(2), Some(Role::Umat));
        assert_eq!(Role::from_legacy_id(3), None);
        assert!(Role::Admin.is_admin());
        assert!(!Role::Umat.is_admin());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Umat).unwrap(), "\"umat\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(UserStatus::Active.toggled(), UserStatus::Inactive);
        assert_eq!(UserStatus::Inactive.toggled(), UserStatus::Active);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Yohanes".to_string(),
            email: "yohanes@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Umat,
            community_id: Uuid::new_v4(),
            address: None,
            birth_date: None,
            gender: Some(Gender::Male),
            phone: None,
            status: UserStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["gender"], "male");
        assert!(user.is_active());
    }

    #[test]
    fn test_filter_search_term_ignores_blank() {
        let filter = UserFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.search_term(), None);

        let filter = UserFilter {
            search: Some(" maria ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.search_term(), Some("maria"));
    }
}
