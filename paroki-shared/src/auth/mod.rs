/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength rules
/// - [`jwt`]: HS256 access/refresh tokens carrying user id and role
/// - [`middleware`]: Bearer extraction and account loading
/// - [`authorization`]: admin and ownership checks
///
/// # Example
///
/// ```no_run
/// use paroki_shared::auth::jwt::issue_token_pair;
/// use paroki_shared::auth::password::{hash_password, verify_password};
/// use paroki_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("Paroki2025")?;
/// assert!(verify_password("Paroki2025", &hash)?);
///
/// let tokens = issue_token_pair(Uuid::new_v4(), Role::Umat, "secret-key-at-least-32-bytes!!!!")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
