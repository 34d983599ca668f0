/// Request authentication
///
/// Extracts the Bearer token from an `Authorization` header value, validates
/// it as an access token and loads the account so deactivated users are
/// rejected immediately rather than when their token expires. The axum layer
/// in the API crate calls [`authenticate`] and inserts the resulting
/// [`AuthContext`] into request extensions.
///
/// # Example
///
/// ```no_run
/// use paroki_shared::auth::middleware::authenticate;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, header: Option<&str>) {
/// match authenticate(&pool, "jwt-secret", header).await {
///     Ok(ctx) => println!("user {} as {:?}", ctx.user_id, ctx.role),
///     Err(e) => println!("rejected: {}", e),
/// }
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};
use crate::models::user::{Role, User};

/// Authenticated caller, available to handlers via `Extension<AuthContext>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,

    /// Role as currently stored, not as issued in the token
    pub role: Role,
}

impl AuthContext {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token was valid but the account no longer exists
    #[error("Unknown account")]
    UnknownUser,

    #[error("Account is inactive")]
    Inactive,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Pulls the token out of `Bearer <token>`
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingCredentials)?;

    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Empty Bearer token".to_string()));
    }

    Ok(token)
}

/// Validates the header and loads the caller's account
pub async fn authenticate(
    pool: &PgPool,
    secret: &str,
    header: Option<&str>,
) -> Result<AuthContext, AuthError> {
    let token = bearer_token(header)?;

    let claims = validate_access_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
        other => AuthError::InvalidToken(other.to_string()),
    })?;

    let user = User::find_by_id(pool, claims.sub)
        .await?
        .ok_or(AuthError::UnknownUser)?;

    if !user.is_active() {
        tracing::debug!(user_id = %user.id, "Rejected inactive account");
        return Err(AuthError::Inactive);
    }

    Ok(AuthContext::new(user.id, user.role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token(Some("bearer abc")).unwrap(), "abc");
        assert!(matches!(bearer_token(None), Err(AuthError::MissingCredentials)));
        assert!(matches!(
            bearer_token(Some("Basic dXNlcjpwYXNz")),
            Err(AuthError::InvalidFormat(_))
        ));
        assert!(matches!(bearer_token(Some("Bearer  ")), Err(AuthError::InvalidFormat(_))));
    }

    #[test]
    fn test_auth_context() {
        let ctx = AuthContext::new(Uuid::new_v4(), Role::Admin);
        assert!(ctx.is_admin());
        assert!(!AuthContext::new(Uuid::new_v4(), Role::Umat).is_admin());
    }
}
