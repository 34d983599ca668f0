/// Authorization checks
///
/// The portal has two rules: admin routes require [`Role::Admin`], and a
/// member may only act on records they own (their documents, their profile).
///
/// # Example
///
/// ```
/// use paroki_shared::auth::authorization::{require_admin, require_owner};
/// use paroki_shared::auth::middleware::AuthContext;
/// use paroki_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let member = AuthContext::new(Uuid::new_v4(), Role::Umat);
///
/// assert!(require_admin(&member).is_err());
/// assert!(require_owner(&member, member.user_id).is_ok());
/// assert!(require_owner(&member, Uuid::new_v4()).is_err());
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;
use crate::models::user::Role;

#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    #[error("Insufficient permissions: requires {required:?}")]
    InsufficientRole { required: Role },

    #[error("Not authorized to access this resource")]
    NotOwner,
}

pub fn require_admin(auth: &AuthContext) -> Result<(), AuthzError> {
    if auth.role.is_admin() {
        Ok(())
    } else {
        Err(AuthzError::InsufficientRole {
            required: Role::Admin,
        })
    }
}

/// Ensures the caller owns a record; administrators get no exemption
pub fn require_owner(auth: &AuthContext, owner_id: Uuid) -> Result<(), AuthzError> {
    if auth.user_id == owner_id {
        Ok(())
    } else {
        Err(AuthzError::NotOwner)
    }
}
