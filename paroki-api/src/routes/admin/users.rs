/// Member account management
///
/// ```text
/// GET    /admin/users?page=&search=&community_id=&status=
/// POST   /admin/users
/// GET    /admin/users/{id}
/// PUT    /admin/users/{id}
/// DELETE /admin/users/{id}
/// PATCH  /admin/users/{id}/status
/// GET    /admin/users/export?search=&community_id=&status=&format=
/// GET    /admin/users/{id}/export?format=
/// ```
///
/// Administrators cannot deactivate, demote or delete their own account.
/// Deleting an account removes the member's stored documents.

use super::reports::report_response;
use super::{empty_as_none, PER_PAGE};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    forms::{ensure_valid, extend_with, push_error},
    routes::member::settings::{ensure_email_available, ProfileRequest},
    view::{Inertia, Page},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Extension, Json,
};
use paroki_shared::{
    auth::{middleware::AuthContext, password},
    models::{
        community::{Community, CommunityRef},
        user::{AdminUpdateUser, CreateUser, Role, User, UserFilter, UserStatus, UserWithCommunity},
        user_pdf::UserPdf,
    },
    pagination::{PageRequest, Paginated},
    report::{templates, ReportFormat},
    storage::user_pdf_dir,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Listing and roster export filter
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub page: Option<u32>,
    pub search: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub community_id: Option<Uuid>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<StatusParam>,

    #[serde(default)]
    pub format: ReportFormat,
}

/// `active` / `inactive` as a query value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusParam(pub UserStatus);

impl std::str::FromStr for StatusParam {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(StatusParam(UserStatus::Active)),
            "inactive" => Ok(StatusParam(UserStatus::Inactive)),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

impl UserQuery {
    pub fn filter(&self) -> UserFilter {
        UserFilter {
            search: self.search.clone(),
            community_id: self.community_id,
            status: self.status.map(|s| s.0),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    #[serde(default)]
    pub format: ReportFormat,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(flatten)]
    pub profile: ProfileRequest,

    pub password: String,
    pub role: Role,
    pub community_id: Uuid,

    #[serde(default)]
    pub status: Option<UserStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(flatten)]
    pub profile: ProfileRequest,

    pub role: Role,
    pub community_id: Uuid,
    pub status: UserStatus,

    /// Replaces the password when present and non-empty
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IndexProps {
    pub users: Paginated<UserWithCommunity>,
    pub communities: Vec<CommunityRef>,
}

#[derive(Debug, Serialize)]
pub struct ShowProps {
    pub user: UserWithCommunity,
    pub documents: Vec<UserPdf>,
    pub communities: Vec<CommunityRef>,
}

async fn check_community(
    state: &AppState,
    community_id: Uuid,
    errors: &mut Vec<crate::error::ValidationErrorDetail>,
) -> ApiResult<()> {
    if Community::find_by_id(&state.db, community_id).await?.is_none() {
        push_error(errors, "community_id", "Lingkungan tidak ditemukan");
    }
    Ok(())
}

fn check_password(password: &str, errors: &mut Vec<crate::error::ValidationErrorDetail>) {
    if let Err(message) = password::validate_password_strength(password) {
        push_error(errors, "password", message);
    }
}

fn refuse_self(auth: &AuthContext, id: Uuid, action: &str) -> ApiResult<()> {
    if auth.user_id == id {
        return Err(ApiError::Conflict(format!("You cannot {} your own account", action)));
    }
    Ok(())
}

pub async fn index(
    State(state): State<AppState>,
    inertia: Inertia,
    Query(query): Query<UserQuery>,
) -> ApiResult<Page<IndexProps>> {
    let filter = query.filter();
    let request = PageRequest::new(query.page, PER_PAGE);

    let rows = User::list(&state.db, &filter, request.limit(), request.offset()).await?;
    let total = User::count(&state.db, &filter).await?;

    Ok(inertia.render(
        "Admin/Users/Index",
        IndexProps {
            users: Paginated::new(rows, request, total),
            communities: Community::list_all(&state.db).await?,
        },
    ))
}

pub async fn show(
    State(state): State<AppState>,
    inertia: Inertia,
    Path(id): Path<Uuid>,
) -> ApiResult<Page<ShowProps>> {
    let user = User::find_with_community(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(inertia.render(
        "Admin/Users/Show",
        ShowProps {
            user,
            documents: UserPdf::list_by_user(&state.db, id).await?,
            communities: Community::list_all(&state.db).await?,
        },
    ))
}

pub async fn store(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let mut errors = Vec::new();
    extend_with(&mut errors, req.profile.validate());
    check_password(&req.password, &mut errors);
    check_community(&state, req.community_id, &mut errors).await?;
    ensure_valid(errors)?;

    if User::find_by_email(&state.db, &req.profile.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let password_hash = password::hash_password_async(req.password.clone()).await?;
    let profile = req.profile.into_update();

    let mut user = User::create(
        &state.db,
        CreateUser {
            name: profile.name,
            email: profile.email,
            password_hash,
            role: req.role,
            community_id: req.community_id,
            address: profile.address,
            birth_date: profile.birth_date,
            gender: profile.gender,
            phone: profile.phone,
        },
    )
    .await?;

    if let Some(status) = req.status.filter(|s| *s != user.status) {
        if let Some(updated) = User::set_status(&state.db, user.id, status).await? {
            user = updated;
        }
    }

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User created by admin");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let mut errors = Vec::new();
    extend_with(&mut errors, req.profile.validate());
    check_community(&state, req.community_id, &mut errors).await?;

    let new_password = req.password.as_deref().map(str::trim).filter(|p| !p.is_empty());
    if let Some(password) = new_password {
        check_password(password, &mut errors);
    }

    if auth.user_id == id {
        if req.role != Role::Admin {
            push_error(&mut errors, "role", "Tidak dapat mengubah peran akun sendiri");
        }
        if req.status != UserStatus::Active {
            push_error(&mut errors, "status", "Tidak dapat menonaktifkan akun sendiri");
        }
    }
    ensure_valid(errors)?;

    ensure_email_available(&state, &req.profile.email, id).await?;

    let password_hash = match new_password {
        Some(password) => Some(password::hash_password_async(password.to_string()).await?),
        None => None,
    };

    let user = User::update_by_admin(
        &state.db,
        id,
        AdminUpdateUser {
            profile: req.profile.into_update(),
            role: req.role,
            community_id: req.community_id,
            status: req.status,
        },
    )
    .await?
    .ok_or_else(|| ApiError::not_found("User"))?;

    if let Some(hash) = password_hash {
        User::update_password(&state.db, id, &hash).await?;
    }

    tracing::info!(user_id = %id, role = user.role.as_str(), status = user.status.label(), "User updated by admin");
    Ok(Json(user))
}

pub async fn destroy(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    refuse_self(&auth, id, "delete")?;

    if !User::delete(&state.db, id).await? {
        return Err(ApiError::not_found("User"));
    }

    if let Err(e) = state.storage.delete_dir(&user_pdf_dir(id)).await {
        tracing::warn!(user_id = %id, error = %e, "Failed to remove member documents");
    }

    tracing::info!(user_id = %id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    refuse_self(&auth, id, "deactivate")?;

    let existing = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    let user = User::set_status(&state.db, id, existing.status.toggled())
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    tracing::info!(user_id = %id, status = user.status.label(), "User status changed");
    Ok(Json(user))
}

pub async fn export_roster(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Response> {
    let today = state.today();
    let rows = User::list_all(&state.db, &query.filter()).await?;
    let doc = templates::user_roster(state.organisation(), &rows, today);

    tracing::info!(total = rows.len(), "User roster exported");
    report_response(&doc, query.format, &format!("daftar-umat-{}", today))
}

pub async fn export_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<FormatQuery>,
) -> ApiResult<Response> {
    let user = User::find_with_community(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    let doc = templates::user_card(state.organisation(), &user, state.today());
    report_response(&doc, query.format, &format!("data-umat-{}", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_query_treats_blank_values_as_unset() {
        let query: UserQuery =
            serde_json::from_str(r#"{"community_id": "", "status": " ", "search": "maria"}"#).unwrap();

        let filter = query.filter();
        assert_eq!(filter.community_id, None);
        assert_eq!(filter.status, None);
        assert_eq!(filter.search.as_deref(), Some("maria"));
        assert_eq!(query.format, ReportFormat::Pdf);
    }

    #[test]
    fn test_user_query_status() {
        let query: UserQuery = serde_json::from_str(r#"{"status": "inactive"}"#).unwrap();
        assert_eq!(query.filter().status, Some(UserStatus::Inactive));

        assert!(serde_json::from_str::<UserQuery>(r#"{"status": "banned"}"#).is_err());
    }
}
