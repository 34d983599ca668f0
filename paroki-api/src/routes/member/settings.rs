/// Member profile and password settings
///
/// # Endpoints
///
/// ```text
/// GET /member/settings/profile
/// PUT /member/settings/profile
/// PUT /member/settings/password
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    forms::{blank_to_none, ensure_valid, push_error},
    view::{Inertia, Page},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::NaiveDate;
use paroki_shared::{
    auth::{middleware::AuthContext, password},
    models::{
        community::{Community, CommunityRef},
        user::{Gender, UpdateProfile, User, UserWithCommunity},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Editable profile fields, shared with the admin user form
#[derive(Debug, Deserialize, Validate)]
pub struct ProfileRequest {
    #[validate(length(min = 1, max = 255, message = "Nama wajib diisi"))]
    pub name: String,

    #[validate(email(message = "Format email tidak valid"))]
    pub email: String,

    #[validate(length(max = 500, message = "Alamat maksimal 500 karakter"))]
    pub address: Option<String>,

    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,

    #[validate(length(max = 20, message = "Nomor telepon maksimal 20 karakter"))]
    pub phone: Option<String>,
}

impl ProfileRequest {
    pub fn into_update(self) -> UpdateProfile {
        UpdateProfile {
            name: self.name.trim().to_string(),
            email: self.email,
            address: blank_to_none(self.address),
            birth_date: self.birth_date,
            gender: self.gender,
            phone: blank_to_none(self.phone),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    pub current_password: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileProps {
    pub user: UserWithCommunity,
    pub communities: Vec<CommunityRef>,
}

/// Rejects an email already held by another account
pub async fn ensure_email_available(
    state: &AppState,
    email: &str,
    owner: uuid::Uuid,
) -> ApiResult<()> {
    match User::find_by_email(&state.db, email).await? {
        Some(existing) if existing.id != owner => {
            Err(ApiError::validation("email", "Email sudah digunakan"))
        }
        _ => Ok(()),
    }
}

pub async fn show_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    inertia: Inertia,
) -> ApiResult<Page<ProfileProps>> {
    let user = User::find_with_community(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    let communities = Community::list_all(&state.db).await?;

    Ok(inertia.render("Settings/Profile", ProfileProps { user, communities }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ProfileRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;
    ensure_email_available(&state, &req.email, auth.user_id).await?;

    let user = User::update_profile(&state.db, auth.user_id, req.into_update())
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    tracing::info!(user_id = %user.id, "Profile updated");
    Ok(Json(user))
}

pub async fn update_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<PasswordRequest>,
) -> ApiResult<StatusCode> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    let mut errors = Vec::new();
    if !password::verify_password_async(req.current_password.clone(), user.password_hash.clone()).await? {
        push_error(&mut errors, "current_password", "Password saat ini salah");
    }
    if let Err(message) = password::validate_password_strength(&req.password) {
        push_error(&mut errors, "password", message);
    }
    if req.password != req.password_confirmation {
        push_error(&mut errors, "password_confirmation", "Konfirmasi password tidak cocok");
    }
    ensure_valid(errors)?;

    let password_hash = password::hash_password_async(req.password.clone()).await?;
    User::update_password(&state.db, user.id, &password_hash).await?;

    tracing::info!(user_id = %user.id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}
