/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Register a parish member
/// - `POST /auth/login` - Login and get tokens
/// - `POST /auth/refresh` - Exchange a refresh token for new tokens

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    forms::{ensure_valid, extend_with, push_error},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use paroki_shared::{
    auth::{jwt, password},
    models::{
        community::Community,
        user::{CreateUser, Gender, Role, User},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "Nama wajib diisi"))]
    pub name: String,

    #[validate(email(message = "Format email tidak valid"))]
    pub email: String,

    /// Checked for strength separately
    pub password: String,

    pub password_confirmation: String,

    pub community_id: Uuid,

    #[validate(length(max = 500, message = "Alamat maksimal 500 karakter"))]
    pub address: Option<String>,

    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,

    #[validate(length(max = 20, message = "Nomor telepon maksimal 20 karakter"))]
    pub phone: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Format email tidak valid"))]
    pub email: String,

    pub password: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Tokens plus the signed-in account
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,

    #[serde(flatten)]
    pub tokens: jwt::TokenPair,
}

/// Register a new member account
///
/// New accounts always get the `umat` role in the chosen community.
///
/// # Errors
///
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed or unknown community
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let mut errors = Vec::new();
    extend_with(&mut errors, req.validate());

    if let Err(message) = password::validate_password_strength(&req.password) {
        push_error(&mut errors, "password", message);
    }
    if req.password != req.password_confirmation {
        push_error(&mut errors, "password_confirmation", "Konfirmasi password tidak cocok");
    }
    if Community::find_by_id(&state.db, req.community_id).await?.is_none() {
        push_error(&mut errors, "community_id", "Lingkungan tidak ditemukan");
    }
    ensure_valid(errors)?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let password_hash = password::hash_password_async(req.password.clone()).await?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name.trim().to_string(),
            email: req.email,
            password_hash,
            role: Role::Umat,
            community_id: req.community_id,
            address: req.address,
            birth_date: req.birth_date,
            gender: req.gender,
            phone: req.phone,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, community_id = %user.community_id, "Member registered");

    let tokens = jwt::issue_token_pair(user.id, user.role, state.jwt_secret())?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user, tokens })))
}

/// Login endpoint
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
/// - `403 Forbidden`: Account is inactive
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !password::verify_password_async(req.password.clone(), user.password_hash.clone()).await? {
        tracing::info!(user_id = %user.id, "Login failed: wrong password");
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if !user.is_active() {
        tracing::info!(user_id = %user.id, "Login refused: account inactive");
        return Err(ApiError::Forbidden);
    }

    User::update_last_login(&state.db, user.id).await?;

    let tokens = jwt::issue_token_pair(user.id, user.role, state.jwt_secret())?;

    Ok(Json(AuthResponse { user, tokens }))
}

/// Token refresh endpoint
///
/// The account is reloaded so role changes and deactivation apply at refresh.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired refresh token, or unknown account
/// - `403 Forbidden`: Account is inactive
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<jwt::TokenPair>> {
    let claims = jwt::validate_refresh_token(&req.refresh_token, state.jwt_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown account".to_string()))?;

    if !user.is_active() {
        return Err(ApiError::Forbidden);
    }

    let tokens = jwt::issue_token_pair(user.id, user.role, state.jwt_secret())?;

    Ok(Json(tokens))
}
