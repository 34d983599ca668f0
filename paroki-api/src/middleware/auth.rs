/// Authentication layers for the member and admin route groups
///
/// `require_user` authenticates the Bearer token, loads the account and
/// inserts [`AuthContext`] into request extensions. `require_admin` runs after
/// it and rejects anyone who is not an administrator with 403.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware::from_fn_with_state, routing::get, Router};
/// use paroki_api::{app::AppState, middleware::auth::{require_admin, require_user}};
///
/// fn admin_routes(state: AppState) -> Router<AppState> {
///     Router::new()
///         .route("/dashboard", get(|| async { "ok" }))
///         .layer(from_fn_with_state(state.clone(), require_admin))
///         .layer(from_fn_with_state(state, require_user))
/// }
/// ```

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use paroki_shared::auth::{authorization, middleware::{authenticate, AuthContext}};

use crate::{app::AppState, error::ApiError};

pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let auth = authenticate(&state.db, state.jwt_secret(), header_value).await?;
    tracing::debug!(user_id = %auth.user_id, role = auth.role.as_str(), "Authenticated request");

    req.extensions_mut().insert(auth);
    Ok(next.run(req).await)
}

pub async fn require_admin(
    State(_state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = req
        .extensions()
        .get::<AuthContext>()
        .copied()
        .ok_or_else(|| ApiError::Unauthorized("Missing credentials".to_string()))?;

    authorization::require_admin(&auth).map_err(|e| {
        tracing::warn!(user_id = %auth.user_id, "Admin route refused: {}", e);
        ApiError::from(e)
    })?;

    Ok(next.run(req).await)
}
