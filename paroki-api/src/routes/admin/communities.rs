/// Community management
///
/// ```text
/// GET    /admin/communities
/// POST   /admin/communities
/// PUT    /admin/communities/{id}
/// DELETE /admin/communities/{id}
/// ```
///
/// A community that still has members cannot be deleted (409).

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    forms::blank_to_none,
    view::{Inertia, Page},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use paroki_shared::models::community::{Community, CommunityInput, CommunitySummary};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CommunityRequest {
    #[validate(length(min = 1, max = 255, message = "Nama lingkungan wajib diisi"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Deskripsi maksimal 1000 karakter"))]
    pub description: Option<String>,
}

impl CommunityRequest {
    fn into_input(self) -> CommunityInput {
        CommunityInput {
            name: self.name.trim().to_string(),
            description: blank_to_none(self.description),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndexProps {
    pub communities: Vec<CommunitySummary>,
}

pub async fn index(State(state): State<AppState>, inertia: Inertia) -> ApiResult<Page<IndexProps>> {
    let communities = Community::list_with_member_counts(&state.db).await?;
    Ok(inertia.render("Admin/Communities/Index", IndexProps { communities }))
}

pub async fn store(
    State(state): State<AppState>,
    Json(req): Json<CommunityRequest>,
) -> ApiResult<(StatusCode, Json<Community>)> {
    req.validate()?;
    let community = Community::create(&state.db, req.into_input()).await?;

    tracing::info!(community_id = %community.id, "Community created");
    Ok((StatusCode::CREATED, Json(community)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CommunityRequest>,
) -> ApiResult<Json<Community>> {
    req.validate()?;
    let community = Community::update(&state.db, id, req.into_input())
        .await?
        .ok_or_else(|| ApiError::not_found("Community"))?;

    tracing::info!(community_id = %id, "Community updated");
    Ok(Json(community))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if !Community::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Community"));
    }

    tracing::info!(community_id = %id, "Community deleted");
    Ok(StatusCode::NO_CONTENT)
}
