/// Feedback inbox
///
/// ```text
/// GET    /admin/feedback?page=
/// PATCH  /admin/feedback/{id}/read     {"is_read": true}
/// DELETE /admin/feedback/{id}
/// ```

use super::{ListQuery, PER_PAGE};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    view::{Inertia, Page},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use paroki_shared::{
    models::feedback::Feedback,
    pagination::{PageRequest, Paginated},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct IndexProps {
    pub feedback: Paginated<Feedback>,
    pub unread: i64,
}

/// Defaults to marking as read
#[derive(Debug, Deserialize)]
pub struct ReadRequest {
    #[serde(default = "default_read")]
    pub is_read: bool,
}

fn default_read() -> bool {
    true
}

pub async fn index(
    State(state): State<AppState>,
    inertia: Inertia,
    Query(query): Query<ListQuery>,
) -> ApiResult<Page<IndexProps>> {
    let request = PageRequest::new(query.page, PER_PAGE);

    let rows = Feedback::list(&state.db, request.limit(), request.offset()).await?;
    let total = Feedback::count(&state.db).await?;
    let unread = Feedback::count_unread(&state.db).await?;

    Ok(inertia.render(
        "Admin/Feedback/Index",
        IndexProps {
            feedback: Paginated::new(rows, request, total),
            unread,
        },
    ))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<ReadRequest>>,
) -> ApiResult<Json<Feedback>> {
    let is_read = body.map(|Json(req)| req.is_read).unwrap_or(true);

    let feedback = Feedback::set_read(&state.db, id, is_read)
        .await?
        .ok_or_else(|| ApiError::not_found("Feedback"))?;

    Ok(Json(feedback))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if !Feedback::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Feedback"));
    }

    tracing::info!(feedback_id = %id, "Feedback deleted");
    Ok(StatusCode::NO_CONTENT)
}
