/// Visitor feedback
///
/// # Endpoint
///
/// ```text
/// POST /feedback
/// Content-Type: application/json
///
/// {"name": "Maria", "message": "Terima kasih atas pelayanannya"}
/// ```
///
/// Responds `201 Created` with the stored entry.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Json};
use paroki_shared::models::feedback::Feedback;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct FeedbackRequest {
    #[validate(length(min = 1, max = 255, message = "Nama wajib diisi"))]
    pub name: String,

    #[validate(length(min = 1, max = 5000, message = "Pesan wajib diisi (maksimal 5000 karakter)"))]
    pub message: String,
}

pub async fn submit(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> ApiResult<(StatusCode, Json<Feedback>)> {
    let req = FeedbackRequest {
        name: req.name.trim().to_string(),
        message: req.message.trim().to_string(),
    };
    req.validate()?;

    let feedback = Feedback::create(&state.db, &req.name, &req.message).await?;
    tracing::info!(feedback_id = %feedback.id, "Feedback received");

    Ok((StatusCode::CREATED, Json(feedback)))
}
