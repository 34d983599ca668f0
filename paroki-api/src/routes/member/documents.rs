/// Member documents: four PDF slots per account
///
/// # Endpoints
///
/// ```text
/// GET    /member/documents                 slot overview
/// POST   /member/documents                 multipart: pdf_0..pdf_3, remove_0..remove_3
/// GET    /member/documents/{id}/view       inline PDF
/// GET    /member/documents/{id}/download   attachment
/// DELETE /member/documents/{id}
/// ```
///
/// Uploading into an occupied slot replaces it: the old file and record are
/// removed before the new file is written. The two steps are not atomic.
///
/// # Errors
///
/// - `403 Forbidden`: The document belongs to another member
/// - `404 Not Found`: No such document
/// - `422 Unprocessable Entity`: Invalid file, unknown field or slot index >= 4

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    forms::{display_file_name, plan_document_slots, MultipartForm, UploadedFile},
    view::{Inertia, Page},
};
use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use paroki_shared::{
    auth::{authorization::require_owner, middleware::AuthContext},
    models::user_pdf::{checksum, CreateUserPdf, UserPdf, MAX_SLOTS},
    storage::user_pdf_dir,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct SlotView {
    pub slot: i16,
    pub document: Option<UserPdf>,
}

#[derive(Debug, Serialize)]
pub struct IndexProps {
    pub slots: Vec<SlotView>,
    pub max_documents: usize,
    pub max_file_bytes: usize,
}

/// Lays stored documents out over the fixed slot set
pub fn slot_views(documents: Vec<UserPdf>) -> Vec<SlotView> {
    let mut slots: Vec<SlotView> = (0..MAX_SLOTS as i16)
        .map(|slot| SlotView {
            slot,
            document: None,
        })
        .collect();

    for document in documents {
        if let Some(view) = slots.iter_mut().find(|v| v.slot == document.slot) {
            view.document = Some(document);
        }
    }

    slots
}

pub async fn index(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    inertia: Inertia,
) -> ApiResult<Page<IndexProps>> {
    let documents = UserPdf::list_by_user(&state.db, auth.user_id).await?;

    Ok(inertia.render(
        "Member/Documents/Index",
        IndexProps {
            slots: slot_views(documents),
            max_documents: MAX_SLOTS,
            max_file_bytes: state.config.storage.max_pdf_bytes,
        },
    ))
}

/// Applies the slot form and returns the member's documents afterwards
pub async fn upload(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    multipart: Multipart,
) -> ApiResult<Json<Vec<UserPdf>>> {
    let form = MultipartForm::read(multipart).await?;
    let changes = plan_document_slots(form, state.config.storage.max_pdf_bytes)?;

    for change in changes {
        if change.remove {
            clear_slot(&state, auth.user_id, change.slot).await?;
        }

        if let Some(file) = change.upload {
            clear_slot(&state, auth.user_id, change.slot).await?;
            store_in_slot(&state, auth.user_id, change.slot, file).await?;
        }
    }

    Ok(Json(UserPdf::list_by_user(&state.db, auth.user_id).await?))
}

async fn clear_slot(state: &AppState, user_id: Uuid, slot: i16) -> ApiResult<()> {
    if let Some(old) = UserPdf::delete_by_user_slot(&state.db, user_id, slot).await? {
        remove_file(state, &old.file_path).await;
        tracing::info!(user_id = %user_id, slot, "Document removed");
    }
    Ok(())
}

async fn store_in_slot(
    state: &AppState,
    user_id: Uuid,
    slot: i16,
    file: UploadedFile,
) -> ApiResult<()> {
    let file_path = state
        .storage
        .put(&user_pdf_dir(user_id), "pdf", &file.bytes)
        .await?;

    let record = UserPdf::create(
        &state.db,
        CreateUserPdf {
            user_id,
            slot,
            file_path: file_path.clone(),
            file_name: display_file_name(&file.file_name, "dokumen.pdf"),
            file_size: file.bytes.len() as i64,
            checksum: checksum(&file.bytes),
        },
    )
    .await;

    match record {
        Ok(record) => {
            tracing::info!(user_id = %user_id, slot, document_id = %record.id, "Document stored");
            Ok(())
        }
        Err(e) => {
            remove_file(state, &file_path).await;
            Err(e.into())
        }
    }
}

/// Best-effort file removal; a leftover file is logged, not fatal
async fn remove_file(state: &AppState, path: &str) {
    if let Err(e) = state.storage.delete(path).await {
        tracing::warn!(path, error = %e, "Failed to delete stored file");
    }
}

/// Loads a document the caller owns
async fn owned_document(state: &AppState, auth: &AuthContext, id: Uuid) -> ApiResult<UserPdf> {
    let document = UserPdf::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Document"))?;

    require_owner(auth, document.user_id).map_err(|e| {
        tracing::warn!(user_id = %auth.user_id, document_id = %id, "Document access refused");
        ApiError::from(e)
    })?;

    Ok(document)
}

/// `Content-Disposition` value with a quote-safe ASCII file name
pub fn content_disposition(disposition: &str, file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("{}; filename=\"{}\"", disposition, safe)
}

async fn pdf_response(state: &AppState, document: &UserPdf, disposition: &str) -> ApiResult<Response> {
    let bytes = state.storage.read(&document.file_path).await?;

    let disposition = HeaderValue::from_str(&content_disposition(disposition, &document.file_name))
        .map_err(|e| ApiError::InternalError(format!("Invalid header value: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

pub async fn view(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let document = owned_document(&state, &auth, id).await?;
    pdf_response(&state, &document, "inline").await
}

pub async fn download(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let document = owned_document(&state, &auth, id).await?;
    pdf_response(&state, &document, "attachment").await
}

pub async fn destroy(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let document = owned_document(&state, &auth, id).await?;

    if UserPdf::delete(&state.db, document.id).await? {
        remove_file(&state, &document.file_path).await;
        tracing::info!(user_id = %auth.user_id, slot = document.slot, "Document deleted");
    }

    Ok(StatusCode::NO_CONTENT)
}
