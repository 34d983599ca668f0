/// Announcement management
///
/// # Endpoints
///
/// ```text
/// GET    /admin/announcements?page=&search=
/// POST   /admin/announcements                  multipart
/// GET    /admin/announcements/{id}
/// PUT    /admin/announcements/{id}             multipart
/// DELETE /admin/announcements/{id}
/// PATCH  /admin/announcements/{id}/publish
/// ```
///
/// Form fields: `title`, `description`, `content` (rich text, stored as
/// sent), `is_published`, `image`, `remove_image`.

use super::{discard_image, discard_replaced, ImageChange, ListQuery, PER_PAGE};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    forms::{ensure_valid, extend_with, MultipartForm},
    view::{with_images, Inertia, Page, WithImage},
};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use paroki_shared::{
    auth::middleware::AuthContext,
    models::announcement::{Announcement, AnnouncementInput},
    pagination::{PageRequest, Paginated},
    storage::ANNOUNCEMENTS_DIR,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Validate)]
struct AnnouncementFields {
    #[validate(length(min = 1, max = 255, message = "Judul wajib diisi"))]
    title: String,

    #[validate(length(min = 1, max = 1000, message = "Deskripsi wajib diisi (maksimal 1000 karakter)"))]
    description: String,

    content: Option<String>,
    is_published: bool,
}

struct AnnouncementForm {
    fields: AnnouncementFields,
    image: ImageChange,
}

async fn read_form(state: &AppState, multipart: Multipart) -> ApiResult<AnnouncementForm> {
    let mut form = MultipartForm::read(multipart).await?;
    let mut errors = Vec::new();

    let fields = AnnouncementFields {
        title: form.string("title"),
        description: form.string("description"),
        content: form.optional("content"),
        is_published: form.flag("is_published"),
    };
    extend_with(&mut errors, fields.validate());

    let image = ImageChange::from_form(&mut form, state.config.storage.max_image_bytes, &mut errors);
    ensure_valid(errors)?;

    Ok(AnnouncementForm { fields, image })
}

#[derive(Debug, Serialize)]
pub struct IndexProps {
    pub announcements: Paginated<WithImage<Announcement>>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShowProps {
    pub announcement: WithImage<Announcement>,
}

pub async fn index(
    State(state): State<AppState>,
    inertia: Inertia,
    Query(query): Query<ListQuery>,
) -> ApiResult<Page<IndexProps>> {
    let request = PageRequest::new(query.page, PER_PAGE);
    let search = query.search();

    let rows = Announcement::list_all(&state.db, search, request.limit(), request.offset()).await?;
    let total = Announcement::count_all(&state.db, search).await?;
    let cards = with_images(&state, rows, |a: &Announcement| a.image_path.as_deref()).await;

    Ok(inertia.render(
        "Admin/Announcements/Index",
        IndexProps {
            announcements: Paginated::new(cards, request, total),
            search: search.map(str::to_string),
        },
    ))
}

pub async fn show(
    State(state): State<AppState>,
    inertia: Inertia,
    Path(id): Path<Uuid>,
) -> ApiResult<Page<ShowProps>> {
    let announcement = Announcement::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Announcement"))?;
    let image_url = state.image_url(announcement.image_path.as_deref()).await;

    Ok(inertia.render(
        "Admin/Announcements/Show",
        ShowProps {
            announcement: WithImage {
                item: announcement,
                image_url,
            },
        },
    ))
}

pub async fn store(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Announcement>)> {
    let form = read_form(&state, multipart).await?;
    let image_path = form.image.apply(&state, ANNOUNCEMENTS_DIR, None).await?;

    let created = Announcement::create(
        &state.db,
        auth.user_id,
        AnnouncementInput {
            title: form.fields.title,
            description: form.fields.description,
            content: form.fields.content,
            image_path: image_path.clone(),
            is_published: form.fields.is_published,
        },
    )
    .await;

    match created {
        Ok(announcement) => {
            tracing::info!(announcement_id = %announcement.id, published = announcement.is_published, "Announcement created");
            Ok((StatusCode::CREATED, Json(announcement)))
        }
        Err(e) => {
            discard_image(&state, image_path.as_deref()).await;
            Err(e.into())
        }
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Json<Announcement>> {
    let existing = Announcement::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Announcement"))?;

    let form = read_form(&state, multipart).await?;
    let image_path = form
        .image
        .apply(&state, ANNOUNCEMENTS_DIR, existing.image_path.as_deref())
        .await?;

    let updated = Announcement::update(
        &state.db,
        id,
        AnnouncementInput {
            title: form.fields.title,
            description: form.fields.description,
            content: form.fields.content,
            image_path: image_path.clone(),
            is_published: form.fields.is_published,
        },
    )
    .await;

    let announcement = match updated {
        Ok(Some(announcement)) => announcement,
        Ok(None) => {
            discard_replaced(&state, image_path.as_deref(), existing.image_path.as_deref()).await;
            return Err(ApiError::not_found("Announcement"));
        }
        Err(e) => {
            discard_replaced(&state, image_path.as_deref(), existing.image_path.as_deref()).await;
            return Err(e.into());
        }
    };

    discard_replaced(&state, existing.image_path.as_deref(), announcement.image_path.as_deref()).await;
    tracing::info!(announcement_id = %id, "Announcement updated");

    Ok(Json(announcement))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    let announcement = Announcement::delete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Announcement"))?;

    discard_image(&state, announcement.image_path.as_deref()).await;
    tracing::info!(announcement_id = %id, "Announcement deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Optional explicit state; the current state is flipped when omitted
#[derive(Debug, Default, Deserialize)]
pub struct PublishRequest {
    pub is_published: Option<bool>,
}

pub async fn toggle_publish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<PublishRequest>>,
) -> ApiResult<Json<Announcement>> {
    let existing = Announcement::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Announcement"))?;

    let requested = body.and_then(|Json(req)| req.is_published);
    let is_published = requested.unwrap_or(!existing.is_published);

    let announcement = Announcement::set_published(&state.db, id, is_published)
        .await?
        .ok_or_else(|| ApiError::not_found("Announcement"))?;

    tracing::info!(announcement_id = %id, published = is_published, "Announcement publish state changed");
    Ok(Json(announcement))
}
