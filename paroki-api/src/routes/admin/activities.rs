/// Activity management
///
/// ```text
/// GET    /admin/activities?page=
/// POST   /admin/activities          multipart
/// PUT    /admin/activities/{id}     multipart
/// DELETE /admin/activities/{id}
/// ```
///
/// Form fields: `name`, `description`, `date` (YYYY-MM-DD), `start_time`
/// (HH:MM), `location`, `image`, `remove_image`.

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
    Json,
};
use paroki_shared::{
    models::activity::{Activity, ActivityInput},
    pagination::{PageRequest, Paginated},
    storage::ACTIVITIES_DIR,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Validate)]
struct ActivityFields {
    #[validate(length(min = 1, max = 255, message = "Nama kegiatan wajib diisi"))]
    name: String,

    #[validate(length(min = 1, message = "Deskripsi wajib diisi"))]
    description: String,

    #[validate(length(max = 255, message = "Lokasi maksimal 255 karakter"))]
    location: Option<String>,
}

/// Validated form with the image part still unsaved
struct ActivityForm {
    input: ActivityInput,
    image: ImageChange,
}

async fn read_form(state: &AppState, multipart: Multipart) -> ApiResult<ActivityForm> {
    let mut form = MultipartForm::read(multipart).await?;
    let mut errors = Vec::new();

    let fields = ActivityFields {
        name: form.string("name"),
        description: form.string("description"),
        location: form.optional("location"),
    };
    extend_with(&mut errors, fields.validate());

    let date = form.date("date", true, &mut errors);
    let start_time = form.time("start_time", &mut errors);
    let image = ImageChange::from_form(&mut form, state.config.storage.max_image_bytes, &mut errors);

    ensure_valid(errors)?;

    match (date, start_time) {
        (Some(date), Some(start_time)) => Ok(ActivityForm {
            input: ActivityInput {
                name: fields.name,
                description: fields.description,
                date,
                start_time,
                location: fields.location,
                image_path: None,
            },
            image,
        }),
        _ => Err(ApiError::validation("date", "Tanggal dan jam wajib diisi")),
    }
}

#[derive(Debug, Serialize)]
pub struct IndexProps {
    pub activities: Paginated<WithImage<Activity>>,
}

pub async fn index(
    State(state): State<AppState>,
    inertia: Inertia,
    Query(query): Query<ListQuery>,
) -> ApiResult<Page<IndexProps>> {
    let request = PageRequest::new(query.page, PER_PAGE);

    let rows = Activity::list_all(&state.db, request.limit(), request.offset()).await?;
    let total = Activity::count_all(&state.db).await?;
    let cards = with_images(&state, rows, |a: &Activity| a.image_path.as_deref()).await;

    Ok(inertia.render(
        "Admin/Activities/Index",
        IndexProps {
            activities: Paginated::new(cards, request, total),
        },
    ))
}

pub async fn store(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Activity>)> {
    let ActivityForm { mut input, image } = read_form(&state, multipart).await?;
    input.image_path = image.apply(&state, ACTIVITIES_DIR, None).await?;
    let image_path = input.image_path.clone();

    match Activity::create(&state.db, input).await {
        Ok(activity) => {
            tracing::info!(activity_id = %activity.id, date = %activity.date, "Activity created");
            Ok((StatusCode::CREATED, Json(activity)))
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
) -> ApiResult<Json<Activity>> {
    let existing = Activity::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Activity"))?;

    let ActivityForm { mut input, image } = read_form(&state, multipart).await?;
    input.image_path = image
        .apply(&state, ACTIVITIES_DIR, existing.image_path.as_deref())
        .await?;
    let image_path = input.image_path.clone();

    let activity = match Activity::update(&state.db, id, input).await {
        Ok(Some(activity)) => activity,
        Ok(None) => {
            discard_replaced(&state, image_path.as_deref(), existing.image_path.as_deref()).await;
            return Err(ApiError::not_found("Activity"));
        }
        Err(e) => {
            discard_replaced(&state, image_path.as_deref(), existing.image_path.as_deref()).await;
            return Err(e.into());
        }
    };

    discard_replaced(&state, existing.image_path.as_deref(), activity.image_path.as_deref()).await;
    tracing::info!(activity_id = %id, "Activity updated");

    Ok(Json(activity))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    let activity = Activity::delete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Activity"))?;

    discard_image(&state, activity.image_path.as_deref()).await;
    tracing::info!(activity_id = %id, "Activity deleted");

    Ok(StatusCode::NO_CONTENT)
}
