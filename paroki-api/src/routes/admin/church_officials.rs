/// Church official management
///
/// ```text
/// GET    /admin/church-officials?page=
/// POST   /admin/church-officials          multipart
/// PUT    /admin/church-officials/{id}     multipart
/// DELETE /admin/church-officials/{id}
/// ```
///
/// Form fields: `name`, `position`, `tenure_start`, `tenure_end`,
/// `is_active`, `community_id`, `department`, `image`, `remove_image`.

use super::{discard_image, discard_replaced, ImageChange, ListQuery, PER_PAGE};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    forms::{ensure_valid, extend_with, push_error, MultipartForm},
    view::{with_images, Inertia, Page, WithImage},
};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use paroki_shared::{
    models::{
        church_official::{ChurchOfficial, ChurchOfficialInput, OfficialPosition},
        community::{Community, CommunityRef},
    },
    pagination::{PageRequest, Paginated},
    storage::CHURCH_OFFICIALS_DIR,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Validate)]
struct OfficialFields {
    #[validate(length(min = 1, max = 255, message = "Nama wajib diisi"))]
    name: String,

    #[validate(length(max = 255, message = "Seksi maksimal 255 karakter"))]
    department: Option<String>,
}

struct OfficialForm {
    input: ChurchOfficialInput,
    image: ImageChange,
}

async fn read_form(state: &AppState, multipart: Multipart) -> ApiResult<OfficialForm> {
    let mut form = MultipartForm::read(multipart).await?;
    let mut errors = Vec::new();

    let fields = OfficialFields {
        name: form.string("name"),
        department: form.optional("department"),
    };
    extend_with(&mut errors, fields.validate());

    let position = match form.optional("position") {
        Some(value) => match value.parse::<OfficialPosition>() {
            Ok(position) => Some(position),
            Err(_) => {
                push_error(&mut errors, "position", "Jabatan tidak valid");
                None
            }
        },
        None => {
            push_error(&mut errors, "position", "Jabatan wajib diisi");
            None
        }
    };

    let tenure_start = form.date("tenure_start", true, &mut errors);
    let tenure_end = form.date("tenure_end", false, &mut errors);
    if let (Some(start), Some(end)) = (tenure_start, tenure_end) {
        if end < start {
            push_error(&mut errors, "tenure_end", "Akhir masa jabatan harus setelah awal masa jabatan");
        }
    }

    let community_id = match form.optional("community_id").map(|v| v.parse::<Uuid>()) {
        Some(Ok(id)) => {
            let found = Community::find_by_id(&state.db, id).await?.is_some();
            if !found {
                push_error(&mut errors, "community_id", "Lingkungan tidak ditemukan");
            }
            found.then_some(id)
        }
        Some(Err(_)) => {
            push_error(&mut errors, "community_id", "Lingkungan tidak ditemukan");
            None
        }
        None => None,
    };

    let is_active = form.flag("is_active");
    let image = ImageChange::from_form(&mut form, state.config.storage.max_image_bytes, &mut errors);

    ensure_valid(errors)?;

    match (position, tenure_start) {
        (Some(position), Some(tenure_start)) => Ok(OfficialForm {
            input: ChurchOfficialInput {
                name: fields.name,
                position,
                tenure_start,
                tenure_end,
                is_active,
                community_id,
                department: fields.department,
                image_path: None,
            },
            image,
        }),
        _ => Err(ApiError::validation("position", "Jabatan dan masa jabatan wajib diisi")),
    }
}

#[derive(Debug, Serialize)]
pub struct PositionOption {
    pub value: OfficialPosition,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IndexProps {
    pub officials: Paginated<WithImage<ChurchOfficial>>,
    pub positions: Vec<PositionOption>,
    pub communities: Vec<CommunityRef>,
}

pub async fn index(
    State(state): State<AppState>,
    inertia: Inertia,
    Query(query): Query<ListQuery>,
) -> ApiResult<Page<IndexProps>> {
    let request = PageRequest::new(query.page, PER_PAGE);

    let rows = ChurchOfficial::list_all(&state.db, request.limit(), request.offset()).await?;
    let total = ChurchOfficial::count(&state.db).await?;
    let cards = with_images(&state, rows, |o: &ChurchOfficial| o.image_path.as_deref()).await;

    let positions = OfficialPosition::ALL
        .into_iter()
        .map(|value| PositionOption {
            value,
            label: value.label(),
        })
        .collect();

    Ok(inertia.render(
        "Admin/ChurchOfficials/Index",
        IndexProps {
            officials: Paginated::new(cards, request, total),
            positions,
            communities: Community::list_all(&state.db).await?,
        },
    ))
}

pub async fn store(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ChurchOfficial>)> {
    let OfficialForm { mut input, image } = read_form(&state, multipart).await?;
    input.image_path = image.apply(&state, CHURCH_OFFICIALS_DIR, None).await?;
    let image_path = input.image_path.clone();

    match ChurchOfficial::create(&state.db, input).await {
        Ok(official) => {
            tracing::info!(official_id = %official.id, position = %official.position, "Church official created");
            Ok((StatusCode::CREATED, Json(official)))
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
) -> ApiResult<Json<ChurchOfficial>> {
    let existing = ChurchOfficial::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Church official"))?;

    let OfficialForm { mut input, image } = read_form(&state, multipart).await?;
    input.image_path = image
        .apply(&state, CHURCH_OFFICIALS_DIR, existing.image_path.as_deref())
        .await?;
    let image_path = input.image_path.clone();

    let official = match ChurchOfficial::update(&state.db, id, input).await {
        Ok(Some(official)) => official,
        Ok(None) => {
            discard_replaced(&state, image_path.as_deref(), existing.image_path.as_deref()).await;
            return Err(ApiError::not_found("Church official"));
        }
        Err(e) => {
            discard_replaced(&state, image_path.as_deref(), existing.image_path.as_deref()).await;
            return Err(e.into());
        }
    };

    discard_replaced(&state, existing.image_path.as_deref(), official.image_path.as_deref()).await;
    tracing::info!(official_id = %id, "Church official updated");

    Ok(Json(official))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    let official = ChurchOfficial::delete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Church official"))?;

    discard_image(&state, official.image_path.as_deref()).await;
    tracing::info!(official_id = %id, "Church official deleted");

    Ok(StatusCode::NO_CONTENT)
}
