/// Worship schedule management
///
/// ```text
/// GET    /admin/worship-schedules?filter=&page=
/// POST   /admin/worship-schedules           JSON
/// PUT    /admin/worship-schedules/{id}      JSON
/// DELETE /admin/worship-schedules/{id}
/// GET    /admin/worship-schedules/export?range=&start=&end=&format=
/// ```
///
/// # Request
///
/// ```json
/// {
///   "name": "Misa Minggu Pagi",
///   "date": "2025-03-09",
///   "start_time": "07:00",
///   "person_in_charge": "Lingkungan St. Yosef",
///   "community_ids": ["uuid", "uuid"]
/// }
/// ```

use super::reports::{period_file_stem, report_response, ReportQuery};
use super::PER_PAGE;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    forms::{ensure_valid, extend_with, parse_time, push_error},
    routes::public::ScheduleQuery,
    view::{Inertia, Page},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::NaiveDate;
use paroki_shared::{
    calendar::ScheduleFilter,
    models::{
        community::{Community, CommunityRef},
        worship_schedule::{WorshipSchedule, WorshipScheduleInput, WorshipScheduleWithCommunities},
    },
    pagination::{PageRequest, Paginated},
    report::templates,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct WorshipScheduleRequest {
    #[validate(length(min = 1, max = 255, message = "Nama ibadah wajib diisi"))]
    pub name: String,

    pub date: NaiveDate,

    /// `HH:MM` or `HH:MM:SS`
    pub start_time: String,

    #[validate(length(min = 1, max = 255, message = "Petugas wajib diisi"))]
    pub person_in_charge: String,

    #[validate(length(min = 1, message = "Pilih minimal satu lingkungan"))]
    pub community_ids: Vec<Uuid>,
}

impl WorshipScheduleRequest {
    async fn into_input(self, state: &AppState) -> ApiResult<WorshipScheduleInput> {
        let mut errors = Vec::new();
        extend_with(&mut errors, self.validate());

        let start_time = parse_time(self.start_time.trim());
        if start_time.is_none() {
            push_error(&mut errors, "start_time", "Format jam tidak valid");
        }

        let mut community_ids = self.community_ids;
        community_ids.sort();
        community_ids.dedup();

        if !community_ids.is_empty() {
            let found = Community::count_existing(&state.db, &community_ids).await?;
            if found != community_ids.len() as i64 {
                push_error(&mut errors, "community_ids", "Lingkungan tidak ditemukan");
            }
        }

        ensure_valid(errors)?;

        let start_time =
            start_time.ok_or_else(|| ApiError::validation("start_time", "Format jam tidak valid"))?;

        Ok(WorshipScheduleInput {
            name: self.name.trim().to_string(),
            date: self.date,
            start_time,
            person_in_charge: self.person_in_charge.trim().to_string(),
            community_ids,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct IndexProps {
    pub schedules: Paginated<WorshipScheduleWithCommunities>,
    pub filter: ScheduleFilter,
    pub communities: Vec<CommunityRef>,
}

pub async fn index(
    State(state): State<AppState>,
    inertia: Inertia,
    Query(query): Query<ScheduleQuery>,
) -> ApiResult<Page<IndexProps>> {
    let today = state.today();
    let request = PageRequest::new(query.page, PER_PAGE);

    let rows = WorshipSchedule::list_by_filter(
        &state.db,
        query.filter,
        today,
        request.limit(),
        request.offset(),
    )
    .await?;
    let total = WorshipSchedule::count_by_filter(&state.db, query.filter, today).await?;

    Ok(inertia.render(
        "Admin/WorshipSchedules/Index",
        IndexProps {
            schedules: Paginated::new(rows, request, total),
            filter: query.filter,
            communities: Community::list_all(&state.db).await?,
        },
    ))
}

pub async fn store(
    State(state): State<AppState>,
    Json(req): Json<WorshipScheduleRequest>,
) -> ApiResult<(StatusCode, Json<WorshipScheduleWithCommunities>)> {
    let input = req.into_input(&state).await?;
    let schedule = WorshipSchedule::create(&state.db, input).await?;

    tracing::info!(
        schedule_id = %schedule.schedule.id,
        communities = schedule.communities.len(),
        "Worship schedule created"
    );

    Ok((StatusCode::CREATED, Json(schedule)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<WorshipScheduleRequest>,
) -> ApiResult<Json<WorshipScheduleWithCommunities>> {
    let input = req.into_input(&state).await?;
    let schedule = WorshipSchedule::update(&state.db, id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Worship schedule"))?;

    tracing::info!(schedule_id = %id, "Worship schedule updated");
    Ok(Json(schedule))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if !WorshipSchedule::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Worship schedule"));
    }

    tracing::info!(schedule_id = %id, "Worship schedule deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn export(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Response> {
    let today = state.today();
    let range = query.resolve(today)?;

    let rows = WorshipSchedule::list_in_range(&state.db, range).await?;
    let doc = templates::worship_schedule_listing(state.organisation(), query.range, range, &rows, today);

    tracing::info!(start = %range.start, end = %range.end, total = rows.len(), "Worship schedules exported");

    report_response(&doc, query.format, &period_file_stem("jadwal-ibadah", range))
}
