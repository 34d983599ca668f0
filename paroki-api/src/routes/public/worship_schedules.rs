/// Worship schedule listing
///
/// ```text
/// GET /worship-schedules?filter=upcoming|archive&page=
/// ```
///
/// Same filter semantics as activities. Each row carries its communities,
/// loaded in one query for the whole page.

use super::{ScheduleQuery, SCHEDULES_PER_PAGE};
use crate::{
    app::AppState,
    error::ApiResult,
    view::{Inertia, Page},
};
use axum::extract::{Query, State};
use paroki_shared::{
    calendar::ScheduleFilter,
    models::worship_schedule::{WorshipSchedule, WorshipScheduleWithCommunities},
    pagination::{PageRequest, Paginated},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct IndexProps {
    pub schedules: Paginated<WorshipScheduleWithCommunities>,
    pub filter: ScheduleFilter,
}

pub async fn index(
    State(state): State<AppState>,
    inertia: Inertia,
    Query(query): Query<ScheduleQuery>,
) -> ApiResult<Page<IndexProps>> {
    let today = state.today();
    let request = PageRequest::new(query.page, SCHEDULES_PER_PAGE);

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
        "Public/WorshipSchedules/Index",
        IndexProps {
            schedules: Paginated::new(rows, request, total),
            filter: query.filter,
        },
    ))
}
