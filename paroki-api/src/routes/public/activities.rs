/// Activity listing
///
/// ```text
/// GET /activities?filter=upcoming|archive&page=
/// ```
///
/// `upcoming` shows `date >= today` soonest first, `archive` shows
/// `date < today` most recent first. "Today" is the parish calendar date.

use super::{ScheduleQuery, SCHEDULES_PER_PAGE};
use crate::{
    app::AppState,
    error::ApiResult,
    view::{with_images, Inertia, Page, WithImage},
};
use axum::extract::{Query, State};
use paroki_shared::{
    calendar::ScheduleFilter,
    models::activity::Activity,
    pagination::{PageRequest, Paginated},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct IndexProps {
    pub activities: Paginated<WithImage<Activity>>,
    pub filter: ScheduleFilter,
}

pub async fn index(
    State(state): State<AppState>,
    inertia: Inertia,
    Query(query): Query<ScheduleQuery>,
) -> ApiResult<Page<IndexProps>> {
    let today = state.today();
    let request = PageRequest::new(query.page, SCHEDULES_PER_PAGE);

    let rows = Activity::list_by_filter(
        &state.db,
        query.filter,
        today,
        request.limit(),
        request.offset(),
    )
    .await?;
    let total = Activity::count_by_filter(&state.db, query.filter, today).await?;

    let cards = with_images(&state, rows, |a: &Activity| a.image_path.as_deref()).await;

    Ok(inertia.render(
        "Public/Activities/Index",
        IndexProps {
            activities: Paginated::new(cards, request, total),
            filter: query.filter,
        },
    ))
}
