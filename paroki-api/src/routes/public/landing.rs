/// Landing page
///
/// Latest published announcements, the next activities and worship
/// schedules, and the active officials.

use super::church_officials::{active_officials, OfficialCard};
use crate::{
    app::AppState,
    error::ApiResult,
    view::{with_images, Inertia, Page, WithImage},
};
use axum::extract::State;
use paroki_shared::{
    calendar::ScheduleFilter,
    models::{
        activity::Activity,
        announcement::Announcement,
        worship_schedule::{WorshipSchedule, WorshipScheduleWithCommunities},
    },
};
use serde::Serialize;

const HIGHLIGHTS: i64 = 3;

#[derive(Debug, Serialize)]
pub struct LandingProps {
    pub announcements: Vec<WithImage<Announcement>>,
    pub activities: Vec<WithImage<Activity>>,
    pub worship_schedules: Vec<WorshipScheduleWithCommunities>,
    pub officials: Vec<OfficialCard>,
}

pub async fn landing(State(state): State<AppState>, inertia: Inertia) -> ApiResult<Page<LandingProps>> {
    let today = state.today();

    let announcements = Announcement::list_published(&state.db, HIGHLIGHTS, 0).await?;
    let activities =
        Activity::list_by_filter(&state.db, ScheduleFilter::Upcoming, today, HIGHLIGHTS, 0).await?;
    let worship_schedules =
        WorshipSchedule::list_by_filter(&state.db, ScheduleFilter::Upcoming, today, HIGHLIGHTS, 0)
            .await?;

    let props = LandingProps {
        announcements: with_images(&state, announcements, |a: &Announcement| a.image_path.as_deref())
            .await,
        activities: with_images(&state, activities, |a: &Activity| a.image_path.as_deref()).await,
        worship_schedules,
        officials: active_officials(&state).await?,
    };

    Ok(inertia.render("Public/Landing", props))
}
