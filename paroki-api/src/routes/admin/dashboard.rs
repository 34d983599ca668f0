/// Admin dashboard: entity counts, unread feedback and finance totals

use crate::{
    app::AppState,
    error::ApiResult,
    routes::admin::finances::SummaryProps,
    view::{Inertia, Page},
};
use axum::extract::State;
use paroki_shared::{
    calendar::{DateRange, ScheduleFilter},
    models::{
        activity::Activity,
        announcement::Announcement,
        church_official::ChurchOfficial,
        community::Community,
        feedback::Feedback,
        finance::{Finance, FinanceFilter},
        user::{Role, User},
        worship_schedule::WorshipSchedule,
    },
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Counts {
    pub members: i64,
    pub admins: i64,
    pub communities: i64,
    pub announcements: i64,
    pub published_announcements: i64,
    pub activities: i64,
    pub upcoming_activities: i64,
    pub worship_schedules: i64,
    pub church_officials: i64,
    pub unread_feedback: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardProps {
    pub counts: Counts,

    /// All-time ledger totals
    pub finance: SummaryProps,

    /// Totals for the current calendar month
    pub finance_this_month: SummaryProps,
}

pub async fn dashboard(State(state): State<AppState>, inertia: Inertia) -> ApiResult<Page<DashboardProps>> {
    let db = &state.db;
    let today = state.today();

    let counts = Counts {
        members: User::count_by_role(db, Role::Umat).await?,
        admins: User::count_by_role(db, Role::Admin).await?,
        communities: Community::count(db).await?,
        announcements: Announcement::count_all(db, None).await?,
        published_announcements: Announcement::count_published(db).await?,
        activities: Activity::count_all(db).await?,
        upcoming_activities: Activity::count_by_filter(db, ScheduleFilter::Upcoming, today).await?,
        worship_schedules: WorshipSchedule::count_all(db).await?,
        church_officials: ChurchOfficial::count(db).await?,
        unread_feedback: Feedback::count_unread(db).await?,
    };

    let month = DateRange::month_of(today)?;
    let this_month = FinanceFilter {
        entry_type: None,
        start: Some(month.start),
        end: Some(month.end),
    };

    Ok(inertia.render(
        "Admin/Dashboard",
        DashboardProps {
            counts,
            finance: Finance::summary(db, FinanceFilter::default()).await?.into(),
            finance_this_month: Finance::summary(db, this_month).await?.into(),
        },
    ))
}
