/// Member dashboard
///
/// Profile with community, the next worship schedules assigned to the
/// member's community, the latest announcements and the member's documents.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    view::{with_images, Inertia, Page, WithImage},
};
use axum::{extract::State, Extension};
use paroki_shared::{
    auth::middleware::AuthContext,
    models::{
        announcement::Announcement,
        user::{User, UserWithCommunity},
        user_pdf::{UserPdf, MAX_SLOTS},
        worship_schedule::{WorshipSchedule, WorshipScheduleWithCommunities},
    },
};
use serde::Serialize;

const UPCOMING_SCHEDULES: i64 = 5;
const LATEST_ANNOUNCEMENTS: i64 = 3;

#[derive(Debug, Serialize)]
pub struct DashboardProps {
    pub user: UserWithCommunity,
    pub upcoming_schedules: Vec<WorshipScheduleWithCommunities>,
    pub announcements: Vec<WithImage<Announcement>>,
    pub documents: Vec<UserPdf>,
    pub max_documents: usize,
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    inertia: Inertia,
) -> ApiResult<Page<DashboardProps>> {
    let user = User::find_with_community(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    let upcoming_schedules = WorshipSchedule::list_upcoming_for_community(
        &state.db,
        user.user.community_id,
        state.today(),
        UPCOMING_SCHEDULES,
    )
    .await?;

    let announcements = Announcement::list_published(&state.db, LATEST_ANNOUNCEMENTS, 0).await?;
    let documents = UserPdf::list_by_user(&state.db, auth.user_id).await?;

    Ok(inertia.render(
        "Member/Dashboard",
        DashboardProps {
            user,
            upcoming_schedules,
            announcements: with_images(&state, announcements, |a: &Announcement| {
                a.image_path.as_deref()
            })
            .await,
            documents,
            max_documents: MAX_SLOTS,
        },
    ))
}
