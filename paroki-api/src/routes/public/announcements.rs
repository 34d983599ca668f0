/// Published announcements
///
/// # Endpoints
///
/// ```text
/// GET /announcements?page=2
/// GET /announcements/{id}
/// ```
///
/// Only published announcements are listed. An unpublished announcement is
/// indistinguishable from a missing one: both are 404.

use super::{PageQuery, ANNOUNCEMENTS_PER_PAGE};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    view::{with_images, Inertia, Page, WithImage},
};
use axum::extract::{Path, Query, State};
use paroki_shared::{
    models::announcement::Announcement,
    pagination::{PageRequest, Paginated},
};
use serde::Serialize;
use uuid::Uuid;

pub type AnnouncementCard = WithImage<Announcement>;

#[derive(Debug, Serialize)]
pub struct IndexProps {
    pub announcements: Paginated<AnnouncementCard>,
}

#[derive(Debug, Serialize)]
pub struct ShowProps {
    pub announcement: AnnouncementCard,
}

/// Published announcements for one page, newest first, with image URLs
pub async fn published_page(
    state: &AppState,
    request: PageRequest,
) -> Result<Paginated<AnnouncementCard>, ApiError> {
    let rows = Announcement::list_published(&state.db, request.limit(), request.offset()).await?;
    let total = Announcement::count_published(&state.db).await?;

    let cards = with_images(state, rows, |a: &Announcement| a.image_path.as_deref()).await;
    Ok(Paginated::new(cards, request, total))
}

pub async fn index(
    State(state): State<AppState>,
    inertia: Inertia,
    Query(query): Query<PageQuery>,
) -> ApiResult<Page<IndexProps>> {
    let request = PageRequest::new(query.page, ANNOUNCEMENTS_PER_PAGE);
    let announcements = published_page(&state, request).await?;

    Ok(inertia.render("Public/Announcements/Index", IndexProps { announcements }))
}

pub async fn show(
    State(state): State<AppState>,
    inertia: Inertia,
    Path(id): Path<Uuid>,
) -> ApiResult<Page<ShowProps>> {
    let announcement = Announcement::find_published(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Announcement"))?;

    let image_url = state.image_url(announcement.image_path.as_deref()).await;

    Ok(inertia.render(
        "Public/Announcements/Show",
        ShowProps {
            announcement: WithImage {
                item: announcement,
                image_url,
            },
        },
    ))
}
