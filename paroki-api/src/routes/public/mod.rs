/// Public pages
///
/// Everything here is readable without an account. Listings resolve image
/// URLs through [`crate::app::AppState::image_url`].

pub mod activities;
pub mod announcements;
pub mod church_officials;
pub mod feedback;
pub mod landing;
pub mod sitemap;
pub mod worship_schedules;

use paroki_shared::calendar::ScheduleFilter;
use serde::Deserialize;

pub const ANNOUNCEMENTS_PER_PAGE: u32 = 9;
pub const SCHEDULES_PER_PAGE: u32 = 10;

/// `?page=`
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

/// `?filter=upcoming|archive&page=`
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    #[serde(default)]
    pub filter: ScheduleFilter,

    pub page: Option<u32>,
}

