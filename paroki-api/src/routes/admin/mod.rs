/// Administration routes
///
/// Every handler here runs behind `require_user` and `require_admin`.
///
/// Content with an image (announcements, activities, officials) is submitted
/// as multipart. [`ImageChange`] captures what the form asks for so it can be
/// validated together with the other fields before anything is written.

pub mod activities;
pub mod announcements;
pub mod church_officials;
pub mod communities;
pub mod dashboard;
pub mod feedback;
pub mod finances;
pub mod reports;
pub mod users;
pub mod worship_schedules;

use crate::{
    app::AppState,
    error::{ApiResult, ValidationErrorDetail},
    forms::{validate_image, MultipartForm, UploadedFile},
};
use paroki_shared::media::classify_image_path;
use serde::{de, Deserialize, Deserializer};
use std::{fmt::Display, str::FromStr};

pub const PER_PAGE: u32 = 15;

/// `?page=&search=`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Query values where `?key=` means "not set"
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Requested change to a record's image
#[derive(Debug)]
pub enum ImageChange {
    Keep,
    Remove,
    Replace { file: UploadedFile, extension: String },
}

impl ImageChange {
    /// Reads the `image` file part and the `remove_image` flag
    pub fn from_form(
        form: &mut MultipartForm,
        max_bytes: usize,
        errors: &mut Vec<ValidationErrorDetail>,
    ) -> Self {
        match form.take_file("image") {
            Some(file) => match validate_image(&file, "image", max_bytes) {
                Ok(extension) => ImageChange::Replace { file, extension },
                Err(detail) => {
                    errors.push(detail);
                    ImageChange::Keep
                }
            },
            None if form.flag("remove_image") => ImageChange::Remove,
            None => ImageChange::Keep,
        }
    }

    /// Stores a replacement and returns the column value to save
    pub async fn apply(
        self,
        state: &AppState,
        directory: &str,
        current: Option<&str>,
    ) -> ApiResult<Option<String>> {
        match self {
            ImageChange::Keep => Ok(current.map(str::to_string)),
            ImageChange::Remove => Ok(None),
            ImageChange::Replace { file, extension } => {
                let path = state.storage.put(directory, &extension, &file.bytes).await?;
                tracing::debug!(path = %path, "Image stored");
                Ok(Some(path))
            }
        }
    }
}

/// Deletes a stored image file
///
/// Absolute URLs and bundled assets are never touched. Failures are logged.
pub async fn discard_image(state: &AppState, path: Option<&str>) {
    let source = classify_image_path(path);
    if let Some(disk_path) = source.disk_path() {
        match state.storage.delete(disk_path).await {
            Ok(_) => tracing::debug!(path = disk_path, "Image deleted"),
            Err(e) => tracing::warn!(path = disk_path, error = %e, "Failed to delete image"),
        }
    }
}

/// Removes the previous image once a record points elsewhere
pub async fn discard_replaced(state: &AppState, previous: Option<&str>, current: Option<&str>) {
    if previous.is_some() && previous != current {
        discard_image(state, previous).await;
    }
}
