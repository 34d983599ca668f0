/// Stored image path normalization and public URL resolution
///
/// Image columns hold whatever was saved over the years: bare disk paths
/// (`announcements/a.jpg`), paths already carrying the public prefix
/// (`/storage/announcements/a.jpg`, sometimes twice), legacy bundled assets
/// (`assets/images/x.png`) and absolute URLs pasted by editors. Every
/// listing resolves them through [`resolve_image_url`] so the rules live in
/// exactly one place.
///
/// # Resolution order
///
/// 1. Missing or blank path: default image.
/// 2. Absolute `http(s)://` URL: returned unchanged.
/// 3. Path under `assets/`: served from the application root.
/// 4. Path present on the public disk: `{app_url}/storage/{path}`.
/// 5. Anything else: default image.
///
/// # Example
///
/// ```
/// use paroki_shared::media::{resolve_image_url, MediaUrls};
///
/// let urls = MediaUrls::new("https://paroki.example", "assets/images/default.jpg");
///
/// assert_eq!(
///     resolve_image_url(Some("storage/storage/announcements/a.jpg"), &urls, |_| true),
///     "https://paroki.example/storage/announcements/a.jpg"
/// );
/// assert_eq!(
///     resolve_image_url(None, &urls, |_| true),
///     "https://paroki.example/assets/images/default.jpg"
/// );
/// ```

use serde::Serialize;

const STORAGE_PREFIX: &str = "storage/";
const PUBLIC_PREFIX: &str = "public/";
const LEGACY_ASSETS_PREFIX: &str = "assets/";

/// Base URLs used to build public image links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaUrls {
    /// Application root without trailing slash
    app_url: String,

    /// Default image path relative to the application root
    default_image: String,
}

impl MediaUrls {
    pub fn new(app_url: impl Into<String>, default_image: impl Into<String>) -> Self {
        let app_url = app_url.into().trim_end_matches('/').to_string();
        let default_image = default_image.into().trim_start_matches('/').to_string();
        Self {
            app_url,
            default_image,
        }
    }

    pub fn app_url(&self) -> &str {
        &self.app_url
    }

    /// Public base of the file disk, e.g. `https://paroki.example/storage`
    pub fn storage_base(&self) -> String {
        format!("{}/storage", self.app_url)
    }

    pub fn default_image_url(&self) -> String {
        format!("{}/{}", self.app_url, self.default_image)
    }

    /// URL for an already-classified source
    ///
    /// `exists_on_disk` is only consulted for [`ImageSource::Stored`].
    pub fn url_for(&self, source: &ImageSource, exists_on_disk: bool) -> String {
        match source {
            ImageSource::Missing => self.default_image_url(),
            ImageSource::Absolute(url) => url.clone(),
            ImageSource::LegacyAsset(path) => format!("{}/{}", self.app_url, path),
            ImageSource::Stored(path) if exists_on_disk => {
                format!("{}/{}", self.storage_base(), path)
            }
            ImageSource::Stored(_) => self.default_image_url(),
        }
    }
}

/// What a stored image column points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Null or blank
    Missing,

    /// Absolute http(s) URL, kept verbatim
    Absolute(String),

    /// Bundled asset under `assets/`
    LegacyAsset(String),

    /// Relative path on the public disk
    Stored(String),
}

impl ImageSource {
    /// Disk path that must exist for the image to be served
    pub fn disk_path(&self) -> Option<&str> {
        match self {
            ImageSource::Stored(path) => Some(path),
            _ => None,
        }
    }
}

/// Classifies a raw image column value
pub fn classify_image_path(path: Option<&str>) -> ImageSource {
    let raw = match path.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return ImageSource::Missing,
    };

    if is_absolute_url(raw) {
        return ImageSource::Absolute(raw.to_string());
    }

    let normalized = normalize_storage_path(raw);
    if normalized.is_empty() {
        ImageSource::Missing
    } else if normalized.starts_with(LEGACY_ASSETS_PREFIX) {
        ImageSource::LegacyAsset(normalized)
    } else {
        ImageSource::Stored(normalized)
    }
}

/// Resolves a raw image column value into a public URL
///
/// `exists_on_disk` receives the normalized disk-relative path.
pub fn resolve_image_url<F>(path: Option<&str>, urls: &MediaUrls, exists_on_disk: F) -> String
where
    F: Fn(&str) -> bool,
{
    let source = classify_image_path(path);
    let exists = source.disk_path().map(&exists_on_disk).unwrap_or(false);
    urls.url_for(&source, exists)
}

/// Reduces a stored path to its disk-relative form
///
/// Converts backslashes, drops leading slashes, a leading `public/`, and
/// every leading `storage/` segment.
pub fn normalize_storage_path(path: &str) -> String {
    let mut current = path.trim().replace('\\', "/");

    loop {
        let trimmed = current.trim_start_matches('/');
        let stripped = trimmed
            .strip_prefix(STORAGE_PREFIX)
            .or_else(|| trimmed.strip_prefix(PUBLIC_PREFIX));

        match stripped {
            Some(rest) => current = rest.to_string(),
            None => {
                if trimmed.len() != current.len() {
                    current = trimmed.to_string();
                }
                break;
            }
        }
    }

    current
}

fn is_absolute_url(path: &str) -> bool {
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> MediaUrls {
        MediaUrls::new("https://paroki.example/", "/assets/images/default.jpg")
    }

    #[test]
    fn test_missing_path_uses_default() {
        let expected = "https://paroki.example/assets/images/default.jpg";
        assert_eq!(resolve_image_url(None, &urls(), |_| true), expected);
        assert_eq!(resolve_image_url(Some(""), &urls(), |_| true), expected);
        assert_eq!(resolve_image_url(Some("   "), &urls(), |_| true), expected);
    }

    #[test]
    fn test_absolute_urls_are_unchanged() {
        for url in [
            "https://cdn.example/a.jpg",
            "http://cdn.example/b.png",
            "HTTPS://CDN.EXAMPLE/C.PNG",
        ] {
            assert_eq!(resolve_image_url(Some(url), &urls(), |_| false), url);
        }
    }

    #[test]
    fn test_relative_path_prefixed_exactly_once() {
        let expected = "https://paroki.example/storage/announcements/a.jpg";
        for raw in [
            "announcements/a.jpg",
            "/announcements/a.jpg",
            "storage/announcements/a.jpg",
            "/storage/announcements/a.jpg",
            "storage/storage/announcements/a.jpg",
            "public/announcements/a.jpg",
            "storage\\announcements\\a.jpg",
        ] {
            let url = resolve_image_url(Some(raw), &urls(), |_| true);
            assert_eq!(url, expected, "input {:?}", raw);
            assert!(!url.contains("storage/storage"));
        }
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let url = resolve_image_url(Some("announcements/gone.jpg"), &urls(), |_| false);
        assert_eq!(url, "https://paroki.example/assets/images/default.jpg");
    }

    #[test]
    fn test_disk_check_receives_normalized_path() {
        let url = resolve_image_url(Some("/storage/church-officials/p.jpg"), &urls(), |p| {
            p == "church-officials/p.jpg"
        });
        assert_eq!(url, "https://paroki.example/storage/church-officials/p.jpg");
    }

    #[test]
    fn test_legacy_assets_skip_disk_check() {
        let url = resolve_image_url(Some("/assets/images/gereja.jpg"), &urls(), |_| false);
        assert_eq!(url, "https://paroki.example/assets/images/gereja.jpg");
    }

    #[test]
    fn test_classification() {
        assert_eq!(classify_image_path(Some("storage/")), ImageSource::Missing);
        assert_eq!(
            classify_image_path(Some("activities/x.png")),
            ImageSource::Stored("activities/x.png".to_string())
        );
        assert_eq!(
            classify_image_path(Some("assets/logo.png")).disk_path(),
            None
        );
    }
}
