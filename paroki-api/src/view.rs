/// Page responses for the front-end page components
///
/// Every page handler answers with a [`Page`]: the component to mount, its
/// props, the requested URL and the asset version. The front end swaps
/// components based on `component` and re-requests when `version` changes.
///
/// # Response
///
/// ```json
/// {
///   "component": "Public/Announcements/Index",
///   "props": {"announcements": {"data": [], "current_page": 1, "...": "..."}},
///   "url": "/announcements?page=1",
///   "version": "0.1.0"
/// }
/// ```
///
/// # Example
///
/// ```no_run
/// use axum::Json;
/// use paroki_api::view::{Inertia, Page};
/// use serde_json::json;
///
/// async fn handler(inertia: Inertia) -> Page<serde_json::Value> {
///     inertia.render("Public/Landing", json!({"title": "Beranda"}))
/// }
/// ```

use crate::app::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::convert::Infallible;

/// Asset version reported to the front end
pub const ASSET_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const X_INERTIA: HeaderName = HeaderName::from_static("x-inertia");

/// Request-side view context: the URL the page was requested with
#[derive(Debug, Clone)]
pub struct Inertia {
    url: String,
}

impl Inertia {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Builds the page response for `component`
    pub fn render<P: Serialize>(&self, component: &'static str, props: P) -> Page<P> {
        Page {
            component,
            props,
            url: self.url.clone(),
            version: ASSET_VERSION,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Inertia
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let url = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        Ok(Inertia::new(url))
    }
}

/// Serialized page object
#[derive(Debug, Clone, Serialize)]
pub struct Page<P> {
    pub component: &'static str,
    pub props: P,
    pub url: String,
    pub version: &'static str,
}

impl<P: Serialize> IntoResponse for Page<P> {
    fn into_response(self) -> Response {
        let mut response = Json(self).into_response();
        let headers = response.headers_mut();
        headers.insert(header::VARY, HeaderValue::from_static("X-Inertia"));
        headers.insert(X_INERTIA, HeaderValue::from_static("true"));
        response
    }
}

/// A record with its resolved public image URL
#[derive(Debug, Clone, Serialize)]
pub struct WithImage<T> {
    #[serde(flatten)]
    pub item: T,

    pub image_url: String,
}

/// Resolves `image_url` for every record
pub async fn with_images<T, F>(state: &AppState, items: Vec<T>, image_path: F) -> Vec<WithImage<T>>
where
    F: Fn(&T) -> Option<&str>,
{
    let mut resolved = Vec::with_capacity(items.len());
    for item in items {
        let image_url = state.image_url(image_path(&item)).await;
        resolved.push(WithImage { item, image_url });
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_page_response_shape() {
        let response = Inertia::new("/announcements?page=2")
            .render("Public/Announcements/Index", json!({"total": 0}))
            .into_response();

        assert_eq!(response.headers().get("vary").unwrap(), "X-Inertia");
        assert_eq!(response.headers().get("x-inertia").unwrap(), "true");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(page["component"], "Public/Announcements/Index");
        assert_eq!(page["props"]["total"], 0);
        assert_eq!(page["url"], "/announcements?page=2");
        assert_eq!(page["version"], ASSET_VERSION);
    }
}
