/// `GET /sitemap.xml`

use crate::app::AppState;
use axum::{extract::State, http::header, response::IntoResponse};
use paroki_shared::sitemap::build_sitemap;

pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        build_sitemap(&state.config.app.url),
    )
}
