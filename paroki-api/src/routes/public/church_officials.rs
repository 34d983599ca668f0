/// Active church officials, ordered by position rank then name

use crate::{
    app::AppState,
    error::ApiResult,
    view::{with_images, Inertia, Page, WithImage},
};
use axum::extract::State;
use paroki_shared::models::church_official::ChurchOfficial;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct IndexProps {
    pub officials: Vec<OfficialCard>,
}

#[derive(Debug, Serialize)]
pub struct OfficialCard {
    #[serde(flatten)]
    pub official: WithImage<ChurchOfficial>,

    /// Indonesian position title
    pub position_label: &'static str,
}

pub async fn active_officials(state: &AppState) -> ApiResult<Vec<OfficialCard>> {
    let officials = ChurchOfficial::list_active(&state.db).await?;
    let cards = with_images(state, officials, |o: &ChurchOfficial| o.image_path.as_deref()).await;

    Ok(cards
        .into_iter()
        .map(|official| OfficialCard {
            position_label: official.item.position.label(),
            official,
        })
        .collect())
}

pub async fn index(State(state): State<AppState>, inertia: Inertia) -> ApiResult<Page<IndexProps>> {
    let officials = active_officials(&state).await?;
    Ok(inertia.render("Public/ChurchOfficials/Index", IndexProps { officials }))
}
