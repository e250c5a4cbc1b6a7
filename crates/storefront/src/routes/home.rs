//! Home content handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::api::types::{Banner, ContentItem};
use crate::error::Result;
use crate::middleware::OptionalUser;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Home screen data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub banners: Vec<Banner>,
    pub highlights: Vec<ContentItem>,
    /// Logged-in shopper for the navbar, if any.
    pub user: Option<CurrentUser>,
}

/// Banners and content highlights for the landing screen. Both reads are
/// served from the client cache most of the time.
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<Json<HomeView>> {
    let banners = state.platform().banners().await?;
    let highlights = state.platform().content_items(None).await?;

    Ok(Json(HomeView {
        banners,
        highlights,
        user,
    }))
}
