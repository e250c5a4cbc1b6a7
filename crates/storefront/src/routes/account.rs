//! Account route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use polar_scoop_core::VendorApplicationStatus;

use crate::api::types::UserProfile;
use crate::error::Result;
use crate::middleware::{RequireUser, establish_login};
use crate::state::AppState;

/// Account screen data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Whether the vendor dashboard is open to this account.
    pub vendor_dashboard: bool,
}

/// Account overview: fresh profile plus vendor application status.
#[instrument(skip(state, session, login))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireUser(login): RequireUser,
) -> Result<Json<AccountView>> {
    let profile = state.platform().me(&login.platform).await?;

    // A vendor application may have been approved since login
    establish_login(&session, profile.clone(), &login.platform).await?;

    let vendor_dashboard = profile.role.can_vend()
        || profile.vendor_status == VendorApplicationStatus::Approved;

    Ok(Json(AccountView {
        profile,
        vendor_dashboard,
    }))
}
