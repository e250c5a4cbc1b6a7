//! Order route handlers (customer context).
//!
//! The storefront renders the authoritative status and offers the subset of
//! actions the current role/status combination is expected to allow. It
//! never decides a transition itself - every action is a platform call.

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use serde::Serialize;
use tracing::instrument;

use polar_scoop_core::{OrderAction, OrderId, OrderStatus, Role, StatusBadge};

use crate::api::products::UploadPart;
use crate::api::types::Order;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireUser;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Display projection of an order status for one role.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    /// Index on the 4-step progress indicator, absent for side branches.
    pub progress_step: Option<u8>,
    /// Badge color class.
    pub badge: StatusBadge,
    /// Actions this role may attempt from here.
    pub actions: Vec<OrderAction>,
    /// The status an "advance" action would request, labels the button.
    pub next_step: Option<OrderStatus>,
}

impl StatusView {
    /// Project a status for a role.
    #[must_use]
    pub fn project(status: OrderStatus, role: Role) -> Self {
        Self {
            progress_step: status.progress_step(),
            badge: status.badge(),
            actions: status.actions_for(role),
            next_step: status.next_forward(),
        }
    }
}

/// An order plus its status projection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub status_view: StatusView,
}

impl OrderView {
    /// Project for the shopper who placed the order.
    ///
    /// Always the customer projection - a vendor looking at their own
    /// purchases gets shopper actions, not fulfilment ones.
    #[must_use]
    pub fn for_customer(order: Order) -> Self {
        let status_view = StatusView::project(order.status, Role::Customer);
        Self { order, status_view }
    }

    /// Project for a fulfilment role (vendor/admin dashboards).
    #[must_use]
    pub fn for_role(order: Order, role: Role) -> Self {
        let status_view = StatusView::project(order.status, role);
        Self { order, status_view }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Order history for the logged-in shopper.
#[instrument(skip(state, login))]
pub async fn index(
    State(state): State<AppState>,
    RequireUser(login): RequireUser,
) -> Result<Json<Vec<OrderView>>> {
    let orders = state.platform().my_orders(&login.platform).await?;
    Ok(Json(orders.into_iter().map(OrderView::for_customer).collect()))
}

/// Order detail with its status projection.
#[instrument(skip(state, login), fields(order_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(login): RequireUser,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderView>> {
    let order = state.platform().get_order(&id, &login.platform).await?;
    Ok(Json(OrderView::for_customer(order)))
}

/// Cancel an order. Offered only while Processing; the platform enforces.
#[instrument(skip(state, login), fields(order_id = %id))]
pub async fn cancel(
    State(state): State<AppState>,
    RequireUser(login): RequireUser,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderView>> {
    let order = state.platform().cancel_order(&id, &login.platform).await?;

    add_breadcrumb("orders", "Cancelled order", Some(&[("order_id", id.as_str())]));

    Ok(Json(OrderView::for_customer(order)))
}

/// File a return request with a reason and supporting photos.
///
/// Multipart fields: `reason` (text, required) and any number of `photos`
/// file parts, forwarded to the platform as-is.
#[instrument(skip(state, login, multipart), fields(order_id = %id))]
pub async fn request_return(
    State(state): State<AppState>,
    RequireUser(login): RequireUser,
    Path(id): Path<OrderId>,
    mut multipart: Multipart,
) -> Result<Json<OrderView>> {
    let mut reason: Option<String> = None;
    let mut photos: Vec<UploadPart> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let field_name = field.name().map(ToString::to_string);
        match field_name.as_deref() {
            Some("reason") => {
                reason = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            Some("photos") => {
                let file_name = field
                    .file_name()
                    .unwrap_or("photo.jpg")
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("image/jpeg")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                photos.push(UploadPart {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let reason = reason
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("a return reason is required".to_string()))?;

    let order = state
        .platform()
        .request_return(&id, reason.trim(), photos, &login.platform)
        .await?;

    add_breadcrumb("orders", "Requested return", Some(&[("order_id", id.as_str())]));

    Ok(Json(OrderView::for_customer(order)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_projection_on_delivered_order() {
        let view = StatusView::project(OrderStatus::Delivered, Role::Customer);
        assert_eq!(view.progress_step, Some(3));
        assert_eq!(view.badge, StatusBadge::Success);
        assert_eq!(view.actions, vec![OrderAction::RequestReturn]);
        assert_eq!(view.next_step, None);
    }

    #[test]
    fn test_vendor_projection_labels_next_step() {
        let view = StatusView::project(OrderStatus::Processing, Role::Vendor);
        assert_eq!(view.actions, vec![OrderAction::Advance]);
        assert_eq!(view.next_step, Some(OrderStatus::Shipped));
    }

    #[test]
    fn test_cancelled_projection_has_no_step_or_actions() {
        let view = StatusView::project(OrderStatus::Cancelled, Role::Customer);
        assert_eq!(view.progress_step, None);
        assert_eq!(view.badge, StatusBadge::Danger);
        assert!(view.actions.is_empty());
    }
}
