//! Admin dashboard route handlers.
//!
//! Guarded by `RequireAdmin`. Handlers are passthroughs to the platform's
//! admin endpoints; the storefront adds nothing but the role guard and
//! cache invalidation.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use polar_scoop_core::{BannerId, CategoryId, ContentItemId, OrderId, OrderStatus};

use crate::api::types::{Banner, Category, ContentItem, Discount};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::routes::orders::OrderView;
use crate::state::AppState;

// =============================================================================
// Forms
// =============================================================================

/// Category create/update form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryForm {
    pub name: String,
    pub image_url: Option<String>,
}

/// Order status form data.
#[derive(Debug, Deserialize)]
pub struct OrderStatusForm {
    pub status: OrderStatus,
}

/// Banner create form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerForm {
    pub title: String,
    pub image_url: String,
    pub link: Option<String>,
}

/// Content item create/update form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItemForm {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub body: Option<String>,
    pub image_url: Option<String>,
}

// =============================================================================
// Orders
// =============================================================================

/// All orders, projected with admin actions.
#[instrument(skip(state, login))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAdmin(login): RequireAdmin,
) -> Result<Json<Vec<OrderView>>> {
    let role = login.user.role;
    let orders = state.platform().all_orders(&login.platform).await?;
    Ok(Json(
        orders
            .into_iter()
            .map(|o| OrderView::for_role(o, role))
            .collect(),
    ))
}

/// Set an order's status directly. The platform alone judges legality;
/// an illegal move comes back as its error message.
#[instrument(skip(state, login), fields(order_id = %id, status = %form.status))]
pub async fn update_order_status(
    State(state): State<AppState>,
    RequireAdmin(login): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(form): Json<OrderStatusForm>,
) -> Result<Json<OrderView>> {
    let updated = state
        .platform()
        .update_order_status(&id, form.status, &login.platform)
        .await?;

    Ok(Json(OrderView::for_role(updated, login.user.role)))
}

// =============================================================================
// Discounts
// =============================================================================

/// All discount records.
#[instrument(skip(state, login))]
pub async fn discounts(
    State(state): State<AppState>,
    RequireAdmin(login): RequireAdmin,
) -> Result<Json<Vec<Discount>>> {
    let discounts = state.platform().list_discounts(&login.platform).await?;
    Ok(Json(discounts))
}

// =============================================================================
// Categories
// =============================================================================

/// Create a category.
#[instrument(skip(state, login))]
pub async fn create_category(
    State(state): State<AppState>,
    RequireAdmin(login): RequireAdmin,
    Json(form): Json<CategoryForm>,
) -> Result<Json<Category>> {
    let category = state
        .platform()
        .create_category(&form.name, form.image_url.as_deref(), &login.platform)
        .await?;
    Ok(Json(category))
}

/// Update a category.
#[instrument(skip(state, login), fields(category_id = %id))]
pub async fn update_category(
    State(state): State<AppState>,
    RequireAdmin(login): RequireAdmin,
    Path(id): Path<CategoryId>,
    Json(form): Json<CategoryForm>,
) -> Result<Json<Category>> {
    let category = state
        .platform()
        .update_category(&id, &form.name, form.image_url.as_deref(), &login.platform)
        .await?;
    Ok(Json(category))
}

/// Delete a category.
#[instrument(skip(state, login), fields(category_id = %id))]
pub async fn delete_category(
    State(state): State<AppState>,
    RequireAdmin(login): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<Json<serde_json::Value>> {
    state.platform().delete_category(&id, &login.platform).await?;
    Ok(Json(serde_json::json!({ "message": "Category deleted" })))
}

// =============================================================================
// Banners
// =============================================================================

/// Create a banner.
#[instrument(skip(state, login))]
pub async fn create_banner(
    State(state): State<AppState>,
    RequireAdmin(login): RequireAdmin,
    Json(form): Json<BannerForm>,
) -> Result<Json<Banner>> {
    let banner = state
        .platform()
        .create_banner(
            &form.title,
            &form.image_url,
            form.link.as_deref(),
            &login.platform,
        )
        .await?;
    Ok(Json(banner))
}

/// Delete a banner.
#[instrument(skip(state, login), fields(banner_id = %id))]
pub async fn delete_banner(
    State(state): State<AppState>,
    RequireAdmin(login): RequireAdmin,
    Path(id): Path<BannerId>,
) -> Result<Json<serde_json::Value>> {
    state.platform().delete_banner(&id, &login.platform).await?;
    Ok(Json(serde_json::json!({ "message": "Banner deleted" })))
}

// =============================================================================
// Content Items
// =============================================================================

/// Create a content item.
#[instrument(skip(state, login, form))]
pub async fn create_content_item(
    State(state): State<AppState>,
    RequireAdmin(login): RequireAdmin,
    Json(form): Json<ContentItemForm>,
) -> Result<Json<ContentItem>> {
    let item = state
        .platform()
        .create_content_item(
            &form.kind,
            &form.title,
            form.body.as_deref(),
            form.image_url.as_deref(),
            &login.platform,
        )
        .await?;
    Ok(Json(item))
}

/// Update a content item.
#[instrument(skip(state, login, form), fields(item_id = %id))]
pub async fn update_content_item(
    State(state): State<AppState>,
    RequireAdmin(login): RequireAdmin,
    Path(id): Path<ContentItemId>,
    Json(form): Json<ContentItemForm>,
) -> Result<Json<ContentItem>> {
    let item = state
        .platform()
        .update_content_item(
            &id,
            &form.kind,
            &form.title,
            form.body.as_deref(),
            form.image_url.as_deref(),
            &login.platform,
        )
        .await?;
    Ok(Json(item))
}

/// Delete a content item.
#[instrument(skip(state, login), fields(item_id = %id))]
pub async fn delete_content_item(
    State(state): State<AppState>,
    RequireAdmin(login): RequireAdmin,
    Path(id): Path<ContentItemId>,
) -> Result<Json<serde_json::Value>> {
    state
        .platform()
        .delete_content_item(&id, &login.platform)
        .await?;
    Ok(Json(serde_json::json!({ "message": "Content item deleted" })))
}
