//! Vendor dashboard route handlers.
//!
//! Guarded by `RequireVendor` (vendor or admin). The platform re-checks the
//! role on every call; the guard only scopes what the storefront offers.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use polar_scoop_core::{CategoryId, OrderId, OrderStatus, ProductId};

use crate::api::ProductQuery;
use crate::api::products::{ProductDraft, UploadPart};
use crate::api::types::Product;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireVendor;
use crate::routes::orders::OrderView;
use crate::state::AppState;

/// Paging parameter for the vendor product list.
#[derive(Debug, Deserialize)]
pub struct VendorProductsParams {
    pub page: Option<u32>,
}

/// Read a multipart text field.
async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Return-review decision form data.
#[derive(Debug, Deserialize)]
pub struct ReviewReturnForm {
    pub approve: bool,
}

/// The vendor's own listings.
///
/// The catalog endpoint has no vendor filter, so the page is filtered here
/// on the vendor id - display-time scoping, same as everything else in this
/// service.
#[instrument(skip(state, login))]
pub async fn products(
    State(state): State<AppState>,
    RequireVendor(login): RequireVendor,
    Query(params): Query<VendorProductsParams>,
) -> Result<Json<Vec<Product>>> {
    let query = ProductQuery {
        page: params.page,
        ..ProductQuery::default()
    };

    let page = state.platform().list_products(&query).await?;
    let own: Vec<Product> = page
        .products
        .into_iter()
        .filter(|p| p.vendor.as_ref() == Some(&login.user.id))
        .collect();

    Ok(Json(own))
}

/// Create a listing from multipart fields: `name`, `description`, `price`,
/// `stock`, optional `category`, optional `image` file.
#[instrument(skip(state, login, multipart))]
pub async fn create_product(
    State(state): State<AppState>,
    RequireVendor(login): RequireVendor,
    mut multipart: Multipart,
) -> Result<Json<Product>> {
    let mut name = None;
    let mut description = None;
    let mut price = None;
    let mut stock = None;
    let mut category = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let field_name = field.name().map(ToString::to_string);
        match field_name.as_deref() {
            Some("name") => name = Some(text_field(field).await?),
            Some("description") => description = Some(text_field(field).await?),
            Some("price") => {
                let raw = text_field(field).await?;
                price = Some(raw.parse::<Decimal>().map_err(|_| {
                    AppError::BadRequest(format!("invalid price: {raw}"))
                })?);
            }
            Some("stock") => {
                let raw = text_field(field).await?;
                stock = Some(raw.parse::<i64>().map_err(|_| {
                    AppError::BadRequest(format!("invalid stock: {raw}"))
                })?);
            }
            Some("category") => category = Some(CategoryId::new(text_field(field).await?)),
            Some("image") => {
                let file_name = field.file_name().unwrap_or("product.jpg").to_string();
                let content_type = field.content_type().unwrap_or("image/jpeg").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                image = Some(UploadPart {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let draft = ProductDraft {
        name: name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("name is required".to_string()))?,
        description: description.unwrap_or_default(),
        price: price.ok_or_else(|| AppError::BadRequest("price is required".to_string()))?,
        stock: stock.ok_or_else(|| AppError::BadRequest("stock is required".to_string()))?,
        category,
    };

    if draft.price < Decimal::ZERO {
        return Err(AppError::BadRequest("price cannot be negative".to_string()));
    }
    if draft.stock < 0 {
        return Err(AppError::BadRequest("stock cannot be negative".to_string()));
    }

    let product = state
        .platform()
        .create_product(&draft, image, &login.platform)
        .await?;

    add_breadcrumb(
        "vendor",
        "Created product",
        Some(&[("product_id", product.id.as_str())]),
    );

    Ok(Json(product))
}

/// Delete a listing.
#[instrument(skip(state, login), fields(product_id = %id))]
pub async fn delete_product(
    State(state): State<AppState>,
    RequireVendor(login): RequireVendor,
    Path(id): Path<ProductId>,
) -> Result<Json<serde_json::Value>> {
    state.platform().delete_product(&id, &login.platform).await?;
    Ok(Json(serde_json::json!({ "message": "Product deleted" })))
}

/// Orders to fulfil. The platform scopes the listing to what this session
/// may see.
#[instrument(skip(state, login))]
pub async fn orders(
    State(state): State<AppState>,
    RequireVendor(login): RequireVendor,
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

/// Advance an order one step along the happy path.
///
/// The transition table supplies the target status; the platform decides
/// whether the move is actually legal.
#[instrument(skip(state, login), fields(order_id = %id))]
pub async fn advance_order(
    State(state): State<AppState>,
    RequireVendor(login): RequireVendor,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderView>> {
    let order = state.platform().get_order(&id, &login.platform).await?;

    let next = order.status.next_forward().ok_or_else(|| {
        AppError::BadRequest(format!("order in status {} cannot advance", order.status))
    })?;

    let updated = state
        .platform()
        .update_order_status(&id, next, &login.platform)
        .await?;

    add_breadcrumb(
        "vendor",
        "Advanced order status",
        Some(&[("order_id", id.as_str()), ("status", next.as_label())]),
    );

    Ok(Json(OrderView::for_role(updated, login.user.role)))
}

/// Decide a pending return request: approve moves the order to Returned,
/// reject puts it back to Delivered.
#[instrument(skip(state, login), fields(order_id = %id))]
pub async fn review_return(
    State(state): State<AppState>,
    RequireVendor(login): RequireVendor,
    Path(id): Path<OrderId>,
    Json(form): Json<ReviewReturnForm>,
) -> Result<Json<OrderView>> {
    let order = state.platform().get_order(&id, &login.platform).await?;

    if order.status != OrderStatus::ReturnRequested {
        return Err(AppError::BadRequest(
            "order has no pending return request".to_string(),
        ));
    }

    let target = if form.approve {
        OrderStatus::Returned
    } else {
        OrderStatus::Delivered
    };

    let updated = state
        .platform()
        .update_order_status(&id, target, &login.platform)
        .await?;

    Ok(Json(OrderView::for_role(updated, login.user.role)))
}
