//! Cart route handlers.
//!
//! The cart lives in the session; every handler rehydrates it, mutates it,
//! persists it, and returns the freshly priced view. Adding a product that
//! is already in the cart replaces its line (upsert), never duplicates it.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use polar_scoop_core::{Money, PricingPolicy, ProductId};
use rust_decimal::Decimal;

use crate::api::discounts::ValidationItem;
use crate::api::types::AppliedCoupon;
use crate::cart::{Cart, CartLine, Quote, quote};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session as session_state;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// One cart line, priced and conflict-flagged for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub stock: i64,
    pub image: Option<String>,
    /// Quantity exceeds the last-known stock snapshot.
    pub exceeds_stock: bool,
    pub line_total: Decimal,
    /// Formatted unit price (e.g. "₹249.00").
    pub display_price: String,
    /// Formatted line total.
    pub display_line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        let line_total = line.price * Decimal::from(line.quantity);
        Self {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            price: line.price,
            quantity: line.quantity,
            stock: line.stock,
            image: line.image.clone(),
            exceeds_stock: line.exceeds_stock(),
            line_total,
            display_price: Money::rupees(line.price).to_string(),
            display_line_total: Money::rupees(line_total).to_string(),
        }
    }
}

/// The cart screen: lines, quote, coupon, and the checkout gate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub item_count: u64,
    pub quote: Quote,
    pub coupon: Option<AppliedCoupon>,
    /// True while any line exceeds its stock snapshot; checkout is refused
    /// until the shopper removes or reduces those lines.
    pub checkout_blocked: bool,
}

impl CartView {
    /// Price a cart for display.
    #[must_use]
    pub fn build(cart: &Cart, coupon: Option<AppliedCoupon>) -> Self {
        let discount = coupon.as_ref().map(|c| c.amount);
        Self {
            items: cart.lines.iter().map(CartLineView::from).collect(),
            item_count: cart.total_quantity(),
            quote: quote(&cart.lines, discount, &PricingPolicy::standard()),
            coupon,
            checkout_blocked: cart.has_conflicts(),
        }
    }
}

async fn current_view(session: &Session) -> Result<CartView> {
    let cart = session_state::load_cart(session).await?;
    let coupon = session_state::load_coupon(session).await?;
    Ok(CartView::build(&cart, coupon))
}

// =============================================================================
// Forms
// =============================================================================

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Quantity-change form data.
#[derive(Debug, Deserialize)]
pub struct UpdateItemForm {
    pub quantity: u32,
}

/// Coupon form data.
#[derive(Debug, Deserialize)]
pub struct CouponForm {
    pub code: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart with its quote and conflict flags.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    Ok(Json(current_view(&session).await?))
}

/// Add a product to the cart, replacing any existing line for it.
///
/// The fetched product supplies the price and stock snapshots the line will
/// carry until it is refreshed.
#[instrument(skip(state, session), fields(product_id = %form.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddItemForm>,
) -> Result<Json<CartView>> {
    let quantity = form.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }

    let product = state.platform().get_product(&form.product_id).await?;

    let mut cart = session_state::load_cart(&session).await?;
    cart.upsert(CartLine::from_product(&product, quantity));
    session_state::save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added item to cart",
        Some(&[("product_id", form.product_id.as_str())]),
    );

    let coupon = session_state::load_coupon(&session).await?;
    Ok(Json(CartView::build(&cart, coupon)))
}

/// Change the quantity on a cart line.
#[instrument(skip(session), fields(product_id = %id))]
pub async fn update(
    session: Session,
    Path(id): Path<ProductId>,
    Json(form): Json<UpdateItemForm>,
) -> Result<Json<CartView>> {
    if form.quantity == 0 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1; remove the line instead".to_string(),
        ));
    }

    let mut cart = session_state::load_cart(&session).await?;
    if !cart.set_quantity(&id, form.quantity) {
        return Err(AppError::NotFound(format!("product {id} is not in the cart")));
    }
    session_state::save_cart(&session, &cart).await?;

    let coupon = session_state::load_coupon(&session).await?;
    Ok(Json(CartView::build(&cart, coupon)))
}

/// Remove a cart line. Removing a product that is not in the cart is a
/// no-op, not an error.
#[instrument(skip(session), fields(product_id = %id))]
pub async fn remove(session: Session, Path(id): Path<ProductId>) -> Result<Json<CartView>> {
    let mut cart = session_state::load_cart(&session).await?;
    cart.remove(&id);
    session_state::save_cart(&session, &cart).await?;

    let coupon = session_state::load_coupon(&session).await?;
    Ok(Json(CartView::build(&cart, coupon)))
}

/// Apply a coupon code.
///
/// Validation is entirely the platform's: the code travels with the current
/// cart, and on success the returned discount replaces any previously
/// applied one. On failure the pending coupon is cleared and the platform's
/// message is surfaced; there is no retry.
#[instrument(skip(state, session), fields(code = %form.code))]
pub async fn apply_coupon(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CouponForm>,
) -> Result<Json<CartView>> {
    let cart = session_state::load_cart(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest(
            "add items to the cart before applying a coupon".to_string(),
        ));
    }

    let pre_coupon = quote(&cart.lines, None, &PricingPolicy::standard());
    let items: Vec<ValidationItem> = cart
        .lines
        .iter()
        .map(|l| ValidationItem {
            product: l.product_id.clone(),
            price: l.price,
            quantity: l.quantity,
        })
        .collect();

    match state
        .platform()
        .validate_discount(form.code.trim(), pre_coupon.subtotal, &items)
        .await
    {
        Ok(coupon) => {
            session_state::save_coupon(&session, &coupon).await?;
            add_breadcrumb("cart", "Applied coupon", Some(&[("code", &coupon.code)]));
            Ok(Json(CartView::build(&cart, Some(coupon))))
        }
        Err(e) => {
            // Any failed validation clears whatever was applied before
            session_state::clear_coupon(&session).await?;
            Err(e.into())
        }
    }
}

/// Remove the applied coupon unconditionally.
#[instrument(skip(session))]
pub async fn remove_coupon(session: Session) -> Result<Json<CartView>> {
    session_state::clear_coupon(&session).await?;

    let cart = session_state::load_cart(&session).await?;
    Ok(Json(CartView::build(&cart, None)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(product: &str, price: i64, quantity: u32, stock: i64) -> CartLine {
        CartLine {
            product_id: ProductId::new(product),
            name: format!("Scoop {product}"),
            price: Decimal::new(price, 0),
            quantity,
            stock,
            image: None,
        }
    }

    #[test]
    fn test_view_flags_conflicted_lines_and_blocks_checkout() {
        let mut cart = Cart::new();
        cart.upsert(line("p1", 100, 2, 10));
        cart.upsert(line("p2", 250, 6, 4));

        let view = CartView::build(&cart, None);
        assert!(view.checkout_blocked);
        assert!(!view.items[0].exceeds_stock);
        assert!(view.items[1].exceeds_stock);
    }

    #[test]
    fn test_view_quote_includes_coupon() {
        let mut cart = Cart::new();
        cart.upsert(line("p1", 600, 2, 10));

        let coupon = AppliedCoupon {
            code: "SCOOP100".to_string(),
            amount: Decimal::new(100, 0),
        };
        let view = CartView::build(&cart, Some(coupon));

        assert_eq!(view.quote.discount, Decimal::new(100, 0));
        assert_eq!(view.quote.grand_total, Decimal::new(1316, 0));
        assert_eq!(view.item_count, 2);
    }

    #[test]
    fn test_line_view_totals() {
        let view = CartLineView::from(&line("p1", 249, 3, 10));
        assert_eq!(view.line_total, Decimal::new(747, 0));
        assert_eq!(view.display_price, "\u{20b9}249.00");
        assert_eq!(view.display_line_total, "\u{20b9}747.00");
    }
}
