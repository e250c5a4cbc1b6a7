//! Checkout route handlers.
//!
//! Checkout walks the session state through quote, shipping, payment intent,
//! and order placement. The platform revalidates stock and reprices
//! authoritatively at order creation; everything here is the shopper-facing
//! preview of that.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use polar_scoop_core::{PricingPolicy, ProductId};

use crate::api::ApiError;
use crate::api::types::{OrderDraft, OrderItem, PaymentInfo, ShippingInfo};
use crate::cart::{Quote, quote};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireUser;
use crate::models::session as session_state;
use crate::routes::orders::OrderView;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Checkout screen data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub quote: Quote,
    pub shipping: Option<ShippingInfo>,
    /// Products whose quantity exceeds their stock snapshot; the order
    /// button stays disabled while this is non-empty.
    pub conflicts: Vec<ProductId>,
    pub cart_empty: bool,
}

/// Payment widget bootstrap data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSetupView {
    pub publishable_key: String,
    pub client_secret: String,
}

/// Order placement form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderForm {
    /// Payment reference confirmed by the widget.
    pub payment_id: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Checkout overview: quote, saved shipping, conflict list.
#[instrument(skip(session, _login))]
pub async fn show(session: Session, RequireUser(_login): RequireUser) -> Result<Json<CheckoutView>> {
    let cart = session_state::load_cart(&session).await?;
    let coupon = session_state::load_coupon(&session).await?;
    let shipping = session_state::load_shipping(&session).await?;

    Ok(Json(CheckoutView {
        quote: quote(
            &cart.lines,
            coupon.map(|c| c.amount),
            &PricingPolicy::standard(),
        ),
        shipping,
        conflicts: cart.conflicted_products().into_iter().cloned().collect(),
        cart_empty: cart.is_empty(),
    }))
}

/// Save the shipping destination for this checkout.
#[instrument(skip(session, _login, form))]
pub async fn save_shipping(
    session: Session,
    RequireUser(_login): RequireUser,
    Json(form): Json<ShippingInfo>,
) -> Result<Json<ShippingInfo>> {
    validate_shipping(&form)?;
    session_state::save_shipping(&session, &form).await?;
    Ok(Json(form))
}

/// Create a payment intent for the current quote.
#[instrument(skip(state, session, login))]
pub async fn payment(
    State(state): State<AppState>,
    session: Session,
    RequireUser(login): RequireUser,
) -> Result<Json<PaymentSetupView>> {
    let cart = session_state::load_cart(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("the cart is empty".to_string()));
    }
    if cart.has_conflicts() {
        return Err(AppError::CheckoutBlocked(
            cart.conflicted_products().into_iter().cloned().collect(),
        ));
    }

    let coupon = session_state::load_coupon(&session).await?;
    let q = quote(
        &cart.lines,
        coupon.map(|c| c.amount),
        &PricingPolicy::standard(),
    );

    let key = state.platform().stripe_api_key().await?;
    let intent = state
        .platform()
        .process_payment(q.grand_total, &login.platform)
        .await?;

    Ok(Json(PaymentSetupView {
        publishable_key: key.stripe_api_key,
        client_secret: intent.client_secret,
    }))
}

/// Place the order from the session state.
///
/// Stock snapshots are refreshed right before submission so the conflict
/// guard works with live numbers; the platform still has the final say.
#[instrument(skip(state, session, login, form))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    RequireUser(login): RequireUser,
    Json(form): Json<PlaceOrderForm>,
) -> Result<Json<OrderView>> {
    let mut cart = session_state::load_cart(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("the cart is empty".to_string()));
    }

    let shipping = session_state::load_shipping(&session)
        .await?
        .ok_or_else(|| AppError::BadRequest("shipping info is required".to_string()))?;

    // Refresh stock snapshots for the final conflict check
    let ids: Vec<ProductId> = cart.lines.iter().map(|l| l.product_id.clone()).collect();
    for id in &ids {
        match state.platform().get_product_fresh(id).await {
            Ok(product) => cart.refresh_stock(id, product.stock),
            // A delisted product can never be fulfilled
            Err(ApiError::NotFound(_)) => cart.refresh_stock(id, 0),
            Err(e) => return Err(e.into()),
        }
    }
    session_state::save_cart(&session, &cart).await?;

    if cart.has_conflicts() {
        return Err(AppError::CheckoutBlocked(
            cart.conflicted_products().into_iter().cloned().collect(),
        ));
    }

    let coupon = session_state::load_coupon(&session).await?;
    let q = quote(
        &cart.lines,
        coupon.as_ref().map(|c| c.amount),
        &PricingPolicy::standard(),
    );

    let draft = OrderDraft {
        shipping_info: shipping,
        order_items: cart
            .lines
            .iter()
            .map(|l| OrderItem {
                product: l.product_id.clone(),
                name: l.name.clone(),
                price: l.price,
                quantity: l.quantity,
                image: l.image.clone(),
            })
            .collect(),
        payment_info: PaymentInfo {
            id: form.payment_id,
            status: "succeeded".to_string(),
        },
        items_price: q.subtotal,
        tax_price: q.tax,
        shipping_price: q.shipping,
        discount: q.discount,
        total_price: q.grand_total,
        coupon_code: coupon.map(|c| c.code),
    };

    let order = state.platform().create_order(&draft, &login.platform).await?;

    session_state::clear_after_order(&session).await?;
    add_breadcrumb("checkout", "Placed order", Some(&[("order_id", order.id.as_str())]));

    Ok(Json(OrderView::for_customer(order)))
}

fn validate_shipping(shipping: &ShippingInfo) -> Result<()> {
    let required = [
        ("address", &shipping.address),
        ("city", &shipping.city),
        ("state", &shipping.state),
        ("country", &shipping.country),
        ("pinCode", &shipping.pin_code),
        ("phoneNo", &shipping.phone_no),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{field} is required")));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            address: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "MH".to_string(),
            country: "India".to_string(),
            pin_code: "411001".to_string(),
            phone_no: "9999999999".to_string(),
        }
    }

    #[test]
    fn test_validate_shipping_accepts_complete_info() {
        assert!(validate_shipping(&shipping()).is_ok());
    }

    #[test]
    fn test_validate_shipping_rejects_blank_fields() {
        let mut s = shipping();
        s.pin_code = "   ".to_string();

        let err = validate_shipping(&s).unwrap_err();
        assert!(err.to_string().contains("pinCode"));
    }
}
