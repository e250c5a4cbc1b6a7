//! Session-stored state and its fixed keys.
//!
//! The session is the storefront's durable client-side store: cart lines,
//! shipping info, and the applied coupon each live under a fixed key and are
//! rehydrated on every request, surviving reloads the way the old
//! localStorage keys did.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use polar_scoop_core::{Email, Role, UserId, VendorApplicationStatus};

use crate::api::types::{AppliedCoupon, ShippingInfo, UserProfile};
use crate::cart::Cart;

/// Session-stored user identity.
///
/// A denormalized copy of the profile, cached at login so route guards do
/// not hit the platform on every request. `/auth/me` refreshes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Platform user id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: Email,
    /// Account role.
    pub role: Role,
    /// Vendor application progress.
    pub vendor_status: VendorApplicationStatus,
}

impl From<UserProfile> for CurrentUser {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            role: profile.role,
            vendor_status: profile.vendor_status,
        }
    }
}

/// Fixed session keys for persisted state.
pub mod session_keys {
    /// Key for the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the platform session cookie.
    pub const PLATFORM_SESSION: &str = "platform_session";

    /// Key for the cart lines.
    pub const CART_ITEMS: &str = "cart_items";

    /// Key for the checkout shipping info.
    pub const SHIPPING_INFO: &str = "shipping_info";

    /// Key for the applied coupon.
    pub const COUPON: &str = "coupon";
}

/// Rehydrate the cart, or start an empty one.
///
/// # Errors
///
/// Returns an error if the session store is unreachable.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session
        .get::<Cart>(session_keys::CART_ITEMS)
        .await?
        .unwrap_or_default())
}

/// Persist the cart.
///
/// # Errors
///
/// Returns an error if the session store is unreachable.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART_ITEMS, cart).await
}

/// The applied coupon, if any.
///
/// # Errors
///
/// Returns an error if the session store is unreachable.
pub async fn load_coupon(
    session: &Session,
) -> Result<Option<AppliedCoupon>, tower_sessions::session::Error> {
    session.get(session_keys::COUPON).await
}

/// Replace the applied coupon (at most one is active).
///
/// # Errors
///
/// Returns an error if the session store is unreachable.
pub async fn save_coupon(
    session: &Session,
    coupon: &AppliedCoupon,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::COUPON, coupon).await
}

/// Clear the applied coupon unconditionally.
///
/// # Errors
///
/// Returns an error if the session store is unreachable.
pub async fn clear_coupon(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<AppliedCoupon>(session_keys::COUPON)
        .await?;
    Ok(())
}

/// The saved shipping destination, if any.
///
/// # Errors
///
/// Returns an error if the session store is unreachable.
pub async fn load_shipping(
    session: &Session,
) -> Result<Option<ShippingInfo>, tower_sessions::session::Error> {
    session.get(session_keys::SHIPPING_INFO).await
}

/// Persist the shipping destination for checkout.
///
/// # Errors
///
/// Returns an error if the session store is unreachable.
pub async fn save_shipping(
    session: &Session,
    shipping: &ShippingInfo,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::SHIPPING_INFO, shipping).await
}

/// Drop cart and coupon after a placed order.
///
/// Shipping info survives so the next checkout starts prefilled.
///
/// # Errors
///
/// Returns an error if the session store is unreachable.
pub async fn clear_after_order(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<Cart>(session_keys::CART_ITEMS).await?;
    session
        .remove::<AppliedCoupon>(session_keys::COUPON)
        .await?;
    Ok(())
}
