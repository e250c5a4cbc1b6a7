//! Discount endpoints.
//!
//! Coupon validation is entirely the platform's call: the storefront sends
//! the code with the current cart and keeps only the validation result.

use reqwest::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use polar_scoop_core::ProductId;

use super::types::{AppliedCoupon, Discount};
use super::{ApiError, PlatformClient, PlatformSession};

/// A cart line in the shape the validation endpoint expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationItem {
    /// Product in the cart.
    pub product: ProductId,
    /// Unit price the cart displays.
    pub price: Decimal,
    /// Quantity in the cart.
    pub quantity: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateBody<'a> {
    code: &'a str,
    cart_total: Decimal,
    cart_items: &'a [ValidationItem],
}

#[derive(Deserialize)]
struct DiscountsEnvelope {
    discounts: Vec<Discount>,
}

#[derive(Deserialize)]
struct ValidateEnvelope {
    discount: AppliedCoupon,
}

impl PlatformClient {
    /// Fetch all discount records (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session))]
    pub async fn list_discounts(
        &self,
        session: &PlatformSession,
    ) -> Result<Vec<Discount>, ApiError> {
        let req = Self::with_session(self.request(Method::GET, "/discounts"), Some(session));
        let envelope: DiscountsEnvelope = self.execute(req).await?;
        Ok(envelope.discounts)
    }

    /// Validate a coupon code against the current cart.
    ///
    /// Any non-success response means "coupon invalid" to the caller -
    /// expiry, minimum order value, and scope checks all live on the
    /// platform.
    ///
    /// # Errors
    ///
    /// Returns the platform's rejection (user-displayable) or a transport
    /// error.
    #[instrument(skip(self, items), fields(code = %code, cart_total = %cart_total))]
    pub async fn validate_discount(
        &self,
        code: &str,
        cart_total: Decimal,
        items: &[ValidationItem],
    ) -> Result<AppliedCoupon, ApiError> {
        let req = self
            .request(Method::POST, "/discounts/validate")
            .json(&ValidateBody {
                code,
                cart_total,
                cart_items: items,
            });

        let envelope: ValidateEnvelope = self.execute(req).await?;
        Ok(envelope.discount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_body_wire_shape() {
        let items = vec![ValidationItem {
            product: ProductId::new("p1"),
            price: Decimal::new(600, 0),
            quantity: 2,
        }];
        let body = ValidateBody {
            code: "SCOOP10",
            cart_total: Decimal::new(1200, 0),
            cart_items: &items,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "SCOOP10");
        assert_eq!(json["cartTotal"], "1200");
        assert_eq!(json["cartItems"][0]["product"], "p1");
        assert_eq!(json["cartItems"][0]["quantity"], 2);
    }
}
