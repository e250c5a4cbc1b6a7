//! Display-time pricing for the cart.
//!
//! A pure function of its inputs: lines, an optional platform-validated
//! discount, and the pricing policy. The platform independently recomputes
//! and authoritatively prices the order at submission; this quote exists so
//! the shopper sees the same numbers first.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use polar_scoop_core::{CurrencyCode, PricingPolicy};

use super::CartLine;

/// A priced cart, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Sum of `price * quantity` across lines, exact.
    pub subtotal: Decimal,
    /// Zero above the free-shipping threshold, flat fee otherwise.
    pub shipping: Decimal,
    /// GST on the subtotal, rounded to two places.
    pub tax: Decimal,
    /// Platform-validated coupon reduction.
    pub discount: Decimal,
    /// `subtotal + shipping + tax - discount`, clamped at zero.
    pub grand_total: Decimal,
    /// Currency all figures are in.
    pub currency: CurrencyCode,
}

/// Price a set of cart lines.
///
/// Order-insensitive and side-effect free. The grand total is clamped at
/// zero: a discount larger than the rest of the order yields a free order,
/// not a negative one.
#[must_use]
pub fn quote(lines: &[CartLine], discount: Option<Decimal>, policy: &PricingPolicy) -> Quote {
    let subtotal: Decimal = lines
        .iter()
        .map(|l| l.price * Decimal::from(l.quantity))
        .sum();

    let shipping = if subtotal > policy.free_shipping_over {
        Decimal::ZERO
    } else {
        policy.flat_shipping_fee
    };

    let tax = (subtotal * policy.tax_rate)
        .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);

    let discount = discount.unwrap_or(Decimal::ZERO);

    let grand_total = (subtotal + shipping + tax - discount).max(Decimal::ZERO);

    Quote {
        subtotal,
        shipping,
        tax,
        discount,
        grand_total,
        currency: CurrencyCode::default(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use polar_scoop_core::ProductId;

    fn line(price: &str, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(format!("p-{price}-{quantity}")),
            name: "test scoop".to_string(),
            price: price.parse().unwrap(),
            quantity,
            stock: 1000,
            image: None,
        }
    }

    fn policy() -> PricingPolicy {
        PricingPolicy::standard()
    }

    #[test]
    fn test_flat_shipping_scenario() {
        // cart = [{price:100, qty:2}], no coupon
        let q = quote(&[line("100", 2)], None, &policy());
        assert_eq!(q.subtotal, Decimal::new(200, 0));
        assert_eq!(q.shipping, Decimal::new(200, 0));
        assert_eq!(q.tax, Decimal::new(3600, 2)); // 36.00
        assert_eq!(q.discount, Decimal::ZERO);
        assert_eq!(q.grand_total, Decimal::new(43600, 2)); // 436.00
    }

    #[test]
    fn test_free_shipping_with_coupon_scenario() {
        // cart = [{price:600, qty:2}], coupon discount=100
        let q = quote(
            &[line("600", 2)],
            Some(Decimal::new(100, 0)),
            &policy(),
        );
        assert_eq!(q.subtotal, Decimal::new(1200, 0));
        assert_eq!(q.shipping, Decimal::ZERO);
        assert_eq!(q.tax, Decimal::new(21600, 2)); // 216.00
        assert_eq!(q.grand_total, Decimal::new(131_600, 2)); // 1316.00
    }

    #[test]
    fn test_shipping_threshold_is_strict() {
        // Exactly 1000 still pays the flat fee; free shipping starts above it
        let q = quote(&[line("500", 2)], None, &policy());
        assert_eq!(q.subtotal, Decimal::new(1000, 0));
        assert_eq!(q.shipping, Decimal::new(200, 0));

        let q = quote(&[line("500.01", 2)], None, &policy());
        assert_eq!(q.shipping, Decimal::ZERO);
    }

    #[test]
    fn test_subtotal_is_exact_and_order_insensitive() {
        let a = line("19.99", 3);
        let b = line("249.50", 2);
        let c = line("5.25", 7);

        let forward = quote(&[a.clone(), b.clone(), c.clone()], None, &policy());
        let backward = quote(&[c, b, a], None, &policy());

        assert_eq!(forward, backward);
        // 59.97 + 499.00 + 36.75 = 595.72, no float drift
        assert_eq!(forward.subtotal, "595.72".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_tax_rounds_to_two_places() {
        // subtotal 33.33 -> tax 5.9994 -> 6.00
        let q = quote(&[line("33.33", 1)], None, &policy());
        assert_eq!(q.tax, Decimal::new(600, 2));
    }

    #[test]
    fn test_empty_cart_quotes_flat_shipping_only() {
        // An empty cart is never checkout-eligible, but the quote stays total
        let q = quote(&[], None, &policy());
        assert_eq!(q.subtotal, Decimal::ZERO);
        assert_eq!(q.shipping, Decimal::new(200, 0));
        assert_eq!(q.grand_total, Decimal::new(200, 0));
    }

    #[test]
    fn test_oversized_discount_clamps_to_zero() {
        let q = quote(
            &[line("100", 1)],
            Some(Decimal::new(10_000, 0)),
            &policy(),
        );
        assert_eq!(q.grand_total, Decimal::ZERO);
    }

    #[test]
    fn test_removing_coupon_restores_pre_coupon_total() {
        let lines = [line("600", 2)];
        let with_coupon = quote(&lines, Some(Decimal::new(100, 0)), &policy());
        let without = quote(&lines, None, &policy());

        assert_eq!(without.discount, Decimal::ZERO);
        assert_eq!(
            with_coupon.grand_total + Decimal::new(100, 0),
            without.grand_total
        );
    }

    #[test]
    fn test_quote_serializes_camel_case() {
        let q = quote(&[line("100", 2)], None, &policy());
        let json = serde_json::to_value(&q).unwrap();
        assert!(json.get("grandTotal").is_some());
        assert_eq!(json["grandTotal"], "436.00");
    }
}
