//! Store-wide pricing policy constants.
//!
//! These mirror the platform's checkout policy so the storefront can show an
//! accurate quote before the platform independently reprices the order at
//! submission time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed pricing policy used for display-time quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// GST rate applied to the subtotal.
    pub tax_rate: Decimal,
    /// Orders with a subtotal strictly above this ship free.
    pub free_shipping_over: Decimal,
    /// Flat shipping fee below the free-shipping threshold.
    pub flat_shipping_fee: Decimal,
}

impl PricingPolicy {
    /// The platform's current policy: 18% GST, free shipping over 1000,
    /// flat 200 fee otherwise.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            tax_rate: Decimal::new(18, 2),
            free_shipping_over: Decimal::new(1000, 0),
            flat_shipping_fee: Decimal::new(200, 0),
        }
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_policy_values() {
        let p = PricingPolicy::standard();
        assert_eq!(p.tax_rate, Decimal::new(18, 2));
        assert_eq!(p.free_shipping_over, Decimal::new(1000, 0));
        assert_eq!(p.flat_shipping_fee, Decimal::new(200, 0));
    }
}
