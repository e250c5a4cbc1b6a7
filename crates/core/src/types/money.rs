//! Type-safe money representation using decimal arithmetic.
//!
//! All pricing arithmetic in the storefront runs on [`rust_decimal::Decimal`]
//! so intermediate sums stay exact; rounding happens once, at display time,
//! via [`Money::rounded`].

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency_code,
        }
    }

    /// An amount in rupees (the storefront's default currency).
    #[must_use]
    pub fn rupees(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::INR)
    }

    /// The amount rounded to two decimal places (banker's rounding is not
    /// used; ties round half up, matching how totals are displayed).
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.amount
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.currency_code.symbol(), self.rounded())
    }
}

/// ISO 4217 currency codes accepted by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::INR => "\u{20b9}",
            Self::USD => "$",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_half_up() {
        let m = Money::rupees(Decimal::new(12345, 3)); // 12.345
        assert_eq!(m.rounded(), Decimal::new(1235, 2)); // 12.35
    }

    #[test]
    fn test_display_includes_symbol() {
        let m = Money::rupees(Decimal::new(43600, 2)); // 436.00
        assert_eq!(m.to_string(), "\u{20b9}436.00");

        let m = Money::new(Decimal::new(999, 2), CurrencyCode::USD);
        assert_eq!(m.to_string(), "$9.99");
    }

    #[test]
    fn test_default_currency_is_inr() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::INR);
        assert_eq!(CurrencyCode::default().code(), "INR");
    }
}
