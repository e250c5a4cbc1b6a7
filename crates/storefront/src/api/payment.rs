//! Payment endpoints.
//!
//! The storefront only brokers the publishable key and the payment-intent
//! client secret; the payment widget and the processor do the rest.

use reqwest::Method;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use tracing::instrument;

use super::types::{PaymentIntent, PaymentKey};
use super::{ApiError, PlatformClient, PlatformSession};

#[derive(Serialize)]
struct ProcessBody {
    /// Amount in paise - the processor works in the smallest currency unit.
    amount: i64,
}

impl PlatformClient {
    /// Fetch the publishable key for the payment widget.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn stripe_api_key(&self) -> Result<PaymentKey, ApiError> {
        let req = self.request(Method::GET, "/payment/stripeapikey");
        self.execute(req).await
    }

    /// Create a payment intent for the quoted grand total.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Platform` if the amount cannot be expressed in
    /// paise or the processor rejects the intent.
    #[instrument(skip(self, session), fields(amount = %amount))]
    pub async fn process_payment(
        &self,
        amount: Decimal,
        session: &PlatformSession,
    ) -> Result<PaymentIntent, ApiError> {
        let paise = (amount * Decimal::new(100, 0))
            .round()
            .to_i64()
            .ok_or_else(|| ApiError::Platform {
                status: 400,
                message: format!("amount {amount} cannot be charged"),
            })?;

        let req = Self::with_session(
            self.request(Method::POST, "/payment/process")
                .json(&ProcessBody { amount: paise }),
            Some(session),
        );
        self.execute(req).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_paise_conversion() {
        let amount = Decimal::new(43600, 2); // 436.00
        let paise = (amount * Decimal::new(100, 0)).round().to_i64().unwrap();
        assert_eq!(paise, 43600);

        let amount = Decimal::new(13165, 1); // 1316.5
        let paise = (amount * Decimal::new(100, 0)).round().to_i64().unwrap();
        assert_eq!(paise, 131_650);
    }
}
