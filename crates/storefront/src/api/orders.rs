//! Order endpoints.
//!
//! Every status transition happens here via a platform call; the storefront
//! never mutates an order locally.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use polar_scoop_core::{OrderId, OrderStatus};

use super::products::UploadPart;
use super::types::{Order, OrderDraft};
use super::{ApiError, PlatformClient, PlatformSession};

#[derive(Deserialize)]
struct OrdersEnvelope {
    orders: Vec<Order>,
}

#[derive(Deserialize)]
struct OrderEnvelope {
    order: Order,
}

#[derive(Serialize)]
struct StatusBody {
    status: OrderStatus,
}

impl PlatformClient {
    /// Fetch the authenticated user's orders.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the session has expired.
    #[instrument(skip(self, session))]
    pub async fn my_orders(&self, session: &PlatformSession) -> Result<Vec<Order>, ApiError> {
        let req = Self::with_session(self.request(Method::GET, "/orders/me"), Some(session));
        let envelope: OrdersEnvelope = self.execute(req).await?;
        Ok(envelope.orders)
    }

    /// Fetch a single order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the order does not exist or is not
    /// visible to this session.
    #[instrument(skip(self, session), fields(order_id = %id))]
    pub async fn get_order(
        &self,
        id: &OrderId,
        session: &PlatformSession,
    ) -> Result<Order, ApiError> {
        let req = Self::with_session(
            self.request(Method::GET, &format!("/orders/{id}")),
            Some(session),
        );
        let envelope: OrderEnvelope = self.execute(req).await?;
        Ok(envelope.order)
    }

    /// Place an order from the storefront's draft.
    ///
    /// The platform revalidates stock and reprices authoritatively; the
    /// draft totals are display figures only.
    ///
    /// # Errors
    ///
    /// Returns the platform's rejection (out of stock, failed payment) or a
    /// transport error.
    #[instrument(skip(self, draft, session))]
    pub async fn create_order(
        &self,
        draft: &OrderDraft,
        session: &PlatformSession,
    ) -> Result<Order, ApiError> {
        let req = Self::with_session(
            self.request(Method::POST, "/orders/new").json(draft),
            Some(session),
        );
        let envelope: OrderEnvelope = self.execute(req).await?;
        Ok(envelope.order)
    }

    /// Cancel an order (customer, Processing only - the platform enforces).
    ///
    /// # Errors
    ///
    /// Returns the platform's rejection if the order is past cancellation.
    #[instrument(skip(self, session), fields(order_id = %id))]
    pub async fn cancel_order(
        &self,
        id: &OrderId,
        session: &PlatformSession,
    ) -> Result<Order, ApiError> {
        let req = Self::with_session(
            self.request(Method::PUT, &format!("/orders/{id}/cancel")),
            Some(session),
        );
        let envelope: OrderEnvelope = self.execute(req).await?;
        Ok(envelope.order)
    }

    /// File a return request with supporting photos (customer, Delivered
    /// only - the platform enforces).
    ///
    /// # Errors
    ///
    /// Returns the platform's rejection or a transport error.
    #[instrument(skip(self, session, photos), fields(order_id = %id, photo_count = photos.len()))]
    pub async fn request_return(
        &self,
        id: &OrderId,
        reason: &str,
        photos: Vec<UploadPart>,
        session: &PlatformSession,
    ) -> Result<Order, ApiError> {
        let mut form = reqwest::multipart::Form::new().text("reason", reason.to_string());
        for photo in photos {
            form = form.part("photos", photo.into_part()?);
        }

        let req = Self::with_session(
            self.request(Method::POST, &format!("/orders/{id}/return"))
                .multipart(form),
            Some(session),
        );
        let envelope: OrderEnvelope = self.execute(req).await?;
        Ok(envelope.order)
    }

    /// Fetch all orders (vendor/admin listing).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for non-privileged sessions.
    #[instrument(skip(self, session))]
    pub async fn all_orders(&self, session: &PlatformSession) -> Result<Vec<Order>, ApiError> {
        let req = Self::with_session(self.request(Method::GET, "/orders/admin"), Some(session));
        let envelope: OrdersEnvelope = self.execute(req).await?;
        Ok(envelope.orders)
    }

    /// Ask the platform to move an order to `status` (vendor/admin).
    ///
    /// The platform alone decides whether the transition is legal; the
    /// storefront's transition table only scoped which button was offered.
    ///
    /// # Errors
    ///
    /// Returns the platform's rejection for an illegal transition.
    #[instrument(skip(self, session), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        session: &PlatformSession,
    ) -> Result<Order, ApiError> {
        let req = Self::with_session(
            self.request(Method::PUT, &format!("/orders/admin/{id}"))
                .json(&StatusBody { status }),
            Some(session),
        );
        let envelope: OrderEnvelope = self.execute(req).await?;
        Ok(envelope.order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_body_uses_wire_labels() {
        let body = StatusBody {
            status: OrderStatus::OutForDelivery,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "Out For Delivery");
    }
}
