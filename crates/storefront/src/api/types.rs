//! Typed schemas for platform API payloads.
//!
//! Every response is deserialized into one of these structs at the I/O
//! boundary; route handlers never see raw JSON. The platform speaks
//! camelCase, hence the container attributes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use polar_scoop_core::{
    BannerId, CategoryId, ContentItemId, DiscountId, Email, OrderId, OrderStatus, ProductId, Role,
    UserId, VendorApplicationStatus,
};

// =============================================================================
// Users
// =============================================================================

/// Authenticated user profile as returned by `/auth/me` and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Platform user id.
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: Email,
    /// Account role.
    #[serde(default)]
    pub role: Role,
    /// Progress of a vendor application, if any.
    #[serde(default)]
    pub vendor_status: VendorApplicationStatus,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Account creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Catalog
// =============================================================================

/// An image attached to a product or banner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// A catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Platform product id.
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Plain-text description.
    #[serde(default)]
    pub description: String,
    /// Unit price in the store currency.
    pub price: Decimal,
    /// Units currently in stock.
    pub stock: i64,
    /// Owning category.
    #[serde(default)]
    pub category: Option<CategoryId>,
    /// Average rating (0-5).
    #[serde(default)]
    pub ratings: Option<f64>,
    /// Number of reviews behind the rating.
    #[serde(default)]
    pub num_reviews: Option<i64>,
    /// Product images.
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Vendor who listed the product.
    #[serde(default)]
    pub vendor: Option<UserId>,
    /// Listing timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The first image, used as the cart-line thumbnail.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(|i| i.url.as_str())
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    /// Products on this page.
    pub products: Vec<Product>,
    /// Total products in the store.
    pub products_count: i64,
    /// Page size the platform applied.
    pub result_per_page: i64,
    /// Products matching the active filters.
    #[serde(default)]
    pub filtered_products_count: Option<i64>,
}

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Platform category id.
    #[serde(rename = "_id", alias = "id")]
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Category image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

// =============================================================================
// Discounts
// =============================================================================

/// How a discount reduces the order value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percentage off the subtotal.
    Percentage,
    /// Fixed amount off the subtotal.
    Fixed,
}

/// A discount record (admin listing).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    /// Platform discount id.
    #[serde(rename = "_id", alias = "id")]
    pub id: DiscountId,
    /// Coupon code shoppers type in.
    pub code: String,
    /// Percentage or fixed.
    pub kind: DiscountKind,
    /// Percentage points or fixed amount, per `kind`.
    pub value: Decimal,
    /// Minimum order subtotal for the code to apply.
    #[serde(default)]
    pub min_order_value: Option<Decimal>,
    /// Expiry timestamp.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of validating a coupon against the current cart.
///
/// The platform computes the concrete reduction for this cart; the
/// storefront holds only this last validation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedCoupon {
    /// The validated code.
    pub code: String,
    /// Amount the platform will take off this cart.
    pub amount: Decimal,
}

// =============================================================================
// Orders
// =============================================================================

/// Shipping destination collected at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// State.
    pub state: String,
    /// Country.
    pub country: String,
    /// Postal code.
    pub pin_code: String,
    /// Contact phone number.
    pub phone_no: String,
}

/// Snapshot of one purchased product inside an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product purchased.
    pub product: ProductId,
    /// Name at purchase time.
    pub name: String,
    /// Unit price at purchase time.
    pub price: Decimal,
    /// Units purchased.
    pub quantity: u32,
    /// Thumbnail at purchase time.
    #[serde(default)]
    pub image: Option<String>,
}

/// Payment reference attached to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    /// Payment processor reference id.
    pub id: String,
    /// Processor-reported status (e.g. "succeeded").
    pub status: String,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Platform order id.
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,
    /// Purchased items snapshot.
    pub order_items: Vec<OrderItem>,
    /// Destination.
    pub shipping_info: ShippingInfo,
    /// Payment reference.
    pub payment_info: PaymentInfo,
    /// Items subtotal the platform priced.
    pub items_price: Decimal,
    /// Tax the platform priced.
    pub tax_price: Decimal,
    /// Shipping the platform priced.
    pub shipping_price: Decimal,
    /// Discount the platform applied.
    #[serde(default)]
    pub discount: Decimal,
    /// Grand total the platform priced.
    pub total_price: Decimal,
    /// Authoritative lifecycle status.
    #[serde(rename = "orderStatus")]
    pub status: OrderStatus,
    /// Purchasing user (present on admin/vendor listings).
    #[serde(default)]
    pub user: Option<UserId>,
    /// Placement timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Delivery timestamp, once delivered.
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Request body for placing an order.
///
/// The pricing fields are the storefront's display quote; the platform
/// recomputes and authoritatively prices the order on receipt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Destination.
    pub shipping_info: ShippingInfo,
    /// Items being purchased.
    pub order_items: Vec<OrderItem>,
    /// Payment reference from the processor.
    pub payment_info: PaymentInfo,
    /// Quoted subtotal.
    pub items_price: Decimal,
    /// Quoted tax.
    pub tax_price: Decimal,
    /// Quoted shipping.
    pub shipping_price: Decimal,
    /// Quoted discount.
    pub discount: Decimal,
    /// Quoted grand total.
    pub total_price: Decimal,
    /// Coupon code backing the discount, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

// =============================================================================
// Content
// =============================================================================

/// A homepage banner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    /// Platform banner id.
    #[serde(rename = "_id", alias = "id")]
    pub id: BannerId,
    /// Headline.
    pub title: String,
    /// Banner image URL.
    pub image_url: String,
    /// Click-through link.
    #[serde(default)]
    pub link: Option<String>,
}

/// A typed content block (announcements, FAQ entries, flavour stories).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Platform content id.
    #[serde(rename = "_id", alias = "id")]
    pub id: ContentItemId,
    /// Content type discriminator (e.g. "faq", "announcement").
    #[serde(rename = "type")]
    pub kind: String,
    /// Title.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub body: Option<String>,
    /// Illustration URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

// =============================================================================
// Payments
// =============================================================================

/// Publishable key for the payment widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentKey {
    /// Stripe publishable key.
    pub stripe_api_key: String,
}

/// A created payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    /// Client secret the payment widget confirms against.
    pub client_secret: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_platform_shape() {
        let json = r#"{
            "_id": "64f1c2aa9d3e",
            "name": "Alphonso Mango Kulfi",
            "description": "Slow-churned kulfi",
            "price": 249.5,
            "stock": 40,
            "category": "cat-kulfi",
            "ratings": 4.6,
            "numReviews": 18,
            "images": [{"url": "https://cdn.polarscoop.in/kulfi.jpg"}],
            "vendor": "vend-01"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "64f1c2aa9d3e");
        assert_eq!(product.price, Decimal::new(2495, 1));
        assert_eq!(product.stock, 40);
        assert_eq!(product.thumbnail(), Some("https://cdn.polarscoop.in/kulfi.jpg"));
    }

    #[test]
    fn test_product_tolerates_missing_optionals() {
        let json = r#"{"_id": "p1", "name": "Bare", "price": 10, "stock": 0}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.images.is_empty());
        assert!(product.category.is_none());
        assert!(product.thumbnail().is_none());
    }

    #[test]
    fn test_order_status_field_rename() {
        let json = r#"{
            "_id": "ord-1",
            "orderItems": [],
            "shippingInfo": {
                "address": "12 MG Road", "city": "Pune", "state": "MH",
                "country": "India", "pinCode": "411001", "phoneNo": "9999999999"
            },
            "paymentInfo": {"id": "pi_123", "status": "succeeded"},
            "itemsPrice": 1200, "taxPrice": 216, "shippingPrice": 0,
            "totalPrice": 1316, "orderStatus": "Out For Delivery"
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, polar_scoop_core::OrderStatus::OutForDelivery);
        assert_eq!(order.discount, Decimal::ZERO);
        assert_eq!(order.total_price, Decimal::new(1316, 0));
    }

    #[test]
    fn test_content_item_type_discriminator() {
        let json = r#"{"_id": "c1", "type": "faq", "title": "Is it eggless?"}"#;
        let item: ContentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, "faq");
        assert!(item.body.is_none());
    }

    #[test]
    fn test_order_draft_serializes_camel_case() {
        let draft = OrderDraft {
            shipping_info: ShippingInfo {
                address: "12 MG Road".into(),
                city: "Pune".into(),
                state: "MH".into(),
                country: "India".into(),
                pin_code: "411001".into(),
                phone_no: "9999999999".into(),
            },
            order_items: vec![],
            payment_info: PaymentInfo {
                id: "pi_123".into(),
                status: "succeeded".into(),
            },
            items_price: Decimal::new(200, 0),
            tax_price: Decimal::new(36, 0),
            shipping_price: Decimal::new(200, 0),
            discount: Decimal::ZERO,
            total_price: Decimal::new(436, 0),
            coupon_code: None,
        };

        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("shippingInfo").is_some());
        assert!(json.get("itemsPrice").is_some());
        assert!(json.get("couponCode").is_none());
        assert_eq!(json["shippingInfo"]["pinCode"], "411001");
    }
}
