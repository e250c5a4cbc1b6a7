//! HTTP route handlers for the storefront.
//!
//! All responses are JSON; the storefront is the thin view layer over the
//! platform API, and every screen maps to one handler here.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home content (banners + highlights)
//! GET  /health                  - Health check
//!
//! # Catalog
//! GET  /products                - Product listing with filters
//! GET  /products/{id}           - Product detail
//!
//! # Cart (session-backed)
//! GET    /cart                  - Cart with quote and conflict flags
//! POST   /cart/items            - Add/replace a line
//! PUT    /cart/items/{id}       - Change quantity
//! DELETE /cart/items/{id}       - Remove a line
//! POST   /cart/coupon           - Apply a coupon (platform-validated)
//! DELETE /cart/coupon           - Remove the coupon
//!
//! # Checkout (requires auth)
//! GET  /checkout                - Quote + saved shipping + conflicts
//! POST /checkout/shipping       - Save shipping info
//! POST /checkout/payment        - Create a payment intent
//! POST /checkout/order          - Place the order
//!
//! # Orders (requires auth)
//! GET  /orders                  - Order history
//! GET  /orders/{id}             - Order detail with status projection
//! POST /orders/{id}/cancel      - Cancel (Processing only)
//! POST /orders/{id}/return      - Request a return (multipart photos)
//!
//! # Auth
//! POST /auth/login              - Login
//! POST /auth/register/initiate  - Start OTP registration
//! POST /auth/register/verify    - Confirm OTP
//! POST /auth/forgot-password    - Request reset email
//! POST /auth/reset-password     - Complete reset
//! GET  /auth/me                 - Refresh profile
//! POST /auth/logout             - Logout
//!
//! # Account (requires auth)
//! GET  /account                 - Profile + vendor application status
//!
//! # Vendor dashboard (vendor/admin role)
//! GET    /vendor/products               - Own listings
//! POST   /vendor/products               - Create listing (multipart)
//! DELETE /vendor/products/{id}          - Delete listing
//! GET    /vendor/orders                 - Orders to fulfil
//! POST   /vendor/orders/{id}/advance    - Advance along the happy path
//! POST   /vendor/orders/{id}/return-review - Approve/reject a return
//!
//! # Admin dashboard (admin role)
//! GET    /admin/orders                  - All orders
//! PUT    /admin/orders/{id}             - Set order status
//! GET    /admin/discounts               - Discount records
//! POST/PUT/DELETE /admin/categories[/{id}]
//! POST/DELETE     /admin/banners[/{id}]
//! POST/PUT/DELETE /admin/content[/{id}]
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod products;
pub mod vendor;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::middleware::{auth_rate_limiter, mutation_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register/initiate", post(auth::register_initiate))
        .route("/register/verify", post(auth::register_verify))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route("/items/{id}", put(cart::update).delete(cart::remove))
        .route("/coupon", post(cart::apply_coupon).delete(cart::remove_coupon))
        .layer(mutation_rate_limiter())
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/shipping", post(checkout::save_shipping))
        .route("/payment", post(checkout::payment))
        .route("/order", post(checkout::place_order))
        .layer(mutation_rate_limiter())
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/cancel", post(orders::cancel))
        .route("/{id}/return", post(orders::request_return))
}

/// Create the vendor dashboard router.
pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(vendor::products).post(vendor::create_product))
        .route("/products/{id}", delete(vendor::delete_product))
        .route("/orders", get(vendor::orders))
        .route("/orders/{id}/advance", post(vendor::advance_order))
        .route("/orders/{id}/return-review", post(vendor::review_return))
}

/// Create the admin dashboard router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(admin::orders))
        .route("/orders/{id}", put(admin::update_order_status))
        .route("/discounts", get(admin::discounts))
        .route("/categories", post(admin::create_category))
        .route(
            "/categories/{id}",
            put(admin::update_category).delete(admin::delete_category),
        )
        .route("/banners", post(admin::create_banner))
        .route("/banners/{id}", delete(admin::delete_banner))
        .route("/content", post(admin::create_content_item))
        .route(
            "/content/{id}",
            put(admin::update_content_item).delete(admin::delete_content_item),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home content
        .route("/", get(home::home))
        // Catalog
        .nest("/products", product_routes())
        // Cart
        .nest("/cart", cart_routes())
        // Checkout
        .nest("/checkout", checkout_routes())
        // Orders
        .nest("/orders", order_routes())
        // Account
        .route("/account", get(account::show))
        // Auth
        .nest("/auth", auth_routes())
        // Role-scoped dashboards
        .nest("/vendor", vendor_routes())
        .nest("/admin", admin_routes())
}
