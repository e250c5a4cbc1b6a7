//! Integration tests for Polar Scoop.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the session-store database and the storefront
//! ps-cli migrate
//! cargo run -p polar-scoop-storefront
//!
//! # Run integration tests against it
//! cargo test -p polar-scoop-integration-tests -- --ignored
//! ```
//!
//! The tests drive a running storefront over HTTP with a cookie-holding
//! client, the way a browser session would. They are `#[ignore]`d because
//! they need the storefront, its session store, and a platform API (or a
//! stub of one) to be up.

use reqwest::Client;

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

/// Create a client that holds session cookies across requests, like a
/// browser tab.
///
/// # Panics
///
/// Panics if the client cannot be constructed; tests cannot proceed
/// without one.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
