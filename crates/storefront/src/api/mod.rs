//! Platform API client.
//!
//! # Architecture
//!
//! - The platform REST API is the source of truth - NO local sync, direct
//!   API calls for every read and write
//! - Typed response structs deserialized at the I/O boundary; nothing
//!   downstream touches raw JSON
//! - In-memory caching via `moka` for catalog and content reads (5 minute
//!   TTL); mutable state (cart, orders, auth) is never cached
//! - Authenticated calls replay the platform's session cookie verbatim;
//!   no tokens travel in headers
//!
//! # Example
//!
//! ```rust,ignore
//! use polar_scoop_storefront::api::{PlatformClient, ProductQuery};
//!
//! let client = PlatformClient::new(&config.platform);
//!
//! // Browse the catalog
//! let page = client.list_products(&ProductQuery::default()).await?;
//!
//! // Authenticate and fetch the profile
//! let (profile, session) = client.login(&email, &password).await?;
//! let me = client.me(&session).await?;
//! ```

mod cache;
pub mod types;

pub mod auth;
pub mod categories;
pub mod content;
pub mod discounts;
pub mod orders;
pub mod payment;
pub mod products;

pub use products::ProductQuery;
pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::PlatformApiConfig;

use cache::CacheValue;

/// Errors that can occur when talking to the platform API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected schema.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Session missing, expired, or insufficient (401/403).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limited by the platform.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success response. The message comes from the
    /// platform's error envelope and is user-displayable.
    #[error("{message}")]
    Platform {
        /// HTTP status code returned.
        status: u16,
        /// Human-readable message from the error body.
        message: String,
    },
}

/// Error envelope returned by the platform on failures.
///
/// Any body with a `message` field is treated as displayable text.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// =============================================================================
// PlatformSession
// =============================================================================

/// The platform's session credential, captured from `Set-Cookie` on login
/// and replayed verbatim as a `Cookie` header on authenticated calls.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PlatformSession(String);

impl PlatformSession {
    /// Build a session from an existing cookie-header value.
    #[must_use]
    pub fn new(cookie: impl Into<String>) -> Self {
        Self(cookie.into())
    }

    /// Extract the session cookies from a platform response, if any were set.
    ///
    /// Only the `name=value` pair of each cookie is kept; attributes like
    /// `Path` and `HttpOnly` are for the browser, not for replay.
    #[must_use]
    pub fn from_response(response: &reqwest::Response) -> Option<Self> {
        let pairs: Vec<&str> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(Self(pairs.join("; ")))
        }
    }

    /// The value to send as the `Cookie` header.
    #[must_use]
    pub fn cookie_header(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// PlatformClient
// =============================================================================

/// Client for the platform REST API.
///
/// Provides typed access to the catalog, cart validation, orders, content,
/// and payments. Catalog and content reads are cached for 5 minutes.
#[derive(Clone)]
pub struct PlatformClient {
    inner: Arc<PlatformClientInner>,
}

struct PlatformClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: moka::future::Cache<String, CacheValue>,
}

impl PlatformClient {
    /// Create a new platform API client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying TLS backend cannot be initialized; this is a
    /// startup-time failure, not a per-request one.
    #[must_use]
    pub fn new(config: &PlatformApiConfig) -> Self {
        let cache = moka::future::Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("HTTP client construction only fails on TLS backend misconfiguration");

        Self {
            inner: Arc::new(PlatformClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        }
    }

    /// Start a request against a platform path (e.g. `/products`).
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner
            .client
            .request(method, format!("{}{path}", self.inner.base_url))
    }

    /// Attach the platform session cookie, if present.
    fn with_session(req: RequestBuilder, session: Option<&PlatformSession>) -> RequestBuilder {
        match session {
            Some(s) => req.header(COOKIE, s.cookie_header()),
            None => req,
        }
    }

    /// Send a request and deserialize the success body.
    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let response = req.send().await?;
        Self::parse_response(response).await.map(|(body, _)| body)
    }

    /// Send a request, deserialize the success body, and capture the session
    /// cookie the platform set. Used by login and OTP verification.
    async fn execute_capturing_session<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<(T, PlatformSession), ApiError> {
        let response = req.send().await?;
        let (body, session) = Self::parse_response(response).await?;
        let session = session.ok_or_else(|| {
            ApiError::Unauthorized("platform did not establish a session".to_string())
        })?;
        Ok((body, session))
    }

    /// Common response handling: rate limits, error envelopes, JSON parsing.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<(T, Option<PlatformSession>), ApiError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let session = PlatformSession::from_response(&response);

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&response_text)
                .map_or_else(|_| format!("platform returned HTTP {status}"), |b| b.message);

            return Err(match status {
                StatusCode::NOT_FOUND => ApiError::NotFound(message),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ApiError::Unauthorized(message)
                }
                _ => {
                    tracing::error!(
                        status = %status,
                        body = %response_text.chars().take(500).collect::<String>(),
                        "Platform API returned non-success status"
                    );
                    ApiError::Platform {
                        status: status.as_u16(),
                        message,
                    }
                }
            });
        }

        match serde_json::from_str::<T>(&response_text) {
            Ok(body) => Ok((body, session)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse platform API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Look up a cached catalog/content value.
    async fn cache_get(&self, key: &str) -> Option<CacheValue> {
        self.inner.cache.get(key).await
    }

    /// Store a catalog/content value in the cache.
    async fn cache_insert(&self, key: String, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, id: &str) {
        self.inner.cache.invalidate(&format!("product:{id}")).await;
    }

    /// Invalidate all cached data.
    ///
    /// Called after admin mutations to categories, banners, or content so
    /// the storefront reflects them without waiting out the TTL.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product 64f1c2".to_string());
        assert_eq!(err.to_string(), "Not found: product 64f1c2");

        let err = ApiError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }

    #[test]
    fn test_platform_error_displays_backend_message() {
        // The platform's message is what the shopper eventually sees
        let err = ApiError::Platform {
            status: 400,
            message: "Coupon SCOOP10 has expired".to_string(),
        };
        assert_eq!(err.to_string(), "Coupon SCOOP10 has expired");
    }

    #[test]
    fn test_error_body_accepts_extra_fields() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"success":false,"message":"Invalid coupon"}"#)
                .expect("error envelope should tolerate extra fields");
        assert_eq!(body.message, "Invalid coupon");
    }

    #[test]
    fn test_platform_session_cookie_header() {
        let session = PlatformSession::new("token=abc123");
        assert_eq!(session.cookie_header(), "token=abc123");
    }
}
