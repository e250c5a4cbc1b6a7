//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//! 5. Rate limiting (governor, on auth and mutating route groups)

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod session;

pub use auth::{
    OptionalUser, RequireAdmin, RequireUser, RequireVendor, clear_login, establish_login,
    platform_session,
};
pub use rate_limit::{auth_rate_limiter, mutation_rate_limiter};
pub use request_id::request_id_middleware;
pub use session::{create_session_layer, migrate_session_store};
