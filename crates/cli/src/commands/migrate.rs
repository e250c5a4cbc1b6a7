//! Session-store migration command.
//!
//! The storefront keeps all of its local state in tower-sessions; the only
//! schema to manage is the sessions table itself.

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;

use polar_scoop_storefront::config::StorefrontConfig;
use polar_scoop_storefront::middleware::migrate_session_store;

/// Create the sessions table if it does not exist.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the database is
/// unreachable.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(config.database_url.expose_secret())
        .await?;

    migrate_session_store(&pool).await?;
    tracing::info!("Session store schema is up to date");

    Ok(())
}
