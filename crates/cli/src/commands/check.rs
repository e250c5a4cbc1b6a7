//! Health-check command.
//!
//! Validates the environment the same way the server would at boot, then
//! exercises both dependencies: the platform API (a catalog read) and the
//! session store (a trivial query).

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;

use polar_scoop_storefront::api::PlatformClient;
use polar_scoop_storefront::config::StorefrontConfig;

/// Run the diagnostics. Fails on the first broken dependency.
///
/// # Errors
///
/// Returns an error describing the failing dependency.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    tracing::info!("Configuration loaded and validated");

    let platform = PlatformClient::new(&config.platform);
    let categories = platform.list_categories().await?;
    tracing::info!(
        count = categories.len(),
        base_url = %config.platform.base_url,
        "Platform API reachable"
    );

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(config.database_url.expose_secret())
        .await?;
    sqlx::query("SELECT 1").fetch_one(&pool).await?;
    tracing::info!("Session store reachable");

    Ok(())
}
