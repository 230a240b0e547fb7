//! # Warbler
//!
//! Entry point for the persistence layer:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Database connection pool and migrations

use anyhow::Result;
use tracing::info;

use warbler::config::Settings;
use warbler::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    warbler::telemetry::init_tracing();

    info!("Starting Warbler...");

    let settings = Settings::load()?;
    info!(
        environment = %settings.environment,
        max_connections = settings.database.max_connections,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;
    application.check_connection().await?;

    info!("Database ready");
    application.shutdown().await;

    Ok(())
}
