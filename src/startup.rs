//! Application Startup
//!
//! Wires configuration into the pool, unit of work and services.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::services::{AuthService, CredentialHasher, FeedService};
use crate::config::Settings;
use crate::infrastructure::database::{self, PgUnitOfWork};

/// Handles shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub unit_of_work: PgUnitOfWork,
    pub auth: Arc<AuthService>,
    pub feed: FeedService,
    pub settings: Arc<Settings>,
}

/// Application instance
pub struct Application {
    state: AppState,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let pool = database::create_pool(&settings.database)
            .await
            .context("failed to create database pool")?;
        tracing::info!("Database connection pool created");

        if settings.database.run_migrations {
            database::run_migrations(&pool)
                .await
                .context("failed to apply migrations")?;
            tracing::info!("Migrations applied");
        }

        let hasher = Arc::new(CredentialHasher::new(&settings.hashing)?);
        let state = AppState {
            unit_of_work: PgUnitOfWork::new(pool),
            auth: Arc::new(AuthService::new(hasher)),
            feed: FeedService::new(&settings.feed),
            settings: Arc::new(settings),
        };

        Ok(Self { state })
    }

    /// Round-trip a trivial query to confirm the database answers.
    pub async fn check_connection(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(self.state.unit_of_work.pool())
            .await
            .context("database did not answer")?;
        Ok(())
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn shutdown(self) {
        self.state.unit_of_work.pool().close().await;
        tracing::info!("Database pool closed");
    }
}
