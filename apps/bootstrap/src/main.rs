//! Stockchain startup binary: applies migrations and seeds authorization data.

#![forbid(unsafe_code)]

mod bootstrap_config;

use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use stockchain_application::{AuthorizationSeedService, SeedOutcome};
use stockchain_core::{AppError, AppResult};
use stockchain_infrastructure::{Argon2PasswordHasher, PostgresAuthorizationSeedRepository};
use tracing::{error, info};

use crate::bootstrap_config::{BootstrapConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = BootstrapConfig::load()?;
    let pool = connect_pool(&config).await?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let seed_service = AuthorizationSeedService::new(
        Arc::new(PostgresAuthorizationSeedRepository::new(pool)),
        Arc::new(Argon2PasswordHasher::new()),
    );

    match seed_service.run().await {
        Ok(SeedOutcome::Completed(summary)) => {
            for (role, permissions) in &summary.role_permission_counts {
                info!(role = %role, permissions, "seeded role");
            }
            info!(
                permissions = summary.permission_count,
                users = summary.user_count,
                completed_at = %summary.completed_at,
                "stockchain-bootstrap seeded authorization data"
            );
            Ok(())
        }
        Ok(SeedOutcome::Skipped {
            existing_permissions,
        }) => {
            info!(
                existing_permissions,
                "stockchain-bootstrap found existing authorization data"
            );
            Ok(())
        }
        Err(seed_error) => {
            error!(error = %seed_error, "stockchain-bootstrap failed to seed authorization data");
            Err(seed_error)
        }
    }
}

async fn connect_pool(config: &BootstrapConfig) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.database_url.as_str())
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}
