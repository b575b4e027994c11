// Migration orchestrator for the pedidos backend
// The schema plan is embedded in the binary so the migration can run at
// service startup inside the container, with no tooling on the host.

pub mod runner;
pub mod steps;

pub use runner::{MigrationError, MigrationReport, MigrationStatus};
pub use steps::{SchemaStep, SCHEMA_VERSION, TARGET_SCHEMA};

use crate::db;
use std::error::Error;
use tracing::{error, info};

/// Configuration for migration execution
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    pub database_url: String,
    pub environment: String,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        let config = crate::app_config::config();

        Self {
            database_url: config.database_url.clone(),
            environment: config.environment.to_string(),
        }
    }
}

/// Check if migrations should run based on configuration
pub fn should_run_migrations() -> bool {
    !crate::app_config::config().disable_embedded_migrations
}

/// Run the embedded schema migration.
/// Diesel's SQLite connection is sync, so the batch runs in a blocking task.
pub async fn run_migrations(
    config: MigrationConfig,
) -> Result<MigrationReport, Box<dyn Error + Send + Sync>> {
    info!(
        "[MIGRATIONS] Starting migration process for environment: {}",
        config.environment
    );
    info!(
        "[MIGRATIONS] Target database: {}",
        db::mask_connection_string(&config.database_url)
    );

    let database_url = config.database_url.clone();

    let report = tokio::task::spawn_blocking(
        move || -> Result<MigrationReport, Box<dyn Error + Send + Sync>> {
            let mut conn = db::establish_connection(&database_url)?;
            runner::run(&mut conn).map_err(Into::into)
        },
    )
    .await
    .map_err(|e| format!("Migration task panicked: {}", e))?;

    match report {
        Ok(report) => {
            if report.already_applied || report.is_noop() {
                info!("[MIGRATIONS] ✓ Schema up to date ({})", report);
            } else {
                info!("[MIGRATIONS] ✓ {}", report);
            }
            Ok(report)
        }
        Err(e) => {
            error!("[MIGRATIONS] ✗ Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Check migration status without applying anything.
/// Useful for health checks and debugging.
pub async fn check_migration_status(
    config: MigrationConfig,
) -> Result<MigrationStatus, Box<dyn Error + Send + Sync>> {
    let database_url = config.database_url.clone();

    let status = tokio::task::spawn_blocking(
        move || -> Result<MigrationStatus, Box<dyn Error + Send + Sync>> {
            let mut conn = db::establish_connection(&database_url)?;
            runner::status(&mut conn).map_err(Into::into)
        },
    )
    .await
    .map_err(|e| format!("Status check task panicked: {}", e))??;

    Ok(status)
}
