// Library exports for the pedidos schema migration crate
// The API service links this to migrate its database at startup; the binary
// wraps the same entry point for manual operator runs.

pub mod app_config;
pub mod db;
pub mod migrations;
pub mod models;
pub mod schema;

// Re-export commonly used types
pub use app_config::{config, AppConfig, Environment, CONFIG};
pub use db::{establish_connection, mask_connection_string, DbError};
pub use migrations::{
    MigrationConfig, MigrationError, MigrationReport, MigrationStatus, SCHEMA_VERSION,
};
pub use models::refresh_token::{RefreshToken, RefreshTokenError};
pub use models::user::{User, UserError};

use tracing::info;

/// Bring the configured database up to the current schema version.
/// Intended to be called once during service startup, before any pool is
/// handed to request handlers.
pub async fn prepare_database() -> Result<MigrationReport, Box<dyn std::error::Error + Send + Sync>>
{
    dotenv::dotenv().ok();

    if !migrations::should_run_migrations() {
        info!("Embedded migrations disabled by configuration, skipping");
        return Ok(MigrationReport::default());
    }

    let migration_config = MigrationConfig::default();
    migrations::run_migrations(migration_config).await
}
