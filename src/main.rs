use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pedidos_migrations::{app_config, db, migrations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pedidos_migrations=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = app_config::config();
    info!("=== PEDIDOS SCHEMA MIGRATION ===");
    info!("Environment: {}", config.environment);
    info!(
        "Database: {}",
        db::mask_connection_string(&config.database_url)
    );

    if !migrations::should_run_migrations() {
        info!("Embedded migrations disabled by configuration, nothing to do");
        return Ok(());
    }

    let migration_config = migrations::MigrationConfig::default();
    let report = migrations::run_migrations(migration_config)
        .await
        .map_err(|e| {
            error!("✗ Migration failed: {}", e);
            anyhow::anyhow!("{}", e)
        })
        .context("schema migration aborted")?;

    info!("✓ Migration finished: {}", report);
    Ok(())
}
