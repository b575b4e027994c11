// Centralized configuration for the pedidos migration runner
// All env vars are read ONCE at startup into a static config

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Global application configuration loaded once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    #[cfg(test)]
    dotenv::dotenv().ok();

    AppConfig::from_env().expect("Failed to load configuration")
});

/// Accessor for the global configuration
pub fn config() -> &'static AppConfig {
    &CONFIG
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection URL (sqlite://<path>)
    pub database_url: String,
    pub environment: Environment,
    pub rust_log: String,
    /// Escape hatch to skip the embedded migration at startup
    pub disable_embedded_migrations: bool,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "test" => Environment::Test,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment: Environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .into();

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| default_database_url());

        let disable_embedded_migrations = parse_bool(
            "DISABLE_EMBEDDED_MIGRATIONS",
            env::var("DISABLE_EMBEDDED_MIGRATIONS").ok(),
        )?;

        Ok(Self {
            database_url,
            environment,
            rust_log: env::var("RUST_LOG")
                .unwrap_or_else(|_| "pedidos_migrations=info".to_string()),
            disable_embedded_migrations,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// Default SQLite location. Cloud Run only allows writes under /tmp,
/// so prefer it when present (matches the API service's own default).
fn default_database_url() -> String {
    if Path::new("/tmp").exists() {
        "sqlite:///tmp/pedidos.db".to_string()
    } else {
        "sqlite://./pedidos.db".to_string()
    }
}

fn parse_bool(name: &str, value: Option<String>) -> Result<bool, ConfigError> {
    match value {
        None => Ok(false),
        Some(v) => match v.to_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" | "" => Ok(false),
            other => Err(ConfigError::InvalidValue(
                name.to_string(),
                other.to_string(),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from("production".to_string()),
            Environment::Production
        );
        assert_eq!(
            Environment::from("PROD".to_string()),
            Environment::Production
        );
        assert_eq!(Environment::from("test".to_string()), Environment::Test);
        assert_eq!(
            Environment::from("anything-else".to_string()),
            Environment::Development
        );
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("ENVIRONMENT");
        std::env::remove_var("DISABLE_EMBEDDED_MIGRATIONS");

        let config = AppConfig::from_env().expect("config should load with defaults");
        assert!(config.database_url.starts_with("sqlite://"));
        assert_eq!(config.environment, Environment::Development);
        assert!(!config.disable_embedded_migrations);
        assert!(!config.is_production());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        std::env::set_var("DATABASE_URL", "sqlite:///tmp/test_override.db");
        std::env::set_var("ENVIRONMENT", "production");
        std::env::set_var("DISABLE_EMBEDDED_MIGRATIONS", "true");

        let config = AppConfig::from_env().expect("config should load");
        assert_eq!(config.database_url, "sqlite:///tmp/test_override.db");
        assert!(config.is_production());
        assert!(config.disable_embedded_migrations);

        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("ENVIRONMENT");
        std::env::remove_var("DISABLE_EMBEDDED_MIGRATIONS");
    }

    #[test]
    #[serial]
    fn test_invalid_bool_rejected() {
        let err = parse_bool("DISABLE_EMBEDDED_MIGRATIONS", Some("maybe".to_string()));
        assert!(err.is_err());
    }
}
