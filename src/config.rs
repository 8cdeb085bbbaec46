//! Application configuration from environment variables.
//!
//! | Variable                | Default                          |
//! |-------------------------|----------------------------------|
//! | `DELIVERY_CONFIG_PATH`  | `~/.storefront/delivery.json`    |
//! | `DELIVERY_BIND_HOST`    | `127.0.0.1`                      |
//! | `DELIVERY_BIND_PORT`    | `3000`                           |

use crate::delivery::DeliveryConfigStore;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub delivery_config_path: PathBuf,
    pub bind_host: String,
    pub bind_port: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load configuration, reading a `.env` file first if one exists.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

/// Parsing and validation, decoupled from the process environment.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let delivery_config_path = lookup("DELIVERY_CONFIG_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map_or_else(DeliveryConfigStore::default_path, PathBuf::from);

    let bind_host = lookup("DELIVERY_BIND_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    if bind_host.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "DELIVERY_BIND_HOST".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    let bind_port = lookup("DELIVERY_BIND_PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "DELIVERY_BIND_PORT".to_string(),
            reason: e.to_string(),
        })?;

    Ok(AppConfig {
        delivery_config_path,
        bind_host,
        bind_port,
    })
}
