//! Configuration module
//!
//! - `otp` - code length, alphabet, validity window, attempt budget, pepper
//! - `reaper` - cadence of the expired-code sweep
//! - `database` - MySQL connection and pool configuration
//! - `environment` - environment detection and logging configuration

pub mod database;
pub mod environment;
pub mod otp;
pub mod reaper;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::OtpConfig;
pub use reaper::ReaperConfig;

/// Which secret store implementation backs the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local store, lost on restart
    #[default]
    Memory,
    /// MySQL table via the database pool
    Mysql,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            "mysql" => Ok(StoreBackend::Mysql),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Code issuance and verification policy
    pub otp: OtpConfig,

    /// Background sweep configuration
    #[serde(default)]
    pub reaper: ReaperConfig,

    /// Secret store selection
    #[serde(default)]
    pub store: StoreBackend,

    /// Database configuration (used by the MySQL store)
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            otp: OtpConfig::default(),
            reaper: ReaperConfig::default(),
            store: StoreBackend::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            otp: OtpConfig::from_env(),
            reaper: ReaperConfig::from_env(),
            store: env_or("OTP_STORE", StoreBackend::default()),
            database: DatabaseConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }
}

/// Parse an environment variable, falling back to `default` when it is
/// missing or malformed
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
