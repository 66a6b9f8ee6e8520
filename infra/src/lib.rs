//! # Infrastructure Layer
//!
//! Concrete implementations behind the OTP engine's ports:
//! - **Memory**: process-local secret store
//! - **Database**: MySQL secret store and connection pool using SQLx
//! - **Logging**: tracing subscriber setup driven by `LoggingConfig`
//!
//! ## Features
//!
//! - `mysql`: Enable the MySQL secret store (default)

use otp_shared::config::{AppConfig, Environment};

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// In-memory secret store
pub mod memory;

/// Tracing subscriber initialization
pub mod logging;

pub use memory::InMemoryOtpStore;

/// Load application configuration from the environment
///
/// Reads `.env` first, then the environment-specific file
/// (`.env.development`, `.env.staging`, `.env.production`). Variables already
/// set in the process environment always win.
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    dotenvy::dotenv().ok();
    dotenvy::from_filename(Environment::from_env().env_file()).ok();

    let config = AppConfig::from_env();

    if !config.otp.has_pepper() {
        return Err(InfrastructureError::Config(
            "OTP_PEPPER must be set".to_string(),
        ));
    }

    Ok(config)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}
