//! Shared configuration and common types for the OTP engine workspace
//!
//! This crate provides functionality used across all workspace members:
//! - Configuration types loaded from environment variables
//! - The client-facing error response structure and error codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DatabaseConfig, Environment, LogFormat, LoggingConfig, OtpConfig, ReaperConfig,
    StoreBackend,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
