//! Domain layer containing the persisted OTP record and its lifecycle.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
