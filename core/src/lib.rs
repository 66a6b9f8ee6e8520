//! # OTP Core
//!
//! Domain layer of the one-time passcode engine.
//! This crate contains the record entity, the hashing and verification
//! services, the expiry reaper, repository interfaces and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    ConsumeReason, Digest, OtpRecord, OtpState, Salt, VerifyDecision, DIGEST_LEN, SALT_LEN,
};
pub use errors::{
    ConfigError, InputViolation, OtpError, OtpResult, StoreError, INCORRECT_PASSWORD_MESSAGE,
    INVALID_PASSWORD_TITLE,
};
pub use repositories::OtpRepository;
pub use services::{
    hash_otp, Clock, CodePolicy, ExpiredOtpReaper, IssuedOtp, OsRandomSource, OtpEngine,
    OtpHasher, RandomSource, ReaperHandle, SweepTick, Sweeper, SystemClock, VerifyOtpRequest,
    VERIFY_SUCCESS_MESSAGE,
};
