//! OTP engine module
//!
//! This module provides the complete one-time passcode lifecycle:
//! - Code generation from a configurable alphabet with a CSPRNG
//! - Salted, peppered digests; the plaintext is never stored
//! - Verification with attempt accounting and expiry enforcement
//! - Batch removal of expired codes

mod locks;
mod policy;
mod service;
mod traits;
mod types;


pub use policy::CodePolicy;
pub use service::OtpEngine;
pub use traits::{Clock, OsRandomSource, RandomSource, SystemClock};
pub use types::{IssuedOtp, VerifyOtpRequest, VERIFY_SUCCESS_MESSAGE};
