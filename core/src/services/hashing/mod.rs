//! Salted, peppered one-way digests of OTP codes

mod hasher;

pub use hasher::{hash_otp, OtpHasher};
