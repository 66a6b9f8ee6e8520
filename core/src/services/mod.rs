//! Business services containing the OTP lifecycle logic.

pub mod hashing;
pub mod otp;
pub mod reaper;

// Re-export commonly used types
pub use hashing::{hash_otp, OtpHasher};
pub use otp::{
    Clock, CodePolicy, IssuedOtp, OsRandomSource, OtpEngine, RandomSource, SystemClock,
    VerifyOtpRequest, VERIFY_SUCCESS_MESSAGE,
};
pub use reaper::{ExpiredOtpReaper, ReaperHandle, SweepTick, Sweeper};
