//! Expired-code reaper
//!
//! Periodically removes records whose validity window has closed so the
//! store does not accumulate codes nobody will ever verify.

mod runner;

#[cfg(test)]
mod tests;

use async_trait::async_trait;

use crate::errors::OtpResult;

pub use runner::{ExpiredOtpReaper, ReaperHandle, SweepTick};

/// Anything that can run one expiry sweep
#[async_trait]
pub trait Sweeper: Send + Sync {
    /// Remove expired records and return how many were deleted
    async fn sweep(&self) -> OtpResult<usize>;
}
