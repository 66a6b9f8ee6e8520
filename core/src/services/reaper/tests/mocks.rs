//! Sweeper double for reaper tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::{OtpError, OtpResult};
use crate::services::reaper::Sweeper;

/// Counts sweeps and optionally takes time or fails
pub struct MockSweeper {
    started: AtomicUsize,
    completed: AtomicUsize,
    delay: Duration,
    failing: AtomicBool,
}

impl MockSweeper {
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            started: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            delay,
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sweeper for MockSweeper {
    async fn sweep(&self) -> OtpResult<usize> {
        self.started.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.completed.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(OtpError::StoreFault {
                message: "mock sweep failure".to_string(),
            });
        }
        Ok(2)
    }
}
