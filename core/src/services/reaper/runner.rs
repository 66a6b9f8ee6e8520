//! Background task that runs the expiry sweep on a fixed period

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use otp_shared::config::ReaperConfig;

use super::Sweeper;

/// Outcome of one reaper tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepTick {
    /// The sweep ran and removed this many records
    Completed(usize),
    /// A previous sweep was still running
    Skipped,
    /// The sweep hit a store fault; the next tick retries
    Failed,
}

/// Runs `Sweeper::sweep` at most once at a time
pub struct ExpiredOtpReaper<S: Sweeper + 'static> {
    sweeper: Arc<S>,
    config: ReaperConfig,
    in_flight: AtomicBool,
}

impl<S: Sweeper + 'static> ExpiredOtpReaper<S> {
    pub fn new(sweeper: Arc<S>, config: ReaperConfig) -> Self {
        Self {
            sweeper,
            config,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a sweep is currently executing
    pub fn is_sweeping(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run a single sweep unless one is already in flight
    ///
    /// Store faults are logged and reported as `SweepTick::Failed`; they
    /// never propagate.
    pub async fn run_once(&self) -> SweepTick {
        let Some(_guard) = InFlight::try_enter(&self.in_flight) else {
            debug!(
                event = "otp_sweep_skipped",
                "Previous sweep still running, skipping tick"
            );
            return SweepTick::Skipped;
        };

        match self.sweeper.sweep().await {
            Ok(removed) => SweepTick::Completed(removed),
            Err(e) => {
                error!(
                    error = %e,
                    event = "otp_sweep_failed",
                    "Expiry sweep failed, will retry on next tick"
                );
                SweepTick::Failed
            }
        }
    }

    /// Spawn the periodic sweep loop
    ///
    /// The first sweep runs immediately. Ticks that fall due while a sweep
    /// is still running are dropped. Dropping the returned handle without
    /// calling `shutdown` also stops the loop.
    pub fn start(self: Arc<Self>) -> ReaperHandle {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        if !self.config.enabled {
            warn!(event = "otp_reaper_disabled", "Expired OTP reaper is disabled");
            return ReaperHandle { shutdown, join: None };
        }

        let period = self.config.interval();

        let join = tokio::spawn(async move {
            info!(
                interval_millis = period.as_millis() as u64,
                event = "otp_reaper_started",
                "Expired OTP reaper started"
            );

            let mut timer = tokio::time::interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break,
                    _ = timer.tick() => {
                        self.run_once().await;
                    }
                }
            }

            info!(event = "otp_reaper_stopped", "Expired OTP reaper stopped");
        });

        ReaperHandle {
            shutdown,
            join: Some(join),
        }
    }
}

/// Control handle for a started reaper
pub struct ReaperHandle {
    shutdown: watch::Sender<bool>,
    join: Option<JoinHandle<()>>,
}

impl ReaperHandle {
    /// Whether a background loop was actually spawned
    pub fn is_active(&self) -> bool {
        self.join.is_some()
    }

    /// Stop the loop, waiting for an in-flight sweep to finish first
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);

        if let Some(join) = self.join {
            if let Err(e) = join.await {
                error!(error = %e, event = "otp_reaper_join_failed", "Reaper task ended abnormally");
            }
        }
    }
}

/// Clears the in-flight flag on drop
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn try_enter(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
