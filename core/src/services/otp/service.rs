//! OTP engine: issue, verify and sweep

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use otp_shared::config::OtpConfig;

use crate::domain::entities::otp_record::{OtpRecord, Salt, SALT_LEN};
use crate::domain::entities::otp_state::{ConsumeReason, OtpState};
use crate::errors::{ConfigError, InputViolation, OtpError, OtpResult, StoreError};
use crate::repositories::OtpRepository;
use crate::services::hashing::OtpHasher;
use crate::services::reaper::Sweeper;

use super::locks::IdLocks;
use super::policy::CodePolicy;
use super::traits::{Clock, OsRandomSource, RandomSource, SystemClock};
use super::types::IssuedOtp;

/// Orchestrates code generation, hashing, attempt accounting and expiry
///
/// Safe to share between tasks behind an `Arc`. Verifications of the same
/// identifier are serialised inside the engine; everything else runs
/// concurrently and relies on the store for consistency.
pub struct OtpEngine<R: OtpRepository, C: Clock = SystemClock> {
    /// Secret store
    repository: Arc<R>,
    /// Time source for expiry decisions
    clock: Arc<C>,
    /// Digest computation bound to the pepper
    hasher: OtpHasher,
    /// Length, alphabet, validity window and attempt budget
    policy: CodePolicy,
    /// Randomness for generated codes
    code_source: Arc<dyn RandomSource>,
    /// Randomness for per-record salts
    salt_source: Arc<dyn RandomSource>,
    /// Per-identifier verification locks
    locks: IdLocks,
}

impl<R: OtpRepository> OtpEngine<R, SystemClock> {
    /// Create an engine using the system clock and the OS random source
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `config` describes an unusable policy or
    /// carries no pepper.
    pub fn new(repository: Arc<R>, config: &OtpConfig) -> Result<Self, ConfigError> {
        Self::with_clock(repository, Arc::new(SystemClock), config)
    }
}

impl<R: OtpRepository, C: Clock> OtpEngine<R, C> {
    /// Create an engine with an explicit clock
    pub fn with_clock(
        repository: Arc<R>,
        clock: Arc<C>,
        config: &OtpConfig,
    ) -> Result<Self, ConfigError> {
        let policy = CodePolicy::from_config(config)?;

        debug!(
            code_length = policy.length(),
            alphabet_size = policy.alphabet().len(),
            validity_seconds = policy.validity().num_seconds(),
            max_attempts = policy.max_attempts(),
            "Created OTP engine"
        );

        Ok(Self {
            repository,
            clock,
            hasher: OtpHasher::new(&config.pepper),
            policy,
            code_source: Arc::new(OsRandomSource),
            salt_source: Arc::new(OsRandomSource),
            locks: IdLocks::new(),
        })
    }

    /// Replace the random sources used for codes and salts
    pub fn with_random_sources(
        mut self,
        code_source: Arc<dyn RandomSource>,
        salt_source: Arc<dyn RandomSource>,
    ) -> Self {
        self.code_source = code_source;
        self.salt_source = salt_source;
        self
    }

    /// The validated policy this engine enforces
    pub fn policy(&self) -> &CodePolicy {
        &self.policy
    }

    /// Issue a new code
    ///
    /// Generates the code and a fresh 128-bit salt, stores only the digest,
    /// and hands the plaintext back to the caller exactly once.
    pub async fn issue(&self) -> OtpResult<IssuedOtp> {
        let code = self.policy.generate(self.code_source.as_ref());

        let mut salt: Salt = [0u8; SALT_LEN];
        self.salt_source.fill(&mut salt);

        let id = Uuid::new_v4();
        let expires_at = self.clock.now() + self.policy.validity();
        let record = OtpRecord::new(id, self.hasher.digest(&salt, &code), salt, expires_at);

        self.repository
            .save(&record)
            .await
            .map_err(|e| self.store_fault("save", id, e))?;

        info!(
            otp_id = %id,
            expires_at = %expires_at,
            event = "otp_issued",
            "Issued one-time password"
        );

        Ok(IssuedOtp {
            id,
            one_time_password: code,
            expires_at,
        })
    }

    /// Verify `candidate` against the record stored under `id`
    ///
    /// Checks run in a fixed order and fail closed:
    /// 1. Input format (no store access)
    /// 2. Lookup (`NotFound`)
    /// 3. Constant-time digest comparison
    /// 4. Expiry (`Expired`, record deleted)
    /// 5. Attempt budget (`AttemptsExceeded`, record deleted)
    /// 6. Mismatch (`Mismatch`, attempt counted) or success (record deleted)
    ///
    /// A wrong code that spends the last attempt yields `AttemptsExceeded`
    /// and deletes the record. Failed attempts are counted by the store
    /// itself, so engines sharing one store never lose an increment.
    pub async fn verify(&self, id: Uuid, candidate: &str) -> OtpResult<()> {
        if id.is_nil() {
            return Err(self.invalid_input(id, InputViolation::EmptyIdentifier));
        }
        if let Err(violation) = self.policy.check_candidate(candidate) {
            return Err(self.invalid_input(id, violation));
        }

        let _guard = self.locks.acquire(id).await;

        let record = self
            .repository
            .find_by_id(id)
            .await
            .map_err(|e| self.store_fault("find_by_id", id, e))?;

        let Some(record) = record else {
            // Same hashing work as a wrong code
            self.hasher.matches_nothing(candidate);
            return Err(self.not_found(id));
        };

        let matches = self
            .hasher
            .matches(record.salt(), candidate, record.hashed_value());
        let decision = record.decide(matches, self.clock.now(), self.policy.max_attempts());

        match decision.next_state() {
            OtpState::Consumed(reason) => self.consume(id, reason).await,
            OtpState::Active => self.count_failure(id).await,
        }
    }

    /// Delete every record whose `expires_at` lies before now
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of records removed (0 when nothing expired)
    /// * `Err(OtpError::StoreFault)` - The scan or the batch delete failed
    pub async fn sweep(&self) -> OtpResult<usize> {
        let now = self.clock.now();

        let expired = self
            .repository
            .find_expired(now)
            .await
            .map_err(|e| self.sweep_fault("find_expired", e))?;

        if expired.is_empty() {
            debug!(event = "otp_sweep_completed", removed = 0, "No expired OTPs were found");
            return Ok(0);
        }

        let ids: Vec<Uuid> = expired.iter().map(OtpRecord::id).collect();
        let removed = self
            .repository
            .delete_many(&ids)
            .await
            .map_err(|e| self.sweep_fault("delete_many", e))?;

        info!(
            event = "otp_sweep_completed",
            reason = ?ConsumeReason::Swept,
            found = ids.len(),
            removed = removed,
            "Removed expired OTPs"
        );

        Ok(removed)
    }

    /// Deletes the record and maps `reason` to the caller's outcome
    async fn consume(&self, id: Uuid, reason: ConsumeReason) -> OtpResult<()> {
        let removed = self
            .repository
            .delete(id)
            .await
            .map_err(|e| self.store_fault("delete", id, e))?;

        match reason {
            ConsumeReason::Verified if !removed => {
                // Another verifier consumed the record first
                Err(self.not_found(id))
            }
            ConsumeReason::Verified => {
                info!(
                    otp_id = %id,
                    event = "otp_verified_success",
                    "One-time password verified"
                );
                Ok(())
            }
            ConsumeReason::Expired | ConsumeReason::Swept => {
                warn!(
                    otp_id = %id,
                    event = "otp_expired",
                    reason = ?reason,
                    "One-time password has expired"
                );
                Err(OtpError::Expired)
            }
            ConsumeReason::AttemptsExhausted => {
                warn!(
                    otp_id = %id,
                    event = "otp_attempts_exceeded",
                    max_attempts = self.policy.max_attempts(),
                    "Maximum verification attempts exceeded"
                );
                Err(OtpError::AttemptsExceeded)
            }
        }
    }

    /// Counts one failed attempt in the store; spending the last one closes
    /// the record
    async fn count_failure(&self, id: Uuid) -> OtpResult<()> {
        let max_attempts = self.policy.max_attempts();
        let counted = self
            .repository
            .record_failed_attempt(id, max_attempts)
            .await
            .map_err(|e| self.store_fault("record_failed_attempt", id, e))?;

        let Some(attempt_count) = counted else {
            return Err(self.not_found(id));
        };
        if attempt_count >= max_attempts {
            return self.consume(id, ConsumeReason::AttemptsExhausted).await;
        }

        let remaining_attempts = max_attempts - attempt_count;
        warn!(
            otp_id = %id,
            event = "otp_verification_failed",
            outcome = "mismatch",
            attempt_count = attempt_count,
            remaining_attempts = remaining_attempts,
            "Incorrect one-time password"
        );
        Err(OtpError::Mismatch { remaining_attempts })
    }

    fn not_found(&self, id: Uuid) -> OtpError {
        warn!(
            otp_id = %id,
            event = "otp_verification_failed",
            outcome = "not_found",
            "One-time password not found"
        );
        OtpError::NotFound
    }

    fn invalid_input(&self, id: Uuid, violation: InputViolation) -> OtpError {
        warn!(
            otp_id = %id,
            event = "otp_invalid_input",
            reason = %violation,
            "Rejected malformed verification request"
        );
        OtpError::InvalidInput { reason: violation }
    }

    fn store_fault(&self, operation: &str, id: Uuid, err: StoreError) -> OtpError {
        error!(
            otp_id = %id,
            operation = operation,
            error = %err,
            event = "otp_store_fault",
            "Secret store operation failed"
        );
        err.into()
    }

    fn sweep_fault(&self, operation: &str, err: StoreError) -> OtpError {
        error!(
            operation = operation,
            error = %err,
            event = "otp_store_fault",
            "Secret store operation failed during sweep"
        );
        err.into()
    }
}

#[async_trait]
impl<R: OtpRepository, C: Clock> Sweeper for OtpEngine<R, C> {
    async fn sweep(&self) -> OtpResult<usize> {
        OtpEngine::sweep(self).await
    }
}
