//! Persisted one-time passcode record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::otp_state::VerifyDecision;

/// Salt length in bytes (128 bits)
pub const SALT_LEN: usize = 16;

/// Digest length in bytes (SHA-256)
pub const DIGEST_LEN: usize = 32;

/// Per-record random salt
pub type Salt = [u8; SALT_LEN];

/// Digest of `salt ‖ code ‖ pepper`
pub type Digest = [u8; DIGEST_LEN];

/// One issued code, as held by the secret store
///
/// Everything except `attempt_count` is fixed at creation. The plaintext
/// code is never part of the record.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    id: Uuid,
    hashed_value: Digest,
    salt: Salt,
    expires_at: DateTime<Utc>,
    attempt_count: u32,
}

impl OtpRecord {
    /// Creates a fresh record with no failed attempts
    pub fn new(id: Uuid, hashed_value: Digest, salt: Salt, expires_at: DateTime<Utc>) -> Self {
        Self {
            id,
            hashed_value,
            salt,
            expires_at,
            attempt_count: 0,
        }
    }

    /// Rebuilds a record read back from a store
    pub fn restore(
        id: Uuid,
        hashed_value: Digest,
        salt: Salt,
        expires_at: DateTime<Utc>,
        attempt_count: u32,
    ) -> Self {
        Self {
            id,
            hashed_value,
            salt,
            expires_at,
            attempt_count,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn hashed_value(&self) -> &Digest {
        &self.hashed_value
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// `true` once `expires_at` lies strictly before `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// `true` once the attempt budget has been used up
    pub fn is_exhausted(&self, max_attempts: u32) -> bool {
        self.attempt_count >= max_attempts
    }

    /// Decides the outcome of one verification attempt
    ///
    /// `matches` is the result of the constant-time digest comparison. The
    /// checks run in a fixed order: expiry closes the record regardless of
    /// the candidate, a spent budget closes it next, and a mismatch is
    /// counted against the budget by the store.
    pub fn decide(&self, matches: bool, now: DateTime<Utc>, max_attempts: u32) -> VerifyDecision {
        if self.is_expired_at(now) {
            return VerifyDecision::Expire;
        }

        if self.is_exhausted(max_attempts) {
            return VerifyDecision::Exhaust;
        }

        if !matches {
            return VerifyDecision::CountFailure;
        }

        VerifyDecision::Accept
    }

    /// Counts one failed attempt unless the budget is already spent
    ///
    /// Returns the counter afterwards. Stores call this while holding
    /// exclusive access to the record.
    pub fn count_failed_attempt(&mut self, max_attempts: u32) -> u32 {
        if self.attempt_count < max_attempts {
            self.attempt_count += 1;
        }
        self.attempt_count
    }
}

impl std::fmt::Debug for OtpRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpRecord")
            .field("id", &self.id)
            .field("hashed_value", &format_args!("{}…", hex::encode(&self.hashed_value[..4])))
            .field("salt", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("attempt_count", &self.attempt_count)
            .finish()
    }
}
