//! SHA-256 digest over `salt ‖ code ‖ pepper`
//!
//! The input order is fixed. The salt has a fixed length and every code has
//! the policy length, so the concatenation is unambiguous.

use constant_time_eq::constant_time_eq_32;
use sha2::{Digest as _, Sha256};

use crate::domain::entities::otp_record::{Digest, DIGEST_LEN, SALT_LEN};

/// Computes `SHA-256(salt ‖ candidate ‖ pepper)`
pub fn hash_otp(salt: &[u8], candidate: &str, pepper: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(candidate.as_bytes());
    hasher.update(pepper);

    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

/// Hasher bound to the deployment pepper
#[derive(Clone)]
pub struct OtpHasher {
    pepper: Vec<u8>,
}

impl OtpHasher {
    pub fn new(pepper: impl AsRef<[u8]>) -> Self {
        Self {
            pepper: pepper.as_ref().to_vec(),
        }
    }

    pub fn digest(&self, salt: &[u8], candidate: &str) -> Digest {
        hash_otp(salt, candidate, &self.pepper)
    }

    /// Recomputes the digest for `candidate` and compares it in constant time
    pub fn matches(&self, salt: &[u8], candidate: &str, expected: &Digest) -> bool {
        constant_time_eq_32(&self.digest(salt, candidate), expected)
    }

    /// Hashes and compares `candidate` against a placeholder record
    ///
    /// Used when no record exists, so a lookup miss costs the same hashing
    /// work as a wrong code. Always returns false.
    pub fn matches_nothing(&self, candidate: &str) -> bool {
        let placeholder: Digest = [0xFF; DIGEST_LEN];
        let equal = self.matches(&[0u8; SALT_LEN], candidate, &placeholder);
        std::hint::black_box(equal);
        false
    }
}

impl std::fmt::Debug for OtpHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpHasher").field("pepper", &"[REDACTED]").finish()
    }
}
