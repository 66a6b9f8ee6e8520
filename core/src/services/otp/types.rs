//! Caller-facing request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message a transport layer returns after a successful verification
pub const VERIFY_SUCCESS_MESSAGE: &str = "Successfully validated the one time password!";

/// Result of issuing a code
///
/// This is the only place the plaintext code exists after `issue` returns.
/// It is serialized for the caller but redacted from `Debug` output.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedOtp {
    /// Identifier to present together with the code
    pub id: Uuid,
    /// The plaintext code
    pub one_time_password: String,
    /// When the code stops being accepted
    #[serde(rename = "expirationDate")]
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for IssuedOtp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedOtp")
            .field("id", &self.id)
            .field("one_time_password", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Verification request as received from a transport layer
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub id: Uuid,
    pub one_time_password: String,
}

impl std::fmt::Debug for VerifyOtpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifyOtpRequest")
            .field("id", &self.id)
            .field("one_time_password", &"[REDACTED]")
            .finish()
    }
}
