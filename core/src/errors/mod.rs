//! Engine error taxonomy and its client-facing mapping.

mod types;


pub use types::{ConfigError, InputViolation, StoreError};

use otp_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Message shared by unknown identifiers and wrong codes
pub const INCORRECT_PASSWORD_MESSAGE: &str = "The password is incorrect!";

/// Title attached to every verification failure
pub const INVALID_PASSWORD_TITLE: &str = "Invalid password";

/// Errors returned by `issue`, `verify` and `sweep`
#[derive(Error, Debug)]
pub enum OtpError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: InputViolation },

    #[error("One-time password not found")]
    NotFound,

    #[error("One-time password does not match ({remaining_attempts} attempts remaining)")]
    Mismatch { remaining_attempts: u32 },

    #[error("One-time password expired")]
    Expired,

    #[error("Maximum verification attempts exceeded")]
    AttemptsExceeded,

    #[error("Secret store fault: {message}")]
    StoreFault { message: String },
}

pub type OtpResult<T> = Result<T, OtpError>;

impl OtpError {
    /// Whether this is a verification outcome rather than a fault
    pub fn is_verification_failure(&self) -> bool {
        !matches!(self, OtpError::StoreFault { .. })
    }

    /// Error code for the client. `NotFound` and `Mismatch` share one.
    pub fn error_code(&self) -> &'static str {
        match self {
            OtpError::InvalidInput { .. } => error_codes::INVALID_INPUT,
            OtpError::NotFound | OtpError::Mismatch { .. } => error_codes::INVALID_PASSWORD,
            OtpError::Expired => error_codes::PASSWORD_EXPIRED,
            OtpError::AttemptsExceeded => error_codes::ATTEMPTS_EXCEEDED,
            OtpError::StoreFault { .. } => error_codes::INTERNAL_ERROR,
        }
    }

    /// Message safe to show to the end user
    ///
    /// Never reveals whether an identifier exists, and never includes
    /// store details.
    pub fn client_message(&self) -> String {
        match self {
            OtpError::InvalidInput {
                reason: InputViolation::WrongLength { expected, .. },
            } => format!("The password must be exactly {} characters!", expected),
            OtpError::InvalidInput { .. } | OtpError::NotFound | OtpError::Mismatch { .. } => {
                INCORRECT_PASSWORD_MESSAGE.to_string()
            }
            OtpError::Expired => {
                "The password has expired! Please generate a new password!".to_string()
            }
            OtpError::AttemptsExceeded => {
                "The password is incorrect! You exceeded the attempt limit! Please generate a new password!"
                    .to_string()
            }
            OtpError::StoreFault { .. } => {
                "An internal error occurred. Please try again later.".to_string()
            }
        }
    }

    /// HTTP-style status suggested to the transport layer
    pub fn status_code(&self) -> u16 {
        match self {
            OtpError::StoreFault { .. } => 500,
            _ => 400,
        }
    }
}

impl IntoErrorResponse for OtpError {
    fn to_error_response(&self) -> ErrorResponse {
        let title = match self {
            OtpError::StoreFault { .. } => "Internal error",
            _ => INVALID_PASSWORD_TITLE,
        };
        ErrorResponse::new(self.error_code(), title, self.client_message(), self.status_code())
    }
}

impl From<StoreError> for OtpError {
    fn from(err: StoreError) -> Self {
        OtpError::StoreFault {
            message: err.to_string(),
        }
    }
}
