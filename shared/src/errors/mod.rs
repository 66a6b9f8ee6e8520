//! Client-facing error response structure and error codes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Error response handed to whatever transport layer calls the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Short title for the error category
    pub title: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP-style status code suggested to the transport
    pub status: u16,

    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(
        error: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        status: u16,
    ) -> Self {
        Self {
            error: error.into(),
            title: title.into(),
            message: message.into(),
            status,
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Error codes surfaced to clients
pub mod error_codes {
    pub const INVALID_INPUT: &str = "INVALID_INPUT";
    /// Shared by unknown identifiers and wrong codes
    pub const INVALID_PASSWORD: &str = "INVALID_PASSWORD";
    pub const PASSWORD_EXPIRED: &str = "PASSWORD_EXPIRED";
    pub const ATTEMPTS_EXCEEDED: &str = "ATTEMPTS_EXCEEDED";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Trait for converting errors to ErrorResponse
pub trait IntoErrorResponse {
    fn to_error_response(&self) -> ErrorResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_detail() {
        let response = ErrorResponse::new(error_codes::INVALID_INPUT, "Invalid password", "bad", 400)
            .add_detail("expected_length", 6);
        let details = response.details.unwrap();
        assert_eq!(details["expected_length"], serde_json::json!(6));
    }

    #[test]
    fn test_details_omitted_when_empty() {
        let response = ErrorResponse::new(error_codes::INTERNAL_ERROR, "Internal error", "oops", 500);
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("details"));
    }
}
