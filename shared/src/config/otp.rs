//! One-time passcode policy configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Upper-case letters followed by digits
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of characters in a generated code
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Seconds a code stays valid after issuance
pub const DEFAULT_VALIDITY_SECONDS: i64 = 60;

/// Failed verifications allowed before a code is closed
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Configuration for issuing and verifying one-time passcodes
///
/// The pepper is a deployment-wide secret. It is never serialized and is
/// redacted from `Debug` output.
#[derive(Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Length `L` of every generated code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Alphabet `A` codes are drawn from
    #[serde(default = "default_alphabet")]
    pub alphabet: String,

    /// Validity window in seconds
    #[serde(default = "default_validity_seconds")]
    pub validity_seconds: i64,

    /// Maximum failed attempts per code
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Deployment-wide secret mixed into every digest
    #[serde(skip_serializing, default)]
    pub pepper: String,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            alphabet: default_alphabet(),
            validity_seconds: DEFAULT_VALIDITY_SECONDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            pepper: String::new(),
        }
    }
}

impl OtpConfig {
    /// Create a configuration with default policy and the given pepper
    pub fn new(pepper: impl Into<String>) -> Self {
        Self {
            pepper: pepper.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    ///
    /// Reads `OTP_CODE_LENGTH`, `OTP_ALPHABET`, `OTP_VALIDITY_SECONDS`,
    /// `OTP_MAX_ATTEMPTS` and `OTP_PEPPER`.
    pub fn from_env() -> Self {
        Self {
            code_length: env_or("OTP_CODE_LENGTH", DEFAULT_CODE_LENGTH),
            alphabet: std::env::var("OTP_ALPHABET").unwrap_or_else(|_| default_alphabet()),
            validity_seconds: env_or("OTP_VALIDITY_SECONDS", DEFAULT_VALIDITY_SECONDS),
            max_attempts: env_or("OTP_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS),
            pepper: std::env::var("OTP_PEPPER").unwrap_or_default(),
        }
    }

    /// Set the code length
    pub fn with_code_length(mut self, length: usize) -> Self {
        self.code_length = length;
        self
    }

    /// Set the alphabet
    pub fn with_alphabet(mut self, alphabet: impl Into<String>) -> Self {
        self.alphabet = alphabet.into();
        self
    }

    /// Set the validity window in seconds
    pub fn with_validity_seconds(mut self, seconds: i64) -> Self {
        self.validity_seconds = seconds;
        self
    }

    /// Set the maximum number of failed attempts
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Whether a pepper has been configured
    pub fn has_pepper(&self) -> bool {
        !self.pepper.is_empty()
    }
}

impl std::fmt::Debug for OtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpConfig")
            .field("code_length", &self.code_length)
            .field("alphabet", &self.alphabet)
            .field("validity_seconds", &self.validity_seconds)
            .field("max_attempts", &self.max_attempts)
            .field("pepper", &"[REDACTED]")
            .finish()
    }
}

fn default_code_length() -> usize {
    DEFAULT_CODE_LENGTH
}

fn default_alphabet() -> String {
    DEFAULT_ALPHABET.to_string()
}

fn default_validity_seconds() -> i64 {
    DEFAULT_VALIDITY_SECONDS
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_policy() {
        let config = OtpConfig::default();
        assert_eq!(config.code_length, 6);
        assert_eq!(config.alphabet, "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789");
        assert_eq!(config.validity_seconds, 60);
        assert_eq!(config.max_attempts, 3);
        assert!(!config.has_pepper());
    }

    #[test]
    fn test_debug_redacts_pepper() {
        let config = OtpConfig::new("super-secret-pepper");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-pepper"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_pepper_is_not_serialized() {
        let config = OtpConfig::new("super-secret-pepper");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("pepper"));
    }

    #[test]
    fn test_builder_methods() {
        let config = OtpConfig::new("p")
            .with_code_length(8)
            .with_alphabet("0123456789")
            .with_validity_seconds(120)
            .with_max_attempts(5);
        assert_eq!(config.code_length, 8);
        assert_eq!(config.alphabet, "0123456789");
        assert_eq!(config.validity_seconds, 120);
        assert_eq!(config.max_attempts, 5);
    }
}
