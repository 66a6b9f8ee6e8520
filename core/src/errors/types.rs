//! Supporting error types for store faults, configuration and input checks

use thiserror::Error;

/// Failures reported by a secret store implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store returned inconsistent data: {0}")]
    Inconsistent(String),

    #[error("Store query failed: {0}")]
    Query(String),
}

/// Rejected engine or reaper configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Code length must be at least 1")]
    ZeroCodeLength,

    #[error("Alphabet must not be empty")]
    EmptyAlphabet,

    #[error("Alphabet must contain only printable ASCII characters")]
    NonAsciiAlphabet,

    #[error("Alphabet contains duplicate symbol '{0}'")]
    DuplicateSymbol(char),

    #[error("Validity window must be positive, got {0} seconds")]
    NonPositiveValidity(i64),

    #[error("Validity window of {seconds} seconds exceeds the maximum of {max} seconds")]
    ValidityTooLong { seconds: i64, max: i64 },

    #[error("Maximum attempts must be at least 1")]
    ZeroMaxAttempts,

    #[error("Pepper must be configured")]
    MissingPepper,

    #[error("Invalid candidate pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Why a verification request was rejected before touching the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputViolation {
    #[error("identifier is empty")]
    EmptyIdentifier,

    #[error("code has length {actual}, expected {expected}")]
    WrongLength { expected: usize, actual: usize },

    #[error("code contains characters outside the alphabet")]
    InvalidCharacters,
}
