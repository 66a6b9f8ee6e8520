//! Code format policy: length, alphabet, validity window and attempt budget

use chrono::Duration;
use regex::Regex;
use std::collections::HashSet;

use otp_shared::config::OtpConfig;

use crate::errors::{ConfigError, InputViolation};

use super::traits::RandomSource;

/// Longest accepted validity window (one year)
pub const MAX_VALIDITY_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Validated view of `OtpConfig` used by the engine
#[derive(Debug, Clone)]
pub struct CodePolicy {
    length: usize,
    alphabet: Vec<u8>,
    validity: Duration,
    max_attempts: u32,
    pattern: Regex,
}

impl CodePolicy {
    /// Validates `config` and builds the policy
    ///
    /// The pepper is checked here too: an engine without one must not start.
    pub fn from_config(config: &OtpConfig) -> Result<Self, ConfigError> {
        if config.code_length == 0 {
            return Err(ConfigError::ZeroCodeLength);
        }
        if config.alphabet.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        if !config.alphabet.chars().all(|c| c.is_ascii_graphic()) {
            return Err(ConfigError::NonAsciiAlphabet);
        }

        let mut seen = HashSet::new();
        for c in config.alphabet.chars() {
            if !seen.insert(c) {
                return Err(ConfigError::DuplicateSymbol(c));
            }
        }

        if config.validity_seconds <= 0 {
            return Err(ConfigError::NonPositiveValidity(config.validity_seconds));
        }
        if config.validity_seconds > MAX_VALIDITY_SECONDS {
            return Err(ConfigError::ValidityTooLong {
                seconds: config.validity_seconds,
                max: MAX_VALIDITY_SECONDS,
            });
        }
        if config.max_attempts == 0 {
            return Err(ConfigError::ZeroMaxAttempts);
        }
        if !config.has_pepper() {
            return Err(ConfigError::MissingPepper);
        }

        let class: String = config
            .alphabet
            .chars()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        let pattern = Regex::new(&format!("^[{}]+$", class))?;

        Ok(Self {
            length: config.code_length,
            alphabet: config.alphabet.as_bytes().to_vec(),
            validity: Duration::seconds(config.validity_seconds),
            max_attempts: config.max_attempts,
            pattern,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Checks a candidate code before any store access
    pub fn check_candidate(&self, candidate: &str) -> Result<(), InputViolation> {
        let actual = candidate.chars().count();
        if actual != self.length {
            return Err(InputViolation::WrongLength {
                expected: self.length,
                actual,
            });
        }
        if !self.pattern.is_match(candidate) {
            return Err(InputViolation::InvalidCharacters);
        }
        Ok(())
    }

    /// Draws a code of `length` symbols uniformly from the alphabet
    ///
    /// Uses rejection sampling so that alphabets whose size does not divide
    /// 256 carry no modulo bias.
    pub fn generate(&self, source: &dyn RandomSource) -> String {
        let size = self.alphabet.len();
        let limit = 256 - (256 % size);
        let mut code = String::with_capacity(self.length);

        while code.len() < self.length {
            let mut buf = vec![0u8; self.length - code.len()];
            source.fill(&mut buf);
            for byte in buf {
                let byte = byte as usize;
                if byte < limit {
                    code.push(self.alphabet[byte % size] as char);
                }
            }
        }

        code
    }
}
