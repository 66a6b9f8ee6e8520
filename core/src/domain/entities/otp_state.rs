//! Lifecycle of an OTP record.
//!
//! A record is `Active` from issuance until it is consumed. Consumption is
//! terminal: the record is deleted and nothing re-enters `Active`.

/// Why a record left the `Active` state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeReason {
    /// The correct code was presented in time
    Verified,
    /// The failed-attempt budget ran out
    AttemptsExhausted,
    /// A verification arrived after `expires_at`
    Expired,
    /// The reaper removed it after `expires_at`
    Swept,
}

/// Lifecycle state of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpState {
    Active,
    Consumed(ConsumeReason),
}

/// Outcome of evaluating one verification attempt against a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyDecision {
    /// Correct code, in time, within budget
    Accept,
    /// `expires_at` has passed
    Expire,
    /// Budget already spent
    Exhaust,
    /// Wrong code; one failed attempt is counted and the record stays
    /// active unless that spends the budget
    CountFailure,
}

impl VerifyDecision {
    /// State the record moves to when this decision is applied
    pub fn next_state(&self) -> OtpState {
        match self {
            VerifyDecision::Accept => OtpState::Consumed(ConsumeReason::Verified),
            VerifyDecision::Expire => OtpState::Consumed(ConsumeReason::Expired),
            VerifyDecision::Exhaust => OtpState::Consumed(ConsumeReason::AttemptsExhausted),
            VerifyDecision::CountFailure => OtpState::Active,
        }
    }
}
