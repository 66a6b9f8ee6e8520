//! Domain entities representing core business objects.

pub mod otp_record;
pub mod otp_state;


// Re-export commonly used types
pub use otp_record::{Digest, OtpRecord, Salt, DIGEST_LEN, SALT_LEN};
pub use otp_state::{ConsumeReason, OtpState, VerifyDecision};
