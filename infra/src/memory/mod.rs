//! Process-local secret store
//!
//! Suitable for a single engine instance. Records are lost on restart.

pub mod otp_store;


pub use otp_store::InMemoryOtpStore;
