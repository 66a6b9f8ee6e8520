//! MySQL repository implementations

mod otp_repository_impl;

pub use otp_repository_impl::MySqlOtpRepository;
