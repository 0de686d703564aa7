//! Configuration for the OTP service

/// Timing policy for verification codes
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Lifetime of a code, in seconds
    pub code_ttl_seconds: u64,
    /// Minimum spacing between two code requests for one number, in seconds
    pub resend_cooldown_seconds: u64,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: 600,
            resend_cooldown_seconds: 60,
        }
    }
}
