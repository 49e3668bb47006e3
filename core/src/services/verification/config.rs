//! Configuration for the verification service

use crate::domain::entities::phone_verification::{
    CODE_EXPIRATION_MINUTES, MAX_ATTEMPTS, REQUEST_LIMIT_PER_HOUR, RESEND_COOLDOWN_SECONDS,
    UNVERIFIED_RETENTION_DAYS,
};

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Number of minutes before a verification code expires
    pub code_expiration_minutes: i64,
    /// Maximum number of verification attempts before sticky lockout
    pub max_attempts: i32,
    /// Maximum issuances per phone in the trailing window
    pub requests_per_window: u32,
    /// Rate-limit window in seconds
    pub window_seconds: i64,
    /// Minimum seconds between issuances for resend_code
    pub resend_cooldown_seconds: i64,
    /// Days after which unverified rows are purged by cleanup
    pub unverified_retention_days: i64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: CODE_EXPIRATION_MINUTES,
            max_attempts: MAX_ATTEMPTS,
            requests_per_window: REQUEST_LIMIT_PER_HOUR,
            window_seconds: 3600,
            resend_cooldown_seconds: RESEND_COOLDOWN_SECONDS,
            unverified_retention_days: UNVERIFIED_RETENTION_DAYS,
        }
    }
}
