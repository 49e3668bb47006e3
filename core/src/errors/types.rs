//! Error taxonomy for the phone verification flow
//!
//! These errors are returned to callers with enough structure to render
//! a message and, where relevant, a remaining-attempts count or a
//! retry-after hint. They are never silently retried.

use thiserror::Error;

/// Phone verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Invalid phone format: {phone}")]
    InvalidPhoneFormat { phone: String },

    #[error("Invalid verification code format")]
    InvalidCodeFormat,

    #[error("Phone number has opted out of notifications")]
    OptedOut,

    #[error("Rate limit exceeded, retry in {retry_after_seconds} seconds")]
    RateLimitExceeded { retry_after_seconds: u64 },

    #[error("No active verification code found")]
    NotFound,

    #[error("Verification code expired")]
    Expired,

    #[error("Invalid verification code, {attempts_remaining} attempt(s) remaining")]
    CodeMismatch { attempts_remaining: i32 },

    #[error("Maximum verification attempts exceeded")]
    AttemptsExhausted,
}
