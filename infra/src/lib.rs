//! # Infrastructure Layer
//!
//! Concrete implementations of the ReviAuto persistence and messaging
//! contracts:
//! - **Database**: MySQL repositories using SQLx
//! - **SMS**: Twilio REST client plus a console mock for development
//! - **Email**: SMTP delivery via lettre plus a console mock

pub mod database;
pub mod email;
pub mod sms;

pub use database::connection::DatabasePool;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// SMS provider error
    #[error("SMS service error: {0}")]
    Sms(String),

    /// Email provider error
    #[error("Email service error: {0}")]
    Email(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
