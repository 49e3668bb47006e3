//! Email provider implementations and the configuration-driven factory.

pub mod adapter;
pub mod email_service;
pub mod mock_email;
pub mod smtp;

pub use adapter::EmailProviderAdapter;
pub use email_service::EmailService;
pub use mock_email::MockEmailService;
pub use smtp::{SmtpConfig, SmtpEmailService};

use std::sync::Arc;

use crate::InfrastructureError;

/// Create an email service from the `EMAIL_PROVIDER` environment
/// variable
///
/// Recognized values: `smtp`, `mock` (default when unset or unknown).
pub fn create_email_service() -> Result<Arc<dyn EmailService>, InfrastructureError> {
    let provider = std::env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "mock".to_string());

    match provider.as_str() {
        "smtp" => {
            let config = SmtpConfig::from_env()?;
            Ok(Arc::new(SmtpEmailService::new(config)?))
        }
        "mock" => Ok(Arc::new(MockEmailService::new())),
        other => {
            tracing::warn!(
                provider = other,
                "Unknown email provider, falling back to mock"
            );
            Ok(Arc::new(MockEmailService::new()))
        }
    }
}
