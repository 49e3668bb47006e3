//! Email service interface shared by every provider implementation.

use async_trait::async_trait;

use crate::InfrastructureError;

/// Email service trait for sending plain-text messages
///
/// Implementations: SMTP relay via lettre, console mock for
/// development.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Send an email, returning the provider-assigned message id
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError>;

    /// Name of the email provider (e.g. "smtp", "mock")
    fn provider_name(&self) -> &str;
}
