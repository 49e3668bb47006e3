//! Traits for outbound provider integration
//!
//! Infrastructure adapters implement these for the concrete providers
//! (Twilio, SMTP, mocks). Errors cross the seam as strings; the
//! dispatcher folds them into failed outcomes.

use async_trait::async_trait;

/// Trait for SMS provider integration
#[async_trait]
pub trait SmsProviderTrait: Send + Sync {
    /// Send an SMS, returning the provider-assigned message id
    async fn send_sms(&self, phone: &str, message: &str) -> Result<String, String>;

    /// Provider name recorded in notification logs
    fn provider_name(&self) -> &str;
}

/// Trait for email provider integration
#[async_trait]
pub trait EmailProviderTrait: Send + Sync {
    /// Send an email, returning the provider-assigned message id
    async fn send_email(
        &self,
        address: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, String>;

    /// Provider name recorded in notification logs
    fn provider_name(&self) -> &str;
}
