//! SMS service interface shared by every provider implementation.

use async_trait::async_trait;

use crate::InfrastructureError;

/// SMS service trait for sending text messages
///
/// Implementations: Twilio REST API, console mock for development.
#[async_trait]
pub trait SmsService: Send + Sync {
    /// Send an SMS message
    ///
    /// The phone number must be in E.164 format. Returns the
    /// provider-assigned message id on success.
    async fn send_sms(
        &self,
        phone_number: &str,
        message: &str,
    ) -> Result<String, InfrastructureError>;

    /// Name of the SMS provider (e.g. "twilio", "mock")
    fn provider_name(&self) -> &str;

    /// Lightweight availability check; defaults to available
    async fn is_available(&self) -> bool {
        true
    }
}
