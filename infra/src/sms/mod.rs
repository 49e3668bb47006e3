//! SMS provider implementations and the configuration-driven factory.

pub mod adapter;
pub mod mock_sms;
pub mod sms_service;
pub mod twilio;

pub use adapter::SmsProviderAdapter;
pub use mock_sms::MockSmsService;
pub use sms_service::SmsService;
pub use twilio::{TwilioConfig, TwilioSmsService};

use std::sync::Arc;

use crate::InfrastructureError;

/// Create an SMS service from the `SMS_PROVIDER` environment variable
///
/// Recognized values: `twilio`, `mock` (default when unset or unknown).
pub fn create_sms_service() -> Result<Arc<dyn SmsService>, InfrastructureError> {
    let provider = std::env::var("SMS_PROVIDER").unwrap_or_else(|_| "mock".to_string());

    match provider.as_str() {
        "twilio" => {
            let config = TwilioConfig::from_env()?;
            Ok(Arc::new(TwilioSmsService::new(config)?))
        }
        "mock" => Ok(Arc::new(MockSmsService::new())),
        other => {
            tracing::warn!(
                provider = other,
                "Unknown SMS provider, falling back to mock"
            );
            Ok(Arc::new(MockSmsService::new()))
        }
    }
}
