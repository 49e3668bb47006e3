//! Adapter bridging any infra [`SmsService`] to the core
//! `SmsProviderTrait` the dispatcher and verification service expect.

use async_trait::async_trait;
use std::sync::Arc;

use ra_core::services::dispatch::traits::SmsProviderTrait;

use super::sms_service::SmsService;

/// Wraps an [`SmsService`] so the core services can use it
pub struct SmsProviderAdapter {
    inner: Arc<dyn SmsService>,
}

impl SmsProviderAdapter {
    pub fn new(inner: Arc<dyn SmsService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl SmsProviderTrait for SmsProviderAdapter {
    async fn send_sms(&self, phone: &str, message: &str) -> Result<String, String> {
        self.inner
            .send_sms(phone, message)
            .await
            .map_err(|e| e.to_string())
    }

    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sms::MockSmsService;

    #[tokio::test]
    async fn test_adapter_forwards_to_service() {
        let mock = Arc::new(MockSmsService::with_options(false, false));
        let adapter = SmsProviderAdapter::new(mock.clone());

        let message_id = adapter.send_sms("+40712345678", "test").await.unwrap();
        assert!(message_id.starts_with("mock_"));
        assert_eq!(adapter.provider_name(), "mock");
        assert_eq!(mock.message_count(), 1);
    }

    #[tokio::test]
    async fn test_adapter_stringifies_errors() {
        let mock = Arc::new(MockSmsService::with_options(false, true));
        let adapter = SmsProviderAdapter::new(mock);

        let err = adapter.send_sms("+40712345678", "test").await.unwrap_err();
        assert!(err.contains("Simulated"));
    }
}
