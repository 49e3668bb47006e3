//! Adapter bridging any infra [`EmailService`] to the core
//! `EmailProviderTrait` used by the dispatcher.

use async_trait::async_trait;
use std::sync::Arc;

use ra_core::services::dispatch::traits::EmailProviderTrait;

use super::email_service::EmailService;

/// Wraps an [`EmailService`] so the core services can use it
pub struct EmailProviderAdapter {
    inner: Arc<dyn EmailService>,
}

impl EmailProviderAdapter {
    pub fn new(inner: Arc<dyn EmailService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl EmailProviderTrait for EmailProviderAdapter {
    async fn send_email(
        &self,
        address: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, String> {
        self.inner
            .send_email(address, subject, body)
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
    use crate::email::MockEmailService;

    #[tokio::test]
    async fn test_adapter_forwards_to_service() {
        let mock = Arc::new(MockEmailService::with_options(false, false));
        let adapter = EmailProviderAdapter::new(mock.clone());

        let message_id = adapter
            .send_email("driver@example.com", "subject", "body")
            .await
            .unwrap();
        assert!(message_id.starts_with("mock_"));
        assert_eq!(mock.message_count(), 1);
    }
}
