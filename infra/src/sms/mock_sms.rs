//! Mock SMS service for development and testing.
//!
//! Logs messages instead of sending them, tracks a counter and can
//! simulate failures.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use ra_shared::phone::{is_valid_international_phone, mask_phone_number};

use crate::InfrastructureError;

use super::sms_service::SmsService;

/// Mock SMS service
#[derive(Clone)]
pub struct MockSmsService {
    message_count: Arc<AtomicU64>,
    simulate_failure: bool,
    console_output: bool,
}

impl MockSmsService {
    /// Create a new mock SMS service with console output
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    /// Create a mock service with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure,
            console_output,
        }
    }

    /// Total number of messages sent
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Reset the message counter
    pub fn reset_counter(&self) {
        self.message_count.store(0, Ordering::SeqCst);
    }
}

impl Default for MockSmsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsService for MockSmsService {
    async fn send_sms(
        &self,
        phone_number: &str,
        message: &str,
    ) -> Result<String, InfrastructureError> {
        let masked = mask_phone_number(phone_number);

        if !is_valid_international_phone(phone_number) {
            return Err(InfrastructureError::Sms(format!(
                "Invalid phone number format: {}",
                masked
            )));
        }

        if self.simulate_failure {
            warn!(
                provider = "mock",
                phone = %masked,
                "Mock SMS service simulating failure"
            );
            return Err(InfrastructureError::Sms(
                "Simulated SMS sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("--- MOCK SMS #{} to {} ---", count, phone_number);
            println!("{}", message);
            println!("--- message id: {} ---", message_id);
        }

        info!(
            provider = "mock",
            phone = %masked,
            message_id = %message_id,
            message_length = message.len(),
            event = "sms_sent",
            "SMS sent (mock)"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn is_available(&self) -> bool {
        !self.simulate_failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_success() {
        let service = MockSmsService::with_options(false, false);
        let message_id = service
            .send_sms("+40712345678", "Codul tau este 123456")
            .await
            .unwrap();

        assert!(message_id.starts_with("mock_"));
        assert_eq!(service.message_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_phone_rejected() {
        let service = MockSmsService::with_options(false, false);
        let result = service.send_sms("0712345678", "test").await;

        assert!(matches!(result, Err(InfrastructureError::Sms(_))));
        assert_eq!(service.message_count(), 0);
    }

    #[tokio::test]
    async fn test_simulated_failure() {
        let service = MockSmsService::with_options(false, true);
        let result = service.send_sms("+40712345678", "test").await;

        assert!(result.is_err());
        assert!(!service.is_available().await);
    }

    #[tokio::test]
    async fn test_counter() {
        let service = MockSmsService::with_options(false, false);
        for _ in 0..3 {
            service.send_sms("+40712345678", "test").await.unwrap();
        }
        assert_eq!(service.message_count(), 3);

        service.reset_counter();
        assert_eq!(service.message_count(), 0);
    }
}
