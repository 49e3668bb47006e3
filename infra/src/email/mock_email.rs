//! Mock email service for development and testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::InfrastructureError;

use super::email_service::EmailService;

/// Mock email service that logs instead of sending
#[derive(Clone)]
pub struct MockEmailService {
    message_count: Arc<AtomicU64>,
    simulate_failure: bool,
    console_output: bool,
}

impl MockEmailService {
    /// Create a new mock email service with console output
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
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        if self.simulate_failure {
            warn!(provider = "mock", to, "Mock email service simulating failure");
            return Err(InfrastructureError::Email(
                "Simulated email sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("--- MOCK EMAIL #{} to {} ---", count, to);
            println!("Subject: {}", subject);
            println!("{}", body);
            println!("--- message id: {} ---", message_id);
        }

        info!(
            provider = "mock",
            to,
            message_id = %message_id,
            event = "email_sent",
            "Email sent (mock)"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
