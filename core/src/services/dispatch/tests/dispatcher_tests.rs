//! Unit tests for the channel dispatcher

use std::sync::Arc;
use std::time::Duration;

use crate::services::dispatch::templates::TemplateVars;
use crate::services::dispatch::ChannelDispatcher;

use super::mocks::{MockEmailProvider, MockSmsProvider};

fn vars() -> TemplateVars {
    TemplateVars {
        plate: "B123ABC".to_string(),
        doc_type: "ITP".to_string(),
        days_left: 3,
        expiry_date: "2025-03-15".to_string(),
    }
}

fn dispatcher(
    email: Arc<MockEmailProvider>,
    sms: Arc<MockSmsProvider>,
) -> ChannelDispatcher<MockEmailProvider, MockSmsProvider> {
    ChannelDispatcher::new(email, sms, Duration::from_secs(2))
}

#[tokio::test]
async fn test_send_sms_success() {
    let email = Arc::new(MockEmailProvider::new(false));
    let sms = Arc::new(MockSmsProvider::new(false));
    let dispatcher = dispatcher(email, sms.clone());

    let outcome = dispatcher.send_sms("+40712345678", 3, &vars()).await;

    assert!(outcome.success);
    assert_eq!(outcome.provider, "mock-sms");
    assert!(outcome.provider_message_id.is_some());
    assert!(outcome.error.is_none());
    assert_eq!(sms.sent_count(), 1);
    // the 3-day SMS variant was selected and rendered
    let message = sms.last_message().unwrap();
    assert!(message.contains("B123ABC"));
    assert!(message.contains("3 zile"));
    assert_eq!(outcome.rendered_message, message);
}

#[tokio::test]
async fn test_send_email_renders_subject_and_body() {
    let email = Arc::new(MockEmailProvider::new(false));
    let sms = Arc::new(MockSmsProvider::new(false));
    let dispatcher = dispatcher(email.clone(), sms);

    let outcome = dispatcher
        .send_email("driver@example.com", 1, &vars())
        .await;

    assert!(outcome.success);
    let sent = email.sent.lock().unwrap();
    let (address, subject, body) = sent.first().unwrap().clone();
    assert_eq!(address, "driver@example.com");
    assert!(subject.contains("maine"));
    assert!(body.contains("B123ABC"));
    assert_eq!(outcome.rendered_message, body);
}

#[tokio::test]
async fn test_provider_failure_becomes_failed_outcome() {
    let email = Arc::new(MockEmailProvider::new(true));
    let sms = Arc::new(MockSmsProvider::new(true));
    let dispatcher = dispatcher(email, sms);

    let sms_outcome = dispatcher.send_sms("+40712345678", 7, &vars()).await;
    assert!(!sms_outcome.success);
    assert_eq!(sms_outcome.error.as_deref(), Some("SMS provider error"));
    assert!(sms_outcome.provider_message_id.is_none());

    let email_outcome = dispatcher
        .send_email("driver@example.com", 7, &vars())
        .await;
    assert!(!email_outcome.success);
    assert_eq!(
        email_outcome.error.as_deref(),
        Some("email provider error")
    );
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let email = Arc::new(MockEmailProvider::new(false));
    let sms = Arc::new(MockSmsProvider::with_delay(Duration::from_secs(60)));
    let dispatcher = ChannelDispatcher::new(email, sms.clone(), Duration::from_millis(50));

    let outcome = dispatcher.send_sms("+40712345678", 3, &vars()).await;

    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("timed out"));
    // the provider never recorded a completed send
    assert_eq!(sms.sent_count(), 0);
}

#[tokio::test]
async fn test_unknown_interval_uses_fallback_template() {
    let email = Arc::new(MockEmailProvider::new(false));
    let sms = Arc::new(MockSmsProvider::new(false));
    let dispatcher = dispatcher(email, sms.clone());

    let outcome = dispatcher
        .send_sms(
            "+40712345678",
            14,
            &TemplateVars {
                days_left: 14,
                ..vars()
            },
        )
        .await;

    assert!(outcome.success);
    assert!(sms.last_message().unwrap().contains("14 zile"));
}
