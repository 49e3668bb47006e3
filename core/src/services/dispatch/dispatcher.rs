//! Channel dispatcher: renders one message, sends it through one
//! provider, and reports the outcome without ever propagating failures.

use std::sync::Arc;
use std::time::Duration;

use ra_shared::utils::phone::mask_phone_number;

use super::templates::{TemplateCatalog, TemplateVars};
use super::traits::{EmailProviderTrait, SmsProviderTrait};

/// Default per-call provider timeout in seconds
pub const DEFAULT_DISPATCH_TIMEOUT_SECS: u64 = 10;

/// Outcome of one dispatch attempt
///
/// Failures (provider errors, timeouts) are folded in here; the
/// dispatcher never returns `Err`, so one slow or broken channel cannot
/// abort sibling attempts or sibling reminders.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// Whether the provider accepted the message
    pub success: bool,
    /// Provider that handled the attempt
    pub provider: String,
    /// Provider-assigned message id on success
    pub provider_message_id: Option<String>,
    /// Error detail on failure
    pub error: Option<String>,
    /// The fully rendered message that was (or would have been) sent
    pub rendered_message: String,
}

/// Dispatches one message through one channel
pub struct ChannelDispatcher<E, S>
where
    E: EmailProviderTrait,
    S: SmsProviderTrait,
{
    email_provider: Arc<E>,
    sms_provider: Arc<S>,
    templates: TemplateCatalog,
    call_timeout: Duration,
}

impl<E, S> ChannelDispatcher<E, S>
where
    E: EmailProviderTrait,
    S: SmsProviderTrait,
{
    /// Create a new dispatcher with the default template catalog
    pub fn new(email_provider: Arc<E>, sms_provider: Arc<S>, call_timeout: Duration) -> Self {
        Self::with_templates(
            email_provider,
            sms_provider,
            TemplateCatalog::default(),
            call_timeout,
        )
    }

    /// Create a new dispatcher with a custom template catalog
    pub fn with_templates(
        email_provider: Arc<E>,
        sms_provider: Arc<S>,
        templates: TemplateCatalog,
        call_timeout: Duration,
    ) -> Self {
        Self {
            email_provider,
            sms_provider,
            templates,
            call_timeout,
        }
    }

    /// Render and send an SMS for the matched interval
    pub async fn send_sms(
        &self,
        phone: &str,
        interval: u32,
        vars: &TemplateVars,
    ) -> DispatchOutcome {
        let message = self.templates.sms_for(interval).render_body(vars);
        let provider = self.sms_provider.provider_name().to_string();

        let result = tokio::time::timeout(
            self.call_timeout,
            self.sms_provider.send_sms(phone, &message),
        )
        .await;

        self.finish(
            result,
            provider,
            message,
            &mask_phone_number(phone),
            "sms",
        )
    }

    /// Render and send an email for the matched interval
    pub async fn send_email(
        &self,
        address: &str,
        interval: u32,
        vars: &TemplateVars,
    ) -> DispatchOutcome {
        let template = self.templates.email_for(interval);
        let subject = template.render_subject(vars);
        let body = template.render_body(vars);
        let provider = self.email_provider.provider_name().to_string();

        let result = tokio::time::timeout(
            self.call_timeout,
            self.email_provider.send_email(address, &subject, &body),
        )
        .await;

        self.finish(result, provider, body, address, "email")
    }

    fn finish(
        &self,
        result: Result<Result<String, String>, tokio::time::error::Elapsed>,
        provider: String,
        rendered_message: String,
        recipient: &str,
        channel: &str,
    ) -> DispatchOutcome {
        match result {
            Ok(Ok(message_id)) => {
                tracing::info!(
                    channel = channel,
                    provider = %provider,
                    recipient = recipient,
                    message_id = %message_id,
                    event = "dispatch_sent",
                    "Notification dispatched"
                );
                DispatchOutcome {
                    success: true,
                    provider,
                    provider_message_id: Some(message_id),
                    error: None,
                    rendered_message,
                }
            }
            Ok(Err(error)) => {
                tracing::warn!(
                    channel = channel,
                    provider = %provider,
                    recipient = recipient,
                    error = %error,
                    event = "dispatch_failed",
                    "Notification dispatch failed"
                );
                DispatchOutcome {
                    success: false,
                    provider,
                    provider_message_id: None,
                    error: Some(error),
                    rendered_message,
                }
            }
            Err(_) => {
                let error = format!(
                    "provider call timed out after {}s",
                    self.call_timeout.as_secs()
                );
                tracing::warn!(
                    channel = channel,
                    provider = %provider,
                    recipient = recipient,
                    timeout_secs = self.call_timeout.as_secs(),
                    event = "dispatch_timeout",
                    "Notification dispatch timed out"
                );
                DispatchOutcome {
                    success: false,
                    provider,
                    provider_message_id: None,
                    error: Some(error),
                    rendered_message,
                }
            }
        }
    }
}
