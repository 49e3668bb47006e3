//! SMTP email delivery via lettre.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;
use uuid::Uuid;

use crate::InfrastructureError;

use super::email_service::EmailService;

/// SMTP relay configuration
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// From address, e.g. `noreply@reviauto.ro`
    pub from_address: String,
    /// Display name used in the From header
    pub from_name: String,
}

impl SmtpConfig {
    /// Build configuration from `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`,
    /// `SMTP_PASSWORD`, `SMTP_FROM_ADDRESS` and `SMTP_FROM_NAME`
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let var = |key: &str| {
            std::env::var(key)
                .map_err(|_| InfrastructureError::Config(format!("{} not set", key)))
        };

        Ok(Self {
            host: var("SMTP_HOST")?,
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            username: var("SMTP_USERNAME")?,
            password: var("SMTP_PASSWORD")?,
            from_address: var("SMTP_FROM_ADDRESS")?,
            from_name: std::env::var("SMTP_FROM_NAME")
                .unwrap_or_else(|_| "ReviAuto".to_string()),
        })
    }
}

/// Email delivery through an SMTP relay (STARTTLS)
pub struct SmtpEmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailService {
    /// Create a new SMTP service from configuration
    pub fn new(config: SmtpConfig) -> Result<Self, InfrastructureError> {
        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .map_err(|e| {
                InfrastructureError::Config(format!("invalid from address: {}", e))
            })?;

        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| InfrastructureError::Config(format!("SMTP relay: {}", e)))?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self { mailer, from })
    }
}

#[async_trait]
impl EmailService for SmtpEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|e| InfrastructureError::Email(format!("invalid recipient: {}", e)))?;

        // SMTP has no provider message id to return; generate one so
        // the notification log can still track the attempt
        let message_id = format!("smtp_{}", Uuid::new_v4());

        let email = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| InfrastructureError::Email(format!("build email: {}", e)))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| InfrastructureError::Email(format!("SMTP send: {}", e)))?;

        info!(
            provider = "smtp",
            to,
            message_id = %message_id,
            event = "email_sent",
            "Email sent"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_from_address_rejected() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "user".to_string(),
            password: "pass".to_string(),
            from_address: "not an address".to_string(),
            from_name: "ReviAuto".to_string(),
        };

        let result = SmtpEmailService::new(config);
        assert!(matches!(result, Err(InfrastructureError::Config(_))));
    }
}
