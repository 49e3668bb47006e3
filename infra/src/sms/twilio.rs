//! Twilio SMS service implementation over the Messages REST API.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

use ra_shared::phone::{is_valid_international_phone, mask_phone_number};

use crate::InfrastructureError;

use super::sms_service::SmsService;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Twilio credentials and sender configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub request_timeout_secs: u64,
}

impl TwilioConfig {
    /// Build configuration from `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN`
    /// and `TWILIO_FROM_NUMBER`
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let var = |key: &str| {
            std::env::var(key)
                .map_err(|_| InfrastructureError::Config(format!("{} not set", key)))
        };

        Ok(Self {
            account_sid: var("TWILIO_ACCOUNT_SID")?,
            auth_token: var("TWILIO_AUTH_TOKEN")?,
            from_number: var("TWILIO_FROM_NUMBER")?,
            request_timeout_secs: std::env::var("TWILIO_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TwilioMessageResponse {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorResponse {
    message: Option<String>,
    code: Option<i64>,
}

/// SMS delivery through the Twilio Messages API
pub struct TwilioSmsService {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioSmsService {
    /// Create a new Twilio service from configuration
    pub fn new(config: TwilioConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| {
                InfrastructureError::Config(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE, self.config.account_sid
        )
    }
}

#[async_trait]
impl SmsService for TwilioSmsService {
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

        let params = [
            ("To", phone_number),
            ("From", self.config.from_number.as_str()),
            ("Body", message),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| InfrastructureError::Sms(format!("Twilio request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<TwilioErrorResponse>()
                .await
                .ok()
                .and_then(|e| {
                    e.message
                        .map(|m| format!("{} (code {})", m, e.code.unwrap_or(0)))
                })
                .unwrap_or_else(|| format!("HTTP {}", status));
            warn!(
                provider = "twilio",
                phone = %masked,
                status = %status,
                event = "sms_failed",
                "Twilio rejected the message"
            );
            return Err(InfrastructureError::Sms(format!(
                "Twilio error: {}",
                detail
            )));
        }

        let body: TwilioMessageResponse = response.json().await.map_err(|e| {
            InfrastructureError::Sms(format!("invalid Twilio response: {}", e))
        })?;

        info!(
            provider = "twilio",
            phone = %masked,
            message_id = %body.sid,
            event = "sms_sent",
            "SMS sent"
        );

        Ok(body.sid)
    }

    fn provider_name(&self) -> &str {
        "twilio"
    }
}
