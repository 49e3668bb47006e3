//! Phone verification service implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use ra_shared::utils::phone::{is_valid_phone, mask_phone_number, to_e164};

use crate::domain::entities::phone_verification::{
    PhoneVerification, VerificationSource, CODE_LENGTH,
};
use crate::errors::{DomainError, DomainResult, VerificationError};
use crate::repositories::opt_out::r#trait::OptOutRegistry;
use crate::repositories::verification::r#trait::{IssueOutcome, IssuePolicy, VerificationStore};
use crate::services::dispatch::traits::SmsProviderTrait;

use super::config::VerificationConfig;
use super::types::{RequestCodeResult, RequesterInfo, VerifyCodeResult};

/// Service handling phone verification through one-time SMS codes
///
/// Generic over the verification store, the opt-out registry and the
/// SMS provider so tests can inject in-memory implementations.
pub struct VerificationService<V, O, S>
where
    V: VerificationStore,
    O: OptOutRegistry,
    S: SmsProviderTrait,
{
    store: Arc<V>,
    opt_outs: Arc<O>,
    sms_provider: Arc<S>,
    config: VerificationConfig,
}

impl<V, O, S> VerificationService<V, O, S>
where
    V: VerificationStore,
    O: OptOutRegistry,
    S: SmsProviderTrait,
{
    /// Creates a new verification service with default configuration
    pub fn new(store: Arc<V>, opt_outs: Arc<O>, sms_provider: Arc<S>) -> Self {
        Self::with_config(store, opt_outs, sms_provider, VerificationConfig::default())
    }

    /// Creates a new verification service with a custom configuration
    pub fn with_config(
        store: Arc<V>,
        opt_outs: Arc<O>,
        sms_provider: Arc<S>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            store,
            opt_outs,
            sms_provider,
            config,
        }
    }

    /// Issues a verification code and sends it by SMS
    ///
    /// The phone is normalized to E.164 before any lookup, so national
    /// and international spellings of the same number share one
    /// rate-limit window.
    pub async fn request_code(
        &self,
        phone: &str,
        source: VerificationSource,
        station_id: Option<String>,
        requester: RequesterInfo,
    ) -> DomainResult<RequestCodeResult> {
        self.issue_and_send(phone, source, station_id, requester, None)
            .await
    }

    /// Issues a fresh code for a phone that already requested one
    ///
    /// Subject to the resend cooldown on top of the hourly window. The
    /// new code supersedes the previous one: verification always checks
    /// the most recently issued pending code.
    pub async fn resend_code(
        &self,
        phone: &str,
        source: VerificationSource,
        station_id: Option<String>,
        requester: RequesterInfo,
    ) -> DomainResult<RequestCodeResult> {
        let cooldown = Duration::seconds(self.config.resend_cooldown_seconds);
        self.issue_and_send(phone, source, station_id, requester, Some(cooldown))
            .await
    }

    /// Checks a user-submitted code against the latest pending
    /// verification for the phone
    ///
    /// The attempts counter is incremented on every mismatch; once it
    /// reaches the maximum the lockout is sticky and even the correct
    /// code is rejected until a new one is issued.
    pub async fn verify_code(&self, phone: &str, code: &str) -> DomainResult<VerifyCodeResult> {
        let phone = self.normalize(phone)?;
        let masked = mask_phone_number(&phone);

        if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(VerificationError::InvalidCodeFormat.into());
        }

        let verification = self
            .store
            .find_latest_pending(&phone)
            .await?
            .ok_or(VerificationError::NotFound)?;

        if verification.is_expired() {
            return Err(VerificationError::Expired.into());
        }

        if verification.attempts >= self.config.max_attempts {
            warn!(
                event = "verification_locked_out",
                phone = %masked,
                attempts = verification.attempts,
                "Verification attempted past the lockout threshold"
            );
            return Err(VerificationError::AttemptsExhausted.into());
        }

        if !verification.code_matches(code) {
            let attempts = self.store.increment_attempts(verification.id).await?;
            let remaining = (self.config.max_attempts - attempts).max(0);
            warn!(
                event = "verification_code_mismatch",
                phone = %masked,
                attempts_remaining = remaining,
                "Verification code mismatch"
            );
            return Err(VerificationError::CodeMismatch {
                attempts_remaining: remaining,
            }
            .into());
        }

        let verified_at = Utc::now();
        self.store.mark_verified(verification.id, verified_at).await?;

        info!(
            event = "phone_verified",
            phone = %masked,
            verification_id = %verification.id,
            "Phone verified"
        );

        Ok(VerifyCodeResult {
            verification_id: verification.id,
            verified_at,
        })
    }

    /// Purges unverified verification rows older than the retention
    /// period, returning the number of rows removed
    pub async fn cleanup_expired(&self) -> DomainResult<u64> {
        let cutoff = Utc::now() - Duration::days(self.config.unverified_retention_days);
        let removed = self.store.delete_unverified_older_than(cutoff).await?;
        if removed > 0 {
            info!(
                event = "verification_cleanup",
                removed, "Purged stale unverified codes"
            );
        }
        Ok(removed)
    }

    async fn issue_and_send(
        &self,
        phone: &str,
        source: VerificationSource,
        station_id: Option<String>,
        requester: RequesterInfo,
        cooldown: Option<Duration>,
    ) -> DomainResult<RequestCodeResult> {
        let phone = self.normalize(phone)?;
        let masked = mask_phone_number(&phone);

        if self.opt_outs.is_opted_out(&phone).await? {
            warn!(
                event = "verification_blocked_opt_out",
                phone = %masked,
                "Verification requested for an opted-out phone"
            );
            return Err(VerificationError::OptedOut.into());
        }

        let verification = PhoneVerification::new_with_expiration(
            phone.clone(),
            source,
            station_id,
            self.config.code_expiration_minutes,
        )
        .with_requester(requester.ip, requester.user_agent);

        let policy = IssuePolicy {
            max_per_window: self.config.requests_per_window,
            window: Duration::seconds(self.config.window_seconds),
            cooldown,
        };

        let verification = match self.store.issue(verification, &policy).await? {
            IssueOutcome::Issued(v) => v,
            IssueOutcome::RateLimited {
                retry_after_seconds,
            } => {
                warn!(
                    event = "verification_rate_limited",
                    phone = %masked,
                    retry_after_seconds,
                    "Verification request rate limited"
                );
                return Err(VerificationError::RateLimitExceeded {
                    retry_after_seconds,
                }
                .into());
            }
            IssueOutcome::CoolingDown {
                retry_after_seconds,
            } => {
                warn!(
                    event = "verification_resend_cooldown",
                    phone = %masked,
                    retry_after_seconds,
                    "Resend requested before the cooldown elapsed"
                );
                return Err(VerificationError::RateLimitExceeded {
                    retry_after_seconds,
                }
                .into());
            }
        };

        let message = format!(
            "Codul tau de verificare este {}. Expira in {} minute.",
            verification.code, self.config.code_expiration_minutes
        );

        self.sms_provider
            .send_sms(&phone, &message)
            .await
            .map_err(|e| {
                warn!(
                    event = "verification_sms_failed",
                    phone = %masked,
                    provider = self.sms_provider.provider_name(),
                    error = %e,
                    "Failed to send verification SMS"
                );
                DomainError::Provider {
                    provider: self.sms_provider.provider_name().to_string(),
                    message: e,
                }
            })?;

        info!(
            event = "verification_code_sent",
            phone = %masked,
            source = source.as_str(),
            verification_id = %verification.id,
            "Verification code sent"
        );

        Ok(RequestCodeResult {
            verification_id: verification.id,
            expires_at: verification.expires_at,
        })
    }

    fn normalize(&self, phone: &str) -> DomainResult<String> {
        if !is_valid_phone(phone) {
            return Err(VerificationError::InvalidPhoneFormat {
                phone: phone.to_string(),
            }
            .into());
        }
        to_e164(phone).ok_or_else(|| {
            VerificationError::InvalidPhoneFormat {
                phone: phone.to_string(),
            }
            .into()
        })
    }
}
