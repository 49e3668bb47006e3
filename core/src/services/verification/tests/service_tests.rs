//! Unit tests for the verification service

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::entities::phone_verification::{
    PhoneVerification, VerificationSource, MAX_ATTEMPTS,
};
use crate::errors::{DomainError, VerificationError};
use crate::repositories::{MockOptOutRegistry, MockVerificationStore};
use crate::services::verification::{RequesterInfo, VerificationService};

use super::mocks::MockSmsProvider;

const PHONE: &str = "+40712345678";

type Service = VerificationService<MockVerificationStore, MockOptOutRegistry, MockSmsProvider>;

fn build_service() -> (Arc<MockVerificationStore>, Arc<MockSmsProvider>, Service) {
    build_service_with(MockOptOutRegistry::new(), false)
}

fn build_service_with(
    opt_outs: MockOptOutRegistry,
    sms_fails: bool,
) -> (Arc<MockVerificationStore>, Arc<MockSmsProvider>, Service) {
    let store = Arc::new(MockVerificationStore::new());
    let sms = Arc::new(MockSmsProvider::new(sms_fails));
    let service = VerificationService::new(store.clone(), Arc::new(opt_outs), sms.clone());
    (store, sms, service)
}

fn verification_error(err: DomainError) -> VerificationError {
    match err {
        DomainError::Verification(e) => e,
        other => panic!("expected verification error, got {other:?}"),
    }
}

async fn request(service: &Service) -> crate::services::verification::RequestCodeResult {
    service
        .request_code(PHONE, VerificationSource::Kiosk, None, RequesterInfo::default())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_request_code_sends_sms() {
    let (store, sms, service) = build_service();

    let result = request(&service).await;

    let stored = store.get(result.verification_id).await.unwrap();
    assert_eq!(stored.phone, PHONE);
    assert_eq!(stored.attempts, 0);
    assert!(!stored.verified);
    assert_eq!(result.expires_at, stored.expires_at);

    let (to, message) = sms.last_send().unwrap();
    assert_eq!(to, PHONE);
    assert!(message.contains(&stored.code));
}

#[tokio::test]
async fn test_request_code_normalizes_national_format() {
    let (store, sms, service) = build_service();

    let result = service
        .request_code(
            "0712 345 678",
            VerificationSource::Registration,
            None,
            RequesterInfo::default(),
        )
        .await
        .unwrap();

    let stored = store.get(result.verification_id).await.unwrap();
    assert_eq!(stored.phone, PHONE);
    assert_eq!(sms.last_send().unwrap().0, PHONE);
}

#[tokio::test]
async fn test_request_code_invalid_phone() {
    let (_, sms, service) = build_service();

    let err = service
        .request_code(
            "12345",
            VerificationSource::Kiosk,
            None,
            RequesterInfo::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        verification_error(err),
        VerificationError::InvalidPhoneFormat { .. }
    ));
    assert_eq!(sms.sent_count(), 0);
}

#[tokio::test]
async fn test_request_code_opted_out_phone_is_rejected() {
    let (store, sms, service) =
        build_service_with(MockOptOutRegistry::with_phones(&[PHONE]), false);

    let err = service
        .request_code(
            PHONE,
            VerificationSource::Kiosk,
            None,
            RequesterInfo::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(verification_error(err), VerificationError::OptedOut);
    assert_eq!(sms.sent_count(), 0);
    assert_eq!(store.count_for(PHONE).await, 0);
}

#[tokio::test]
async fn test_rate_limit_third_succeeds_fourth_fails() {
    let (store, _, service) = build_service();

    for _ in 0..3 {
        request(&service).await;
    }
    assert_eq!(store.count_for(PHONE).await, 3);

    let err = service
        .request_code(
            PHONE,
            VerificationSource::Kiosk,
            None,
            RequesterInfo::default(),
        )
        .await
        .unwrap_err();

    match verification_error(err) {
        VerificationError::RateLimitExceeded {
            retry_after_seconds,
        } => assert!(retry_after_seconds > 0 && retry_after_seconds <= 3600),
        other => panic!("expected rate limit, got {other:?}"),
    }
    assert_eq!(store.count_for(PHONE).await, 3);
}

#[tokio::test]
async fn test_rate_limit_window_rolls_off() {
    let (store, _, service) = build_service();

    for _ in 0..3 {
        request(&service).await;
    }
    store.backdate(PHONE, Duration::minutes(61)).await;

    // window has rolled off, the next request is allowed again
    request(&service).await;
    assert_eq!(store.count_for(PHONE).await, 4);
}

#[tokio::test]
async fn test_rate_limit_is_per_phone() {
    let (_, _, service) = build_service();

    for _ in 0..3 {
        request(&service).await;
    }

    // a different phone is unaffected
    service
        .request_code(
            "+40798765432",
            VerificationSource::Kiosk,
            None,
            RequesterInfo::default(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_verify_code_success() {
    let (store, _, service) = build_service();

    let result = request(&service).await;
    let code = store.get(result.verification_id).await.unwrap().code;

    let verified = service.verify_code(PHONE, &code).await.unwrap();
    assert_eq!(verified.verification_id, result.verification_id);

    let stored = store.get(result.verification_id).await.unwrap();
    assert!(stored.verified);
    assert_eq!(stored.verified_at, Some(verified.verified_at));
}

#[tokio::test]
async fn test_verify_wrong_code_counts_down_then_locks_out() {
    let (store, _, service) = build_service();

    let result = request(&service).await;
    let code = store.get(result.verification_id).await.unwrap().code;
    let wrong = if code == "000000" { "111111" } else { "000000" };

    for expected_remaining in [2, 1, 0] {
        let err = service.verify_code(PHONE, wrong).await.unwrap_err();
        assert_eq!(
            verification_error(err),
            VerificationError::CodeMismatch {
                attempts_remaining: expected_remaining
            }
        );
    }

    // lockout is sticky: even the correct code is rejected now
    let err = service.verify_code(PHONE, &code).await.unwrap_err();
    assert_eq!(verification_error(err), VerificationError::AttemptsExhausted);
}

#[tokio::test]
async fn test_verify_expired_code() {
    let (store, _, service) = build_service();

    let mut verification = PhoneVerification::new(
        PHONE.to_string(),
        VerificationSource::Kiosk,
        None,
    );
    verification.expires_at = Utc::now() - Duration::minutes(1);
    let code = verification.code.clone();
    store.insert_raw(verification).await;

    let err = service.verify_code(PHONE, &code).await.unwrap_err();
    assert_eq!(verification_error(err), VerificationError::Expired);
}

#[tokio::test]
async fn test_expired_wins_over_lockout() {
    let (store, _, service) = build_service();

    // a record that is both expired and locked out reports expiry:
    // the code was dead before the attempts ran out
    let mut verification = PhoneVerification::new(
        PHONE.to_string(),
        VerificationSource::Kiosk,
        None,
    );
    verification.expires_at = Utc::now() - Duration::minutes(1);
    verification.attempts = MAX_ATTEMPTS;
    let code = verification.code.clone();
    store.insert_raw(verification).await;

    let err = service.verify_code(PHONE, &code).await.unwrap_err();
    assert_eq!(verification_error(err), VerificationError::Expired);
}

#[tokio::test]
async fn test_verify_without_pending_code() {
    let (_, _, service) = build_service();

    let err = service.verify_code(PHONE, "123456").await.unwrap_err();
    assert_eq!(verification_error(err), VerificationError::NotFound);
}

#[tokio::test]
async fn test_verify_rejects_malformed_code() {
    let (_, _, service) = build_service();

    for code in ["12345", "1234567", "12345a", ""] {
        let err = service.verify_code(PHONE, code).await.unwrap_err();
        assert_eq!(verification_error(err), VerificationError::InvalidCodeFormat);
    }
}

#[tokio::test]
async fn test_resend_blocked_by_cooldown() {
    let (_, _, service) = build_service();

    request(&service).await;

    let err = service
        .resend_code(
            PHONE,
            VerificationSource::Kiosk,
            None,
            RequesterInfo::default(),
        )
        .await
        .unwrap_err();

    match verification_error(err) {
        VerificationError::RateLimitExceeded {
            retry_after_seconds,
        } => assert!(retry_after_seconds > 0 && retry_after_seconds <= 60),
        other => panic!("expected cooldown rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_resend_supersedes_previous_code() {
    let (store, _, service) = build_service();

    let first = request(&service).await;
    let first_code = store.get(first.verification_id).await.unwrap().code;

    // cooldown has elapsed
    store.backdate(PHONE, Duration::seconds(61)).await;

    let second = service
        .resend_code(
            PHONE,
            VerificationSource::Kiosk,
            None,
            RequesterInfo::default(),
        )
        .await
        .unwrap();
    let second_code = store.get(second.verification_id).await.unwrap().code;
    assert_ne!(first.verification_id, second.verification_id);

    // the old code no longer verifies (unless the RNG repeated itself)
    if first_code != second_code {
        let err = service.verify_code(PHONE, &first_code).await.unwrap_err();
        assert!(matches!(
            verification_error(err),
            VerificationError::CodeMismatch { .. }
        ));
    }

    service.verify_code(PHONE, &second_code).await.unwrap();
}

#[tokio::test]
async fn test_sms_failure_surfaces_as_provider_error() {
    let (_, _, service) = build_service_with(MockOptOutRegistry::new(), true);

    let err = service
        .request_code(
            PHONE,
            VerificationSource::Kiosk,
            None,
            RequesterInfo::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Provider { .. }));
}

#[tokio::test]
async fn test_cleanup_removes_only_stale_unverified_rows() {
    let (store, _, service) = build_service();

    let mut stale = PhoneVerification::new(PHONE.to_string(), VerificationSource::Kiosk, None);
    stale.created_at = Utc::now() - Duration::days(31);
    store.insert_raw(stale).await;

    let mut old_verified =
        PhoneVerification::new("+40798765432".to_string(), VerificationSource::Kiosk, None);
    old_verified.created_at = Utc::now() - Duration::days(90);
    old_verified.mark_verified(Utc::now() - Duration::days(90));
    store.insert_raw(old_verified).await;

    let fresh = PhoneVerification::new(PHONE.to_string(), VerificationSource::Kiosk, None);
    store.insert_raw(fresh).await;

    let removed = service.cleanup_expired().await.unwrap();
    assert_eq!(removed, 1);
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let store = Arc::new(MockVerificationStore::failing());
    let service = VerificationService::new(
        store,
        Arc::new(MockOptOutRegistry::new()),
        Arc::new(MockSmsProvider::new(false)),
    );

    let err = service
        .request_code(
            PHONE,
            VerificationSource::Kiosk,
            None,
            RequesterInfo::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Persistence { .. }));
}
