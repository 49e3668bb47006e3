//! Phone verification entity for SMS one-time codes.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Maximum number of verification attempts before sticky lockout
pub const MAX_ATTEMPTS: i32 = 3;

/// Hard upper bound for the attempts counter; stores saturate here
pub const ATTEMPTS_HARD_CAP: i32 = 10;

/// Expiration time for verification codes (10 minutes)
pub const CODE_EXPIRATION_MINUTES: i64 = 10;

/// Maximum code issuances (request + resend) per phone per trailing hour.
///
/// The legacy test suites disagreed on this threshold (3 vs 5 per hour);
/// 3 is the value the product behaves with today. Change it here only.
pub const REQUEST_LIMIT_PER_HOUR: u32 = 3;

/// Minimum seconds between two issuances for the same phone
pub const RESEND_COOLDOWN_SECONDS: i64 = 60;

/// Days after which unverified verification rows are purged
pub const UNVERIFIED_RETENTION_DAYS: i64 = 30;

/// Where a verification request originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationSource {
    Kiosk,
    Registration,
    ProfileUpdate,
}

impl VerificationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationSource::Kiosk => "kiosk",
            VerificationSource::Registration => "registration",
            VerificationSource::ProfileUpdate => "profile_update",
        }
    }
}

/// Phone verification entity
///
/// One row per issued code. A resend creates a new row rather than
/// mutating the old one; verification always targets the most recently
/// created pending row, so earlier codes become unreachable without an
/// explicit invalidation write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneVerification {
    /// Unique identifier for the verification
    pub id: Uuid,

    /// Phone number this code was sent to (E.164)
    pub phone: String,

    /// The 6-digit verification code
    pub code: String,

    /// Where the request originated
    pub source: VerificationSource,

    /// Station the kiosk request came from, if any
    pub station_id: Option<String>,

    /// Number of verification attempts made (0..=ATTEMPTS_HARD_CAP)
    pub attempts: i32,

    /// Whether the code has been successfully verified
    pub verified: bool,

    /// When the code was verified
    pub verified_at: Option<DateTime<Utc>>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,

    /// Timestamp when the code was created
    pub created_at: DateTime<Utc>,

    /// Requester IP, kept for audit only
    pub requester_ip: Option<String>,

    /// Requester user agent, kept for audit only
    pub requester_user_agent: Option<String>,
}

impl PhoneVerification {
    /// Creates a new pending verification with a cryptographically
    /// random 6-digit code expiring in [`CODE_EXPIRATION_MINUTES`]
    pub fn new(phone: String, source: VerificationSource, station_id: Option<String>) -> Self {
        Self::new_with_expiration(phone, source, station_id, CODE_EXPIRATION_MINUTES)
    }

    /// Creates a new pending verification with a custom expiration time
    pub fn new_with_expiration(
        phone: String,
        source: VerificationSource,
        station_id: Option<String>,
        expiration_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            phone,
            code: Self::generate_code(),
            source,
            station_id,
            attempts: 0,
            verified: false,
            verified_at: None,
            expires_at: now + Duration::minutes(expiration_minutes),
            created_at: now,
            requester_ip: None,
            requester_user_agent: None,
        }
    }

    /// Attach requester audit metadata
    pub fn with_requester(mut self, ip: Option<String>, user_agent: Option<String>) -> Self {
        self.requester_ip = ip;
        self.requester_user_agent = user_agent;
        self
    }

    /// Generates a cryptographically secure random 6-digit code
    ///
    /// Uses the OS CSPRNG. The modulo introduces a negligible bias for
    /// 6-digit codes.
    pub fn generate_code() -> String {
        let mut rng = OsRng;
        let mut bytes = [0u8; 4];
        rng.fill_bytes(&mut bytes);
        let num = u32::from_le_bytes(bytes) % 1_000_000;
        format!("{:06}", num)
    }

    /// Checks if the verification code has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Checks if the lockout threshold has been reached
    ///
    /// The lockout is sticky: once reached, even a correct code is
    /// rejected until a fresh code is issued.
    pub fn attempts_exhausted(&self) -> bool {
        self.attempts >= MAX_ATTEMPTS
    }

    /// Remaining verification attempts (0 if exhausted)
    pub fn remaining_attempts(&self) -> i32 {
        (MAX_ATTEMPTS - self.attempts).max(0)
    }

    /// Constant-time comparison of the stored code against user input
    pub fn code_matches(&self, input_code: &str) -> bool {
        if self.code.len() != input_code.len() {
            return false;
        }
        constant_time_eq(self.code.as_bytes(), input_code.as_bytes())
    }

    /// Marks the verification as completed
    pub fn mark_verified(&mut self, at: DateTime<Utc>) {
        self.verified = true;
        self.verified_at = Some(at);
    }
}
