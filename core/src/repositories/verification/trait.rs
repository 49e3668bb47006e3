//! Verification store trait defining atomic CRUD over verification records.
//!
//! The legacy system reached the verification table through a handful of
//! ad hoc helpers ("get active verification", "increment attempts",
//! "is rate limited") spread across call sites. This trait re-architects
//! them as named transactional methods so atomicity is guaranteed by
//! contract rather than by convention.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::phone_verification::PhoneVerification;
use crate::errors::DomainResult;

/// Policy applied by [`VerificationStore::issue`]
#[derive(Debug, Clone)]
pub struct IssuePolicy {
    /// Maximum issuances per phone inside the trailing window
    pub max_per_window: u32,
    /// Length of the trailing rate-limit window
    pub window: Duration,
    /// Minimum gap since the last issuance, if any (resend cooldown)
    pub cooldown: Option<Duration>,
}

/// Outcome of an atomic rate-limited insert
#[derive(Debug, Clone)]
pub enum IssueOutcome {
    /// The verification was inserted
    Issued(PhoneVerification),
    /// The trailing-window limit was hit; nothing was inserted
    RateLimited { retry_after_seconds: u64 },
    /// The cooldown since the last issuance has not elapsed
    CoolingDown { retry_after_seconds: u64 },
}

/// Store contract for [`PhoneVerification`] records
///
/// Implementations must make `issue` and `increment_attempts`
/// effectively atomic per phone / per record: two concurrent `issue`
/// calls must never both observe "under limit" and insert past the
/// limit, and two concurrent `increment_attempts` calls must never
/// both read `attempts = k` and both write `k + 1`.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Atomically check the rate-limit window (and optional cooldown)
    /// for the verification's phone and insert the record if allowed
    async fn issue(
        &self,
        verification: PhoneVerification,
        policy: &IssuePolicy,
    ) -> DomainResult<IssueOutcome>;

    /// Most recently created unverified verification for a phone,
    /// regardless of expiry
    ///
    /// Expiry is deliberately left to the caller: the service reports
    /// an expired latest row as `Expired` rather than `NotFound`.
    async fn find_latest_pending(&self, phone: &str)
        -> DomainResult<Option<PhoneVerification>>;

    /// Atomically increment the attempts counter and return the new
    /// value (saturating at the hard cap)
    async fn increment_attempts(&self, id: Uuid) -> DomainResult<i32>;

    /// Mark a verification as completed
    async fn mark_verified(&self, id: Uuid, at: DateTime<Utc>) -> DomainResult<()>;

    /// Delete unverified records created before `cutoff`, returning the
    /// number of rows removed
    ///
    /// Verified rows are preserved for audit regardless of age.
    async fn delete_unverified_older_than(&self, cutoff: DateTime<Utc>) -> DomainResult<u64>;
}
