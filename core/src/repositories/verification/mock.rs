//! Mock implementation of VerificationStore for testing

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::phone_verification::{PhoneVerification, ATTEMPTS_HARD_CAP};
use crate::errors::{DomainError, DomainResult};

use super::trait_::{IssueOutcome, IssuePolicy, VerificationStore};

/// In-memory verification store for testing
///
/// A single mutex over the whole record list makes every trait method
/// trivially atomic, mirroring the transactional guarantees the MySQL
/// implementation provides.
pub struct MockVerificationStore {
    records: Arc<Mutex<Vec<PhoneVerification>>>,
    fail: bool,
}

impl MockVerificationStore {
    /// Create a new mock store
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Create a mock store whose every method fails with a persistence error
    pub fn failing() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// Insert a record directly, bypassing the issue policy (test setup)
    pub async fn insert_raw(&self, verification: PhoneVerification) {
        self.records.lock().await.push(verification);
    }

    /// Shift `created_at` of every record for a phone back in time
    /// (test setup for rate-limit window roll-off)
    pub async fn backdate(&self, phone: &str, by: Duration) {
        let mut records = self.records.lock().await;
        for record in records.iter_mut().filter(|r| r.phone == phone) {
            record.created_at -= by;
        }
    }

    /// Number of stored records for a phone
    pub async fn count_for(&self, phone: &str) -> usize {
        self.records
            .lock()
            .await
            .iter()
            .filter(|r| r.phone == phone)
            .count()
    }

    /// Fetch a record by id (test assertions)
    pub async fn get(&self, id: Uuid) -> Option<PhoneVerification> {
        self.records
            .lock()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    fn persistence_error(&self) -> DomainError {
        DomainError::Persistence {
            message: "mock store failure".to_string(),
        }
    }
}

impl Default for MockVerificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerificationStore for MockVerificationStore {
    async fn issue(
        &self,
        verification: PhoneVerification,
        policy: &IssuePolicy,
    ) -> DomainResult<IssueOutcome> {
        if self.fail {
            return Err(self.persistence_error());
        }

        let mut records = self.records.lock().await;
        let now = Utc::now();
        let window_start = now - policy.window;

        let in_window: Vec<&PhoneVerification> = records
            .iter()
            .filter(|r| r.phone == verification.phone && r.created_at > window_start)
            .collect();

        if let Some(cooldown) = policy.cooldown {
            if let Some(last) = in_window.iter().map(|r| r.created_at).max() {
                let elapsed = now - last;
                if elapsed < cooldown {
                    let retry_after = (cooldown - elapsed).num_seconds().max(1) as u64;
                    return Ok(IssueOutcome::CoolingDown {
                        retry_after_seconds: retry_after,
                    });
                }
            }
        }

        if in_window.len() as u32 >= policy.max_per_window {
            let oldest = in_window.iter().map(|r| r.created_at).min().unwrap_or(now);
            let retry_after = ((oldest + policy.window) - now).num_seconds().max(1) as u64;
            return Ok(IssueOutcome::RateLimited {
                retry_after_seconds: retry_after,
            });
        }

        records.push(verification.clone());
        Ok(IssueOutcome::Issued(verification))
    }

    async fn find_latest_pending(
        &self,
        phone: &str,
    ) -> DomainResult<Option<PhoneVerification>> {
        if self.fail {
            return Err(self.persistence_error());
        }

        let records = self.records.lock().await;
        Ok(records
            .iter()
            .filter(|r| r.phone == phone && !r.verified)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn increment_attempts(&self, id: Uuid) -> DomainResult<i32> {
        if self.fail {
            return Err(self.persistence_error());
        }

        let mut records = self.records.lock().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DomainError::NotFound {
                resource: "PhoneVerification".to_string(),
            })?;
        record.attempts = (record.attempts + 1).min(ATTEMPTS_HARD_CAP);
        Ok(record.attempts)
    }

    async fn mark_verified(&self, id: Uuid, at: DateTime<Utc>) -> DomainResult<()> {
        if self.fail {
            return Err(self.persistence_error());
        }

        let mut records = self.records.lock().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DomainError::NotFound {
                resource: "PhoneVerification".to_string(),
            })?;
        record.mark_verified(at);
        Ok(())
    }

    async fn delete_unverified_older_than(&self, cutoff: DateTime<Utc>) -> DomainResult<u64> {
        if self.fail {
            return Err(self.persistence_error());
        }

        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|r| r.verified || r.created_at >= cutoff);
        Ok((before - records.len()) as u64)
    }
}
