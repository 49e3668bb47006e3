//! MySQL implementation of the VerificationStore trait.
//!
//! The rate-limited insert runs inside a transaction holding a
//! `FOR UPDATE` lock on the phone's recent rows, so two concurrent
//! requests cannot both pass the window check. The attempts counter
//! uses the `LAST_INSERT_ID()` trick to increment and read back in one
//! statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use uuid::Uuid;

use ra_core::domain::entities::phone_verification::{
    PhoneVerification, VerificationSource, ATTEMPTS_HARD_CAP,
};
use ra_core::errors::{DomainError, DomainResult};
use ra_core::repositories::{IssueOutcome, IssuePolicy, VerificationStore};

use super::{column_err, db_err, parse_uuid};

/// MySQL implementation of [`VerificationStore`]
pub struct MySqlVerificationStore {
    pool: MySqlPool,
}

impl MySqlVerificationStore {
    /// Create a new store backed by the given pool
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_verification(row: &MySqlRow) -> Result<PhoneVerification, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_err("id", e))?;
        let source: String = row.try_get("source").map_err(|e| column_err("source", e))?;

        let source = match source.as_str() {
            "kiosk" => VerificationSource::Kiosk,
            "registration" => VerificationSource::Registration,
            "profile_update" => VerificationSource::ProfileUpdate,
            other => {
                return Err(DomainError::Persistence {
                    message: format!("unknown verification source: {}", other),
                })
            }
        };

        Ok(PhoneVerification {
            id: parse_uuid(&id)?,
            phone: row.try_get("phone").map_err(|e| column_err("phone", e))?,
            code: row.try_get("code").map_err(|e| column_err("code", e))?,
            source,
            station_id: row
                .try_get("station_id")
                .map_err(|e| column_err("station_id", e))?,
            attempts: row
                .try_get("attempts")
                .map_err(|e| column_err("attempts", e))?,
            verified: row
                .try_get("verified")
                .map_err(|e| column_err("verified", e))?,
            verified_at: row
                .try_get("verified_at")
                .map_err(|e| column_err("verified_at", e))?,
            expires_at: row
                .try_get("expires_at")
                .map_err(|e| column_err("expires_at", e))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| column_err("created_at", e))?,
            requester_ip: row
                .try_get("requester_ip")
                .map_err(|e| column_err("requester_ip", e))?,
            requester_user_agent: row
                .try_get("requester_user_agent")
                .map_err(|e| column_err("requester_user_agent", e))?,
        })
    }
}

#[async_trait]
impl VerificationStore for MySqlVerificationStore {
    async fn issue(
        &self,
        verification: PhoneVerification,
        policy: &IssuePolicy,
    ) -> DomainResult<IssueOutcome> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let now = Utc::now();
        let window_start = now - policy.window;

        // lock the phone's recent rows so a concurrent issue for the
        // same phone serializes behind this transaction
        let recent: Vec<DateTime<Utc>> = sqlx::query_scalar(
            r#"
            SELECT created_at FROM phone_verifications
            WHERE phone = ? AND created_at > ?
            ORDER BY created_at
            FOR UPDATE
            "#,
        )
        .bind(&verification.phone)
        .bind(window_start)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_err)?;

        if let Some(cooldown) = policy.cooldown {
            if let Some(last) = recent.last() {
                let elapsed = now - *last;
                if elapsed < cooldown {
                    let retry_after = (cooldown - elapsed).num_seconds().max(1) as u64;
                    return Ok(IssueOutcome::CoolingDown {
                        retry_after_seconds: retry_after,
                    });
                }
            }
        }

        if recent.len() as u32 >= policy.max_per_window {
            let oldest = recent.first().copied().unwrap_or(now);
            let retry_after = ((oldest + policy.window) - now).num_seconds().max(1) as u64;
            return Ok(IssueOutcome::RateLimited {
                retry_after_seconds: retry_after,
            });
        }

        sqlx::query(
            r#"
            INSERT INTO phone_verifications
                (id, phone, code, source, station_id, attempts, verified,
                 verified_at, expires_at, created_at, requester_ip,
                 requester_user_agent)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(verification.id.to_string())
        .bind(&verification.phone)
        .bind(&verification.code)
        .bind(verification.source.as_str())
        .bind(&verification.station_id)
        .bind(verification.attempts)
        .bind(verification.verified)
        .bind(verification.verified_at)
        .bind(verification.expires_at)
        .bind(verification.created_at)
        .bind(&verification.requester_ip)
        .bind(&verification.requester_user_agent)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(IssueOutcome::Issued(verification))
    }

    async fn find_latest_pending(
        &self,
        phone: &str,
    ) -> DomainResult<Option<PhoneVerification>> {
        let row = sqlx::query(
            r#"
            SELECT id, phone, code, source, station_id, attempts, verified,
                   verified_at, expires_at, created_at, requester_ip,
                   requester_user_agent
            FROM phone_verifications
            WHERE phone = ? AND verified = 0
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(Self::row_to_verification).transpose()
    }

    async fn increment_attempts(&self, id: Uuid) -> DomainResult<i32> {
        // increment-and-read in one statement: LAST_INSERT_ID(expr)
        // stores the new counter in the session, so both queries must
        // run on the same connection
        let mut conn = self.pool.acquire().await.map_err(db_err)?;

        let result = sqlx::query(
            "UPDATE phone_verifications \
             SET attempts = LAST_INSERT_ID(LEAST(attempts + 1, ?)) \
             WHERE id = ?",
        )
        .bind(ATTEMPTS_HARD_CAP)
        .bind(id.to_string())
        .execute(&mut *conn)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "PhoneVerification".to_string(),
            });
        }

        let attempts: u64 = sqlx::query_scalar("SELECT LAST_INSERT_ID()")
            .fetch_one(&mut *conn)
            .await
            .map_err(db_err)?;

        Ok(attempts as i32)
    }

    async fn mark_verified(&self, id: Uuid, at: DateTime<Utc>) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE phone_verifications SET verified = 1, verified_at = ? WHERE id = ?",
        )
        .bind(at)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "PhoneVerification".to_string(),
            });
        }
        Ok(())
    }

    async fn delete_unverified_older_than(&self, cutoff: DateTime<Utc>) -> DomainResult<u64> {
        let result = sqlx::query(
            "DELETE FROM phone_verifications WHERE verified = 0 AND created_at < ?",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected())
    }
}
