//! MySQL implementation of the OptOutRegistry trait.
//!
//! The suppression table is append-only; `INSERT IGNORE` against the
//! unique phone index makes re-adding an existing phone a no-op.

use async_trait::async_trait;
use sqlx::{mysql::MySqlRow, MySqlPool, Row};

use ra_core::domain::entities::opt_out::GlobalOptOut;
use ra_core::errors::{DomainError, DomainResult};
use ra_core::repositories::OptOutRegistry;

use super::{column_err, db_err, parse_uuid};

/// MySQL implementation of [`OptOutRegistry`]
pub struct MySqlOptOutRegistry {
    pool: MySqlPool,
}

impl MySqlOptOutRegistry {
    /// Create a new registry backed by the given pool
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_opt_out(row: &MySqlRow) -> Result<GlobalOptOut, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_err("id", e))?;
        Ok(GlobalOptOut {
            id: parse_uuid(&id)?,
            phone: row.try_get("phone").map_err(|e| column_err("phone", e))?,
            reason: row.try_get("reason").map_err(|e| column_err("reason", e))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| column_err("created_at", e))?,
        })
    }
}

#[async_trait]
impl OptOutRegistry for MySqlOptOutRegistry {
    async fn is_opted_out(&self, phone: &str) -> DomainResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM global_opt_outs WHERE phone = ?")
                .bind(phone)
                .fetch_one(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(count > 0)
    }

    async fn add(&self, phone: &str, reason: Option<String>) -> DomainResult<GlobalOptOut> {
        let record = GlobalOptOut::new(phone.to_string(), reason);

        sqlx::query(
            "INSERT IGNORE INTO global_opt_outs (id, phone, reason, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(record.id.to_string())
        .bind(&record.phone)
        .bind(&record.reason)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        // return the stored row: on a duplicate phone the insert was
        // ignored and the original record wins
        let row = sqlx::query(
            "SELECT id, phone, reason, created_at FROM global_opt_outs WHERE phone = ?",
        )
        .bind(phone)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Self::row_to_opt_out(&row)
    }
}
