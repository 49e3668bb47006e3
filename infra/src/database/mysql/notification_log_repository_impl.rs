//! MySQL implementation of the NotificationLogRepository trait.

use async_trait::async_trait;
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use uuid::Uuid;

use ra_core::domain::entities::notification_log::{
    NotificationChannel, NotificationLogEntry, NotificationStatus,
};
use ra_core::errors::{DomainError, DomainResult};
use ra_core::repositories::NotificationLogRepository;

use super::{column_err, db_err, parse_uuid};

/// MySQL implementation of [`NotificationLogRepository`]
pub struct MySqlNotificationLogRepository {
    pool: MySqlPool,
}

impl MySqlNotificationLogRepository {
    /// Create a new repository backed by the given pool
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_entry(row: &MySqlRow) -> Result<NotificationLogEntry, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_err("id", e))?;
        let reminder_id: String = row
            .try_get("reminder_id")
            .map_err(|e| column_err("reminder_id", e))?;
        let channel: String = row
            .try_get("channel")
            .map_err(|e| column_err("channel", e))?;
        let status: String = row.try_get("status").map_err(|e| column_err("status", e))?;

        let channel = match channel.as_str() {
            "email" => NotificationChannel::Email,
            "sms" => NotificationChannel::Sms,
            other => {
                return Err(DomainError::Persistence {
                    message: format!("unknown notification channel: {}", other),
                })
            }
        };

        let status = match status.as_str() {
            "scheduled" => NotificationStatus::Scheduled,
            "sent" => NotificationStatus::Sent,
            "delivered" => NotificationStatus::Delivered,
            "failed" => NotificationStatus::Failed,
            "undelivered" => NotificationStatus::Undelivered,
            other => {
                return Err(DomainError::Persistence {
                    message: format!("unknown notification status: {}", other),
                })
            }
        };

        Ok(NotificationLogEntry {
            id: parse_uuid(&id)?,
            reminder_id: parse_uuid(&reminder_id)?,
            channel,
            recipient: row
                .try_get("recipient")
                .map_err(|e| column_err("recipient", e))?,
            message: row
                .try_get("message")
                .map_err(|e| column_err("message", e))?,
            status,
            provider: row
                .try_get("provider")
                .map_err(|e| column_err("provider", e))?,
            provider_message_id: row
                .try_get("provider_message_id")
                .map_err(|e| column_err("provider_message_id", e))?,
            error: row.try_get("error").map_err(|e| column_err("error", e))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| column_err("created_at", e))?,
            updated_at: row
                .try_get("updated_at")
                .map_err(|e| column_err("updated_at", e))?,
        })
    }
}

#[async_trait]
impl NotificationLogRepository for MySqlNotificationLogRepository {
    async fn append(&self, entry: NotificationLogEntry) -> DomainResult<NotificationLogEntry> {
        sqlx::query(
            r#"
            INSERT INTO notification_log
                (id, reminder_id, channel, recipient, message, status,
                 provider, provider_message_id, error, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.reminder_id.to_string())
        .bind(entry.channel.as_str())
        .bind(&entry.recipient)
        .bind(&entry.message)
        .bind(entry.status.as_str())
        .bind(&entry.provider)
        .bind(&entry.provider_message_id)
        .bind(&entry.error)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(entry)
    }

    async fn find_by_reminder(
        &self,
        reminder_id: Uuid,
    ) -> DomainResult<Vec<NotificationLogEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, reminder_id, channel, recipient, message, status,
                   provider, provider_message_id, error, created_at, updated_at
            FROM notification_log
            WHERE reminder_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(reminder_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn update_status_by_provider_id(
        &self,
        provider_message_id: &str,
        status: NotificationStatus,
    ) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE notification_log SET status = ?, updated_at = ? \
             WHERE provider_message_id = ?",
        )
        .bind(status.as_str())
        .bind(chrono::Utc::now())
        .bind(provider_message_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}
