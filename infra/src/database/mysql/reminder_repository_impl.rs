//! MySQL implementation of the ReminderRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use uuid::Uuid;

use ra_core::domain::entities::reminder::{
    ConsentInfo, NotificationChannels, Reminder, ReminderSource, ReminderType,
};
use ra_core::errors::{DomainError, DomainResult};
use ra_core::repositories::ReminderRepository;

use super::{column_err, db_err, parse_uuid};

const SELECT_COLUMNS: &str = "id, plate_number, reminder_type, expiry_date, \
     notification_intervals, channel_email, channel_sms, \
     next_notification_date, last_notification_sent_at, opt_out, \
     consent_granted_at, consent_policy_version, source, user_id, \
     contact_phone, contact_email, verification_id, created_at, \
     updated_at, deleted_at";

/// MySQL implementation of [`ReminderRepository`]
pub struct MySqlReminderRepository {
    pool: MySqlPool,
}

impl MySqlReminderRepository {
    /// Create a new repository backed by the given pool
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_reminder(row: &MySqlRow) -> Result<Reminder, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_err("id", e))?;
        let reminder_type: String = row
            .try_get("reminder_type")
            .map_err(|e| column_err("reminder_type", e))?;
        let source: String = row.try_get("source").map_err(|e| column_err("source", e))?;
        let intervals_json: String = row
            .try_get("notification_intervals")
            .map_err(|e| column_err("notification_intervals", e))?;
        let user_id: Option<String> = row
            .try_get("user_id")
            .map_err(|e| column_err("user_id", e))?;
        let verification_id: Option<String> = row
            .try_get("verification_id")
            .map_err(|e| column_err("verification_id", e))?;
        let consent_granted_at: Option<DateTime<Utc>> = row
            .try_get("consent_granted_at")
            .map_err(|e| column_err("consent_granted_at", e))?;
        let consent_policy_version: Option<String> = row
            .try_get("consent_policy_version")
            .map_err(|e| column_err("consent_policy_version", e))?;

        let reminder_type = match reminder_type.as_str() {
            "itp" => ReminderType::Itp,
            "rca" => ReminderType::Rca,
            "rovinieta" => ReminderType::Rovinieta,
            other => {
                return Err(DomainError::Persistence {
                    message: format!("unknown reminder type: {}", other),
                })
            }
        };

        let source = match source.as_str() {
            "web" => ReminderSource::Web,
            "kiosk" => ReminderSource::Kiosk,
            "import" => ReminderSource::Import,
            other => {
                return Err(DomainError::Persistence {
                    message: format!("unknown reminder source: {}", other),
                })
            }
        };

        let notification_intervals: Vec<u32> =
            serde_json::from_str(&intervals_json).map_err(|e| DomainError::Persistence {
                message: format!("invalid notification_intervals JSON: {}", e),
            })?;

        let consent = match (consent_granted_at, consent_policy_version) {
            (Some(granted_at), Some(policy_version)) => Some(ConsentInfo {
                granted_at,
                policy_version,
            }),
            _ => None,
        };

        Ok(Reminder {
            id: parse_uuid(&id)?,
            plate_number: row
                .try_get("plate_number")
                .map_err(|e| column_err("plate_number", e))?,
            reminder_type,
            expiry_date: row
                .try_get("expiry_date")
                .map_err(|e| column_err("expiry_date", e))?,
            notification_intervals,
            channels: NotificationChannels {
                email: row
                    .try_get("channel_email")
                    .map_err(|e| column_err("channel_email", e))?,
                sms: row
                    .try_get("channel_sms")
                    .map_err(|e| column_err("channel_sms", e))?,
            },
            next_notification_date: row
                .try_get("next_notification_date")
                .map_err(|e| column_err("next_notification_date", e))?,
            last_notification_sent_at: row
                .try_get("last_notification_sent_at")
                .map_err(|e| column_err("last_notification_sent_at", e))?,
            opt_out: row.try_get("opt_out").map_err(|e| column_err("opt_out", e))?,
            consent,
            source,
            user_id: user_id.as_deref().map(parse_uuid).transpose()?,
            contact_phone: row
                .try_get("contact_phone")
                .map_err(|e| column_err("contact_phone", e))?,
            contact_email: row
                .try_get("contact_email")
                .map_err(|e| column_err("contact_email", e))?,
            verification_id: verification_id.as_deref().map(parse_uuid).transpose()?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| column_err("created_at", e))?,
            updated_at: row
                .try_get("updated_at")
                .map_err(|e| column_err("updated_at", e))?,
            deleted_at: row
                .try_get("deleted_at")
                .map_err(|e| column_err("deleted_at", e))?,
        })
    }

    fn type_str(reminder_type: ReminderType) -> &'static str {
        match reminder_type {
            ReminderType::Itp => "itp",
            ReminderType::Rca => "rca",
            ReminderType::Rovinieta => "rovinieta",
        }
    }

    fn source_str(source: ReminderSource) -> &'static str {
        match source {
            ReminderSource::Web => "web",
            ReminderSource::Kiosk => "kiosk",
            ReminderSource::Import => "import",
        }
    }

    fn intervals_json(reminder: &Reminder) -> Result<String, DomainError> {
        serde_json::to_string(&reminder.notification_intervals).map_err(|e| {
            DomainError::Persistence {
                message: format!("failed to encode notification_intervals: {}", e),
            }
        })
    }
}

#[async_trait]
impl ReminderRepository for MySqlReminderRepository {
    async fn create(&self, reminder: Reminder) -> DomainResult<Reminder> {
        sqlx::query(
            r#"
            INSERT INTO reminders
                (id, plate_number, reminder_type, expiry_date,
                 notification_intervals, channel_email, channel_sms,
                 next_notification_date, last_notification_sent_at, opt_out,
                 consent_granted_at, consent_policy_version, source, user_id,
                 contact_phone, contact_email, verification_id, created_at,
                 updated_at, deleted_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(reminder.id.to_string())
        .bind(&reminder.plate_number)
        .bind(Self::type_str(reminder.reminder_type))
        .bind(reminder.expiry_date)
        .bind(Self::intervals_json(&reminder)?)
        .bind(reminder.channels.email)
        .bind(reminder.channels.sms)
        .bind(reminder.next_notification_date)
        .bind(reminder.last_notification_sent_at)
        .bind(reminder.opt_out)
        .bind(reminder.consent.as_ref().map(|c| c.granted_at))
        .bind(reminder.consent.as_ref().map(|c| c.policy_version.clone()))
        .bind(Self::source_str(reminder.source))
        .bind(reminder.user_id.map(|u| u.to_string()))
        .bind(&reminder.contact_phone)
        .bind(&reminder.contact_email)
        .bind(reminder.verification_id.map(|v| v.to_string()))
        .bind(reminder.created_at)
        .bind(reminder.updated_at)
        .bind(reminder.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(reminder)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Reminder>> {
        let query = format!("SELECT {} FROM reminders WHERE id = ? LIMIT 1", SELECT_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.as_ref().map(Self::row_to_reminder).transpose()
    }

    async fn find_due(&self, today: NaiveDate) -> DomainResult<Vec<Reminder>> {
        let query = format!(
            "SELECT {} FROM reminders \
             WHERE next_notification_date IS NOT NULL \
               AND next_notification_date <= ? \
               AND opt_out = 0 \
               AND deleted_at IS NULL \
             ORDER BY created_at",
            SELECT_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(today)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(Self::row_to_reminder).collect()
    }

    async fn update_schedule(
        &self,
        id: Uuid,
        next_notification_date: Option<NaiveDate>,
        last_notification_sent_at: Option<DateTime<Utc>>,
    ) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE reminders \
             SET next_notification_date = ?, \
                 last_notification_sent_at = COALESCE(?, last_notification_sent_at), \
                 updated_at = ? \
             WHERE id = ?",
        )
        .bind(next_notification_date)
        .bind(last_notification_sent_at)
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "Reminder".to_string(),
            });
        }
        Ok(())
    }

    async fn update(&self, reminder: Reminder) -> DomainResult<Reminder> {
        let result = sqlx::query(
            r#"
            UPDATE reminders
            SET plate_number = ?, reminder_type = ?, expiry_date = ?,
                notification_intervals = ?, channel_email = ?, channel_sms = ?,
                next_notification_date = ?, opt_out = ?, contact_email = ?,
                updated_at = ?, deleted_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&reminder.plate_number)
        .bind(Self::type_str(reminder.reminder_type))
        .bind(reminder.expiry_date)
        .bind(Self::intervals_json(&reminder)?)
        .bind(reminder.channels.email)
        .bind(reminder.channels.sms)
        .bind(reminder.next_notification_date)
        .bind(reminder.opt_out)
        .bind(&reminder.contact_email)
        .bind(Utc::now())
        .bind(reminder.deleted_at)
        .bind(reminder.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "Reminder".to_string(),
            });
        }
        Ok(reminder)
    }
}
