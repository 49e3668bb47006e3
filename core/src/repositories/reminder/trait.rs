//! Reminder repository trait.
//!
//! The scheduler is the only writer of schedule state
//! (`next_notification_date`, `last_notification_sent_at`), and it goes
//! through `update_schedule` exclusively; user edits flow through
//! `update`. The scheduler never hard-deletes.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::entities::reminder::Reminder;
use crate::errors::DomainResult;

/// Repository contract for [`Reminder`] persistence
#[async_trait]
pub trait ReminderRepository: Send + Sync {
    /// Persist a new reminder
    async fn create(&self, reminder: Reminder) -> DomainResult<Reminder>;

    /// Find a reminder by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Reminder>>;

    /// Reminders due for processing on `today`: non-null
    /// `next_notification_date <= today`, not opted out, not
    /// soft-deleted
    async fn find_due(&self, today: NaiveDate) -> DomainResult<Vec<Reminder>>;

    /// Persist recomputed schedule state for one reminder
    ///
    /// `last_notification_sent_at` is only overwritten when `Some`.
    async fn update_schedule(
        &self,
        id: Uuid,
        next_notification_date: Option<NaiveDate>,
        last_notification_sent_at: Option<DateTime<Utc>>,
    ) -> DomainResult<()>;

    /// Persist user-editable fields (expiry date, intervals, opt-out,
    /// channels, soft delete)
    async fn update(&self, reminder: Reminder) -> DomainResult<Reminder>;
}
