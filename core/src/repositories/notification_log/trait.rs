//! Notification log repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::notification_log::{NotificationLogEntry, NotificationStatus};
use crate::errors::DomainResult;

/// Append-only store for dispatch attempts
#[async_trait]
pub trait NotificationLogRepository: Send + Sync {
    /// Append one dispatch attempt
    async fn append(&self, entry: NotificationLogEntry) -> DomainResult<NotificationLogEntry>;

    /// All attempts recorded for a reminder, oldest first
    async fn find_by_reminder(
        &self,
        reminder_id: Uuid,
    ) -> DomainResult<Vec<NotificationLogEntry>>;

    /// Update the status of an attempt from a provider delivery
    /// callback, matched by the provider-assigned message id
    ///
    /// Returns whether a matching entry was found.
    async fn update_status_by_provider_id(
        &self,
        provider_message_id: &str,
        status: NotificationStatus,
    ) -> DomainResult<bool>;
}
