//! Notification log entity.
//!
//! Append-only record of dispatch attempts: one row per channel per
//! reminder per day, written regardless of outcome. `Delivered` and
//! `Undelivered` are set later from provider delivery callbacks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delivery channel for a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    Email,
    Sms,
}

impl NotificationChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationChannel::Email => "email",
            NotificationChannel::Sms => "sms",
        }
    }
}

/// Lifecycle status of one dispatch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Scheduled,
    Sent,
    Delivered,
    Failed,
    Undelivered,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Scheduled => "scheduled",
            NotificationStatus::Sent => "sent",
            NotificationStatus::Delivered => "delivered",
            NotificationStatus::Failed => "failed",
            NotificationStatus::Undelivered => "undelivered",
        }
    }
}

/// One dispatch attempt for one channel of one reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationLogEntry {
    /// Unique identifier for the log entry
    pub id: Uuid,

    /// The reminder this attempt belongs to
    pub reminder_id: Uuid,

    /// Channel the message went through
    pub channel: NotificationChannel,

    /// Recipient address (phone or email)
    pub recipient: String,

    /// The fully rendered message text
    pub message: String,

    /// Outcome of the attempt
    pub status: NotificationStatus,

    /// Provider that handled the attempt
    pub provider: Option<String>,

    /// Provider-assigned message id, used to match delivery callbacks
    pub provider_message_id: Option<String>,

    /// Error detail for failed attempts
    pub error: Option<String>,

    /// Timestamp when the entry was written
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last status update
    pub updated_at: DateTime<Utc>,
}

impl NotificationLogEntry {
    /// Record a successful send
    pub fn sent(
        reminder_id: Uuid,
        channel: NotificationChannel,
        recipient: String,
        message: String,
        provider: String,
        provider_message_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            reminder_id,
            channel,
            recipient,
            message,
            status: NotificationStatus::Sent,
            provider: Some(provider),
            provider_message_id,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a failed send attempt
    pub fn failed(
        reminder_id: Uuid,
        channel: NotificationChannel,
        recipient: String,
        message: String,
        provider: String,
        error: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            reminder_id,
            channel,
            recipient,
            message,
            status: NotificationStatus::Failed,
            provider: Some(provider),
            provider_message_id: None,
            error: Some(error),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sent_entry() {
        let reminder_id = Uuid::new_v4();
        let entry = NotificationLogEntry::sent(
            reminder_id,
            NotificationChannel::Sms,
            "+40712345678".to_string(),
            "ITP expira in 3 zile".to_string(),
            "mock".to_string(),
            Some("msg-1".to_string()),
        );

        assert_eq!(entry.reminder_id, reminder_id);
        assert_eq!(entry.status, NotificationStatus::Sent);
        assert!(entry.error.is_none());
        assert_eq!(entry.provider_message_id.as_deref(), Some("msg-1"));
    }

    #[test]
    fn test_failed_entry() {
        let entry = NotificationLogEntry::failed(
            Uuid::new_v4(),
            NotificationChannel::Email,
            "driver@example.com".to_string(),
            "ITP expira in 3 zile".to_string(),
            "smtp".to_string(),
            "connection refused".to_string(),
        );

        assert_eq!(entry.status, NotificationStatus::Failed);
        assert_eq!(entry.error.as_deref(), Some("connection refused"));
        assert!(entry.provider_message_id.is_none());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(NotificationStatus::Sent.as_str(), "sent");
        assert_eq!(NotificationStatus::Undelivered.as_str(), "undelivered");
        assert_eq!(NotificationChannel::Email.as_str(), "email");
    }
}
