//! Mock implementation of NotificationLogRepository for testing

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::notification_log::{NotificationLogEntry, NotificationStatus};
use crate::errors::DomainResult;

use super::trait_::NotificationLogRepository;

/// In-memory notification log for testing
pub struct MockNotificationLogRepository {
    entries: Arc<RwLock<Vec<NotificationLogEntry>>>,
}

impl MockNotificationLogRepository {
    /// Create a new, empty log
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// All entries in insertion order (test assertions)
    pub async fn all(&self) -> Vec<NotificationLogEntry> {
        self.entries.read().await.clone()
    }
}

impl Default for MockNotificationLogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationLogRepository for MockNotificationLogRepository {
    async fn append(&self, entry: NotificationLogEntry) -> DomainResult<NotificationLogEntry> {
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn find_by_reminder(
        &self,
        reminder_id: Uuid,
    ) -> DomainResult<Vec<NotificationLogEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|e| e.reminder_id == reminder_id)
            .cloned()
            .collect())
    }

    async fn update_status_by_provider_id(
        &self,
        provider_message_id: &str,
        status: NotificationStatus,
    ) -> DomainResult<bool> {
        let mut entries = self.entries.write().await;
        for entry in entries.iter_mut() {
            if entry.provider_message_id.as_deref() == Some(provider_message_id) {
                entry.status = status;
                entry.updated_at = Utc::now();
                return Ok(true);
            }
        }
        Ok(false)
    }
}
