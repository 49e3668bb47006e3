//! Mock implementation of ReminderRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::reminder::Reminder;
use crate::errors::{DomainError, DomainResult};

use super::trait_::ReminderRepository;

/// In-memory reminder repository for testing
pub struct MockReminderRepository {
    reminders: Arc<RwLock<HashMap<Uuid, Reminder>>>,
}

impl MockReminderRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            reminders: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MockReminderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReminderRepository for MockReminderRepository {
    async fn create(&self, reminder: Reminder) -> DomainResult<Reminder> {
        let mut reminders = self.reminders.write().await;
        reminders.insert(reminder.id, reminder.clone());
        Ok(reminder)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Reminder>> {
        let reminders = self.reminders.read().await;
        Ok(reminders.get(&id).cloned())
    }

    async fn find_due(&self, today: NaiveDate) -> DomainResult<Vec<Reminder>> {
        let reminders = self.reminders.read().await;
        let mut due: Vec<Reminder> = reminders
            .values()
            .filter(|r| r.is_due(today))
            .cloned()
            .collect();
        // deterministic order for assertions
        due.sort_by_key(|r| r.created_at);
        Ok(due)
    }

    async fn update_schedule(
        &self,
        id: Uuid,
        next_notification_date: Option<NaiveDate>,
        last_notification_sent_at: Option<DateTime<Utc>>,
    ) -> DomainResult<()> {
        let mut reminders = self.reminders.write().await;
        let reminder = reminders.get_mut(&id).ok_or(DomainError::NotFound {
            resource: "Reminder".to_string(),
        })?;
        reminder.next_notification_date = next_notification_date;
        if last_notification_sent_at.is_some() {
            reminder.last_notification_sent_at = last_notification_sent_at;
        }
        reminder.updated_at = Utc::now();
        Ok(())
    }

    async fn update(&self, reminder: Reminder) -> DomainResult<Reminder> {
        let mut reminders = self.reminders.write().await;
        if !reminders.contains_key(&reminder.id) {
            return Err(DomainError::NotFound {
                resource: "Reminder".to_string(),
            });
        }
        reminders.insert(reminder.id, reminder.clone());
        Ok(reminder)
    }
}
