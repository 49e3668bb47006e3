//! Mock implementation of OptOutRegistry for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::opt_out::GlobalOptOut;
use crate::errors::DomainResult;

use super::trait_::OptOutRegistry;

/// In-memory opt-out registry for testing
pub struct MockOptOutRegistry {
    entries: Arc<RwLock<HashMap<String, GlobalOptOut>>>,
}

impl MockOptOutRegistry {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a registry pre-populated with suppressed phones
    pub fn with_phones(phones: &[&str]) -> Self {
        let entries: HashMap<String, GlobalOptOut> = phones
            .iter()
            .map(|phone| {
                (
                    phone.to_string(),
                    GlobalOptOut::new(phone.to_string(), None),
                )
            })
            .collect();
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }
}

impl Default for MockOptOutRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OptOutRegistry for MockOptOutRegistry {
    async fn is_opted_out(&self, phone: &str) -> DomainResult<bool> {
        Ok(self.entries.read().await.contains_key(phone))
    }

    async fn add(&self, phone: &str, reason: Option<String>) -> DomainResult<GlobalOptOut> {
        let mut entries = self.entries.write().await;
        if let Some(existing) = entries.get(phone) {
            return Ok(existing.clone());
        }
        let record = GlobalOptOut::new(phone.to_string(), reason);
        entries.insert(phone.to_string(), record.clone());
        Ok(record)
    }
}
