//! Global opt-out entity.
//!
//! A standing, phone-scoped suppression record. Checked before issuing
//! verification codes and again at dispatch time; never silently
//! bypassed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only suppression record keyed by phone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalOptOut {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Suppressed phone number (E.164)
    pub phone: String,

    /// Free-form reason, if the user gave one
    pub reason: Option<String>,

    /// When the opt-out was registered
    pub created_at: DateTime<Utc>,
}

impl GlobalOptOut {
    pub fn new(phone: String, reason: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone,
            reason,
            created_at: Utc::now(),
        }
    }
}
