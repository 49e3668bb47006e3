//! Configuration for the notification scheduler

use crate::services::dispatch::DEFAULT_DISPATCH_TIMEOUT_SECS;

/// Configuration for the notification scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Per-provider-call timeout in seconds
    pub dispatch_timeout_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            dispatch_timeout_secs: DEFAULT_DISPATCH_TIMEOUT_SECS,
        }
    }
}
