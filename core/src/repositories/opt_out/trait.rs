//! Opt-out registry trait: the single owned gate over suppression state.
//!
//! Kiosk, dashboard and scheduler all consult this interface instead of
//! reaching into the suppression table directly.

use async_trait::async_trait;

use crate::domain::entities::opt_out::GlobalOptOut;
use crate::errors::DomainResult;

/// Phone-scoped suppression registry
#[async_trait]
pub trait OptOutRegistry: Send + Sync {
    /// Whether the phone is on the suppression list
    async fn is_opted_out(&self, phone: &str) -> DomainResult<bool>;

    /// Register a suppression; re-adding an already suppressed phone is
    /// a no-op that returns the existing record
    async fn add(&self, phone: &str, reason: Option<String>) -> DomainResult<GlobalOptOut>;
}
