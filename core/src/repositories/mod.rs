//! Repository interfaces for domain persistence.
//!
//! Traits define the persistence contract, including the atomicity
//! guarantees the services rely on; implementations live in the
//! infrastructure layer. The in-memory mocks back every service test
//! suite.

pub mod notification_log;
pub mod opt_out;
pub mod reminder;
pub mod verification;

pub use notification_log::{MockNotificationLogRepository, NotificationLogRepository};
pub use opt_out::{MockOptOutRegistry, OptOutRegistry};
pub use reminder::{MockReminderRepository, ReminderRepository};
pub use verification::{
    IssueOutcome, IssuePolicy, MockVerificationStore, VerificationStore,
};
