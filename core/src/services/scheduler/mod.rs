//! Notification scheduler: selects due reminders, dispatches through
//! the configured channels and advances each reminder's schedule.

mod config;
mod service;
mod types;

pub use config::SchedulerConfig;
pub use service::NotificationScheduler;
pub use types::RunSummary;

#[cfg(test)]
mod tests;
