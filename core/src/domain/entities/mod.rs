//! Domain entities

pub mod notification_log;
pub mod opt_out;
pub mod phone_verification;
pub mod reminder;

pub use notification_log::{NotificationChannel, NotificationLogEntry, NotificationStatus};
pub use opt_out::GlobalOptOut;
pub use phone_verification::{PhoneVerification, VerificationSource};
pub use reminder::{
    ConsentInfo, NotificationChannels, Reminder, ReminderSource, ReminderType,
};
