//! Business services

pub mod dispatch;
pub mod scheduler;
pub mod verification;

pub use dispatch::{ChannelDispatcher, DispatchOutcome, EmailProviderTrait, SmsProviderTrait};
pub use scheduler::{NotificationScheduler, RunSummary, SchedulerConfig};
pub use verification::{
    RequestCodeResult, RequesterInfo, VerificationConfig, VerificationService, VerifyCodeResult,
};
