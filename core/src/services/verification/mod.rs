//! Phone verification service: issuing and checking one-time codes
//! under rate limits and attempt limits.

mod config;
mod service;
mod types;

pub use config::VerificationConfig;
pub use service::VerificationService;
pub use types::{RequestCodeResult, RequesterInfo, VerifyCodeResult};

#[cfg(test)]
mod tests;
