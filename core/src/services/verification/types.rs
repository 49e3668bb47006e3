//! Types for verification service results

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Result of issuing a verification code (request or resend)
#[derive(Debug, Clone)]
pub struct RequestCodeResult {
    /// Identifier of the created verification record
    pub verification_id: Uuid,
    /// When the issued code expires
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful code verification
#[derive(Debug, Clone)]
pub struct VerifyCodeResult {
    /// Identifier of the verified record
    pub verification_id: Uuid,
    /// When verification completed
    pub verified_at: DateTime<Utc>,
}

/// Requester metadata kept for audit only
#[derive(Debug, Clone, Default)]
pub struct RequesterInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}
