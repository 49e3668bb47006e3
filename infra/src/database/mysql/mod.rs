//! MySQL repository implementations.
//!
//! Each repository wraps the shared [`sqlx::MySqlPool`] and maps rows
//! into domain entities. SQLx errors surface as
//! `DomainError::Persistence`.

mod notification_log_repository_impl;
mod opt_out_registry_impl;
mod reminder_repository_impl;
mod verification_store_impl;

pub use notification_log_repository_impl::MySqlNotificationLogRepository;
pub use opt_out_registry_impl::MySqlOptOutRegistry;
pub use reminder_repository_impl::MySqlReminderRepository;
pub use verification_store_impl::MySqlVerificationStore;

use ra_core::errors::DomainError;

pub(crate) fn db_err(e: sqlx::Error) -> DomainError {
    DomainError::Persistence {
        message: e.to_string(),
    }
}

pub(crate) fn column_err(column: &str, e: sqlx::Error) -> DomainError {
    DomainError::Persistence {
        message: format!("failed to read column {}: {}", column, e),
    }
}

pub(crate) fn parse_uuid(value: &str) -> Result<uuid::Uuid, DomainError> {
    uuid::Uuid::parse_str(value).map_err(|e| DomainError::Persistence {
        message: format!("invalid UUID in database: {}", e),
    })
}
