//! Port for the append-only access log.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::{AccessLogEntry, NewAccessLogEntry, StudentAccessRecord, UserId};

/// Append-only audit storage. Entries are never updated or deleted by the
/// application.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessLogRepository: Send + Sync {
    /// Append one entry.
    async fn append(&self, entry: &NewAccessLogEntry) -> Result<(), PersistenceError>;

    /// Most recent entries, newest first.
    async fn recent(&self, limit: u32) -> Result<Vec<AccessLogEntry>, PersistenceError>;

    /// Entries targeting `student`, newest first, joined with the acting
    /// account.
    async fn student_access(
        &self,
        student: UserId,
        limit: u32,
    ) -> Result<Vec<StudentAccessRecord>, PersistenceError>;
}
