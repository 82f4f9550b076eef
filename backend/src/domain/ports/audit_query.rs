//! Driving port for reading the access log.

use async_trait::async_trait;

use crate::domain::{AccessLogEntry, Actor, Error, StudentAccessRecord, UserId};

/// Access log reads, restricted to platform admins.
#[async_trait]
pub trait AuditQuery: Send + Sync {
    /// Most recent access log entries.
    async fn recent_entries(&self, actor: &Actor, limit: u32)
    -> Result<Vec<AccessLogEntry>, Error>;

    /// Who touched one student's data, newest first.
    async fn student_access(
        &self,
        actor: &Actor,
        student: UserId,
        limit: u32,
    ) -> Result<Vec<StudentAccessRecord>, Error>;
}
