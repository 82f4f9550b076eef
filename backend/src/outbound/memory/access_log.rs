//! Append-only access log.

use std::cmp::Reverse;

use async_trait::async_trait;

use super::MemoryStore;
use crate::domain::ports::{AccessLogRepository, PersistenceError};
use crate::domain::{
    AccessLogEntry, AccessLogId, NewAccessLogEntry, StudentAccessRecord, TargetKind, UserId,
};

#[async_trait]
impl AccessLogRepository for MemoryStore {
    async fn append(&self, entry: &NewAccessLogEntry) -> Result<(), PersistenceError> {
        self.with_tables(|tables| {
            tables.access_log.insert_with(|id| AccessLogEntry {
                id: AccessLogId::new(id),
                user_id: entry.user_id,
                action: entry.action.as_str().to_owned(),
                target_type: entry.target.map(|target| target.kind.as_str().to_owned()),
                target_id: entry.target.map(|target| target.id),
                recorded_at: entry.recorded_at,
                origin: entry.origin.map(|addr| addr.to_string()),
            });
            Ok(())
        })
    }

    async fn recent(&self, limit: u32) -> Result<Vec<AccessLogEntry>, PersistenceError> {
        self.with_tables(|tables| {
            let mut rows: Vec<AccessLogEntry> = tables.access_log.values().cloned().collect();
            rows.sort_by_key(|row| Reverse((row.recorded_at, row.id)));
            rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
            Ok(rows)
        })
    }

    async fn student_access(
        &self,
        student: UserId,
        limit: u32,
    ) -> Result<Vec<StudentAccessRecord>, PersistenceError> {
        self.with_tables(|tables| {
            let mut rows: Vec<&AccessLogEntry> = tables
                .access_log
                .values()
                .filter(|entry| {
                    entry.target_type.as_deref() == Some(TargetKind::Student.as_str())
                        && entry.target_id == Some(student.get())
                })
                .collect();
            rows.sort_by_key(|row| Reverse((row.recorded_at, row.id)));
            rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
            Ok(rows
                .into_iter()
                .map(|entry| {
                    let accessor = entry.user_id.and_then(|id| tables.users.get(id.get()));
                    StudentAccessRecord {
                        entry: entry.clone(),
                        accessor_name: accessor.map(|user| user.username.as_ref().to_owned()),
                        accessor_role: accessor.map(|user| user.role),
                    }
                })
                .collect())
        })
    }
}
