//! PostgreSQL-backed [`AccessLogRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccessLogRepository, PersistenceError};
use crate::domain::{AccessLogEntry, NewAccessLogEntry, StudentAccessRecord, TargetKind, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AccessLogRow, NewAccessLogRow, decode};
use super::pool::DbPool;
use super::schema::{access_logs, users};

/// Diesel adapter for the append-only access log.
#[derive(Clone)]
pub struct DieselAccessLogRepository {
    pool: DbPool,
}

impl DieselAccessLogRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessLogRepository for DieselAccessLogRepository {
    async fn append(&self, entry: &NewAccessLogEntry) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAccessLogRow {
            user_id: entry.user_id.map(i64::from),
            action: entry.action.as_str(),
            target_type: entry.target.map(|target| target.kind.as_str()),
            target_id: entry.target.map(|target| target.id),
            recorded_at: entry.recorded_at,
            origin: entry.origin.map(|addr| addr.to_string()),
        };
        diesel::insert_into(access_logs::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<AccessLogEntry>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AccessLogRow> = access_logs::table
            .order((access_logs::recorded_at.desc(), access_logs::id.desc()))
            .limit(i64::from(limit))
            .select(AccessLogRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(AccessLogEntry::from).collect())
    }

    async fn student_access(
        &self,
        student: UserId,
        limit: u32,
    ) -> Result<Vec<StudentAccessRecord>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(AccessLogRow, Option<String>, Option<String>)> = access_logs::table
            .left_join(users::table.on(access_logs::user_id.eq(users::id.nullable())))
            .filter(access_logs::target_type.eq(TargetKind::Student.as_str()))
            .filter(access_logs::target_id.eq(student.get()))
            .order((access_logs::recorded_at.desc(), access_logs::id.desc()))
            .limit(i64::from(limit))
            .select((
                AccessLogRow::as_select(),
                users::username.nullable(),
                users::role.nullable(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, accessor_name, role)| {
                Ok(StudentAccessRecord {
                    entry: row.into(),
                    accessor_name,
                    accessor_role: role.as_deref().map(decode).transpose()?,
                })
            })
            .collect()
    }
}
