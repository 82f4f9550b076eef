//! Read access to the access log.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::permissions::{PermissionEngine, RoleGate};
use crate::domain::ports::{AccessLogRepository, AuditQuery, UserRepository};
use crate::domain::service_support::{Repositories, clamp_limit, found, map_persistence_error};
use crate::domain::{AccessLogEntry, Actor, Error, StudentAccessRecord, UserId};

/// Implements [`AuditQuery`].
#[derive(Clone)]
pub struct AuditService {
    access_log: Arc<dyn AccessLogRepository>,
    users: Arc<dyn UserRepository>,
    permissions: PermissionEngine,
}

impl AuditService {
    /// Create the service from the shared repositories.
    pub fn new(repos: &Repositories) -> Self {
        Self {
            access_log: Arc::clone(&repos.access_log),
            users: Arc::clone(&repos.users),
            permissions: PermissionEngine::new(repos),
        }
    }
}

#[async_trait]
impl AuditQuery for AuditService {
    async fn recent_entries(
        &self,
        actor: &Actor,
        limit: u32,
    ) -> Result<Vec<AccessLogEntry>, Error> {
        self.permissions
            .require_role(actor, RoleGate::ReadAccessLogs)
            .await?;
        self.access_log
            .recent(clamp_limit(limit))
            .await
            .map_err(map_persistence_error)
    }

    async fn student_access(
        &self,
        actor: &Actor,
        student: UserId,
        limit: u32,
    ) -> Result<Vec<StudentAccessRecord>, Error> {
        self.permissions
            .require_role(actor, RoleGate::ReadAccessLogs)
            .await?;
        found(
            self.users
                .find_by_id(student)
                .await
                .map_err(map_persistence_error)?,
            "student",
        )?;
        self.access_log
            .student_access(student, clamp_limit(limit))
            .await
            .map_err(map_persistence_error)
    }
}
