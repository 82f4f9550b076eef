//! Authorization over freshly loaded facts.
//!
//! [`PermissionEngine`] reloads the actor's account and relationships on
//! every check, so a role change takes effect on the next request. Pure rule
//! functions live in [`rules`].

pub mod rules;

use std::sync::Arc;

use tracing::info;

pub use self::rules::{RoleGate, StudentDataAccess};
use crate::domain::ports::{ClassRepository, OrganizationRepository, UserRepository};
use crate::domain::service_support::{AuditTrail, Repositories, map_persistence_error};
use crate::domain::{
    Actor, AuditAction, AuditTarget, Class, Content, Error, MembershipRole, OrganizationId,
    TargetKind, User, UserId, UserRole,
};

/// Role and relationship checks shared by every service.
#[derive(Clone)]
pub struct PermissionEngine {
    users: Arc<dyn UserRepository>,
    organizations: Arc<dyn OrganizationRepository>,
    classes: Arc<dyn ClassRepository>,
    audit: AuditTrail,
}

impl PermissionEngine {
    /// Build an engine over the shared repositories.
    pub fn new(repos: &Repositories) -> Self {
        Self {
            users: Arc::clone(&repos.users),
            organizations: Arc::clone(&repos.organizations),
            classes: Arc::clone(&repos.classes),
            audit: AuditTrail::new(repos),
        }
    }

    /// Load the actor's account.
    ///
    /// # Errors
    /// `Unauthorized` when the account no longer exists.
    pub async fn account(&self, actor: &Actor) -> Result<User, Error> {
        self.users
            .find_by_id(actor.user_id())
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::unauthorized("account no longer exists"))
    }

    /// Load the actor's account and check it against a role gate.
    ///
    /// # Errors
    /// `Forbidden` when the account role is not on the gate's allow-list.
    pub async fn require_role(&self, actor: &Actor, gate: RoleGate) -> Result<User, Error> {
        let user = self.account(actor).await?;
        if gate.permits(user.role) {
            return Ok(user);
        }
        info!(user_id = %actor.user_id(), role = %user.role, ?gate, "role gate denied");
        Err(Error::forbidden(format!(
            "only {} may {}",
            role_list(gate.allowed_roles()),
            gate.describe()
        )))
    }

    /// Whether the actor is a platform administrator.
    pub async fn is_admin(&self, actor: &Actor) -> Result<bool, Error> {
        Ok(self.account(actor).await?.role == UserRole::Admin)
    }

    /// Whether the actor is a principal and, when `organization` is given,
    /// holds the principal membership role there.
    pub async fn is_principal_of(
        &self,
        actor: &Actor,
        organization: Option<OrganizationId>,
    ) -> Result<bool, Error> {
        if self.account(actor).await?.role != UserRole::Principal {
            return Ok(false);
        }
        let Some(organization) = organization else {
            return Ok(true);
        };
        let membership = self
            .organizations
            .find_membership(organization, actor.user_id())
            .await
            .map_err(map_persistence_error)?;
        Ok(membership.is_some_and(|m| m.role == MembershipRole::Principal))
    }

    /// Whether the actor teaches the class or is actively enrolled in it.
    pub async fn can_access_class(&self, actor: &Actor, class: &Class) -> Result<bool, Error> {
        if class.teacher_id == actor.user_id() {
            return Ok(true);
        }
        let enrollment = self
            .classes
            .find_enrollment(class.id, actor.user_id())
            .await
            .map_err(map_persistence_error)?;
        Ok(rules::class_participant(
            actor.user_id(),
            class,
            enrollment.as_ref(),
        ))
    }

    /// Decide which branch, if any, grants the actor access to a student's
    /// data. Grants through the admin, principal and teacher branches are
    /// written to the access log.
    pub async fn student_data_access(
        &self,
        actor: &Actor,
        student: UserId,
    ) -> Result<StudentDataAccess, Error> {
        if actor.user_id() == student {
            return Ok(StudentDataAccess::SelfAccess);
        }
        let decision = match self.account(actor).await?.role {
            UserRole::Admin => StudentDataAccess::Admin,
            UserRole::Principal if self.principal_shares_org(actor, student).await? => {
                StudentDataAccess::Principal
            }
            UserRole::Teacher if self.teaches_student(actor, student).await? => {
                StudentDataAccess::Teacher
            }
            _ => StudentDataAccess::Denied,
        };
        if decision.is_audited() {
            self.audit
                .record(
                    actor,
                    AuditAction::AccessStudentData,
                    AuditTarget::new(TargetKind::Student, student),
                )
                .await;
        }
        Ok(decision)
    }

    /// Boolean form of [`Self::student_data_access`].
    pub async fn can_access_student_data(
        &self,
        actor: &Actor,
        student: UserId,
    ) -> Result<bool, Error> {
        Ok(self.student_data_access(actor, student).await?.is_granted())
    }

    /// Whether the optional viewer may see a content item.
    pub async fn can_view_content(
        &self,
        viewer: Option<&Actor>,
        content: &Content,
    ) -> Result<bool, Error> {
        if content.is_public {
            return Ok(true);
        }
        let Some(viewer) = viewer else {
            return Ok(false);
        };
        let memberships = if content.organization_id.is_some()
            && content.created_by != viewer.user_id()
        {
            self.organizations
                .memberships_of(viewer.user_id())
                .await
                .map_err(map_persistence_error)?
        } else {
            Vec::new()
        };
        Ok(rules::content_visible(
            content,
            Some(viewer.user_id()),
            &memberships,
        ))
    }

    /// Whether the actor holds a managing membership role in the
    /// organization.
    pub async fn can_manage_organization(
        &self,
        actor: &Actor,
        organization: OrganizationId,
    ) -> Result<bool, Error> {
        let membership = self
            .organizations
            .find_membership(organization, actor.user_id())
            .await
            .map_err(map_persistence_error)?;
        Ok(membership.is_some_and(|m| m.role.can_manage()))
    }

    async fn principal_shares_org(&self, actor: &Actor, student: UserId) -> Result<bool, Error> {
        let own = self
            .organizations
            .memberships_of(actor.user_id())
            .await
            .map_err(map_persistence_error)?;
        if own.is_empty() {
            return Ok(false);
        }
        let theirs = self
            .organizations
            .memberships_of(student)
            .await
            .map_err(map_persistence_error)?;
        Ok(rules::shares_organization(&own, &theirs))
    }

    async fn teaches_student(&self, actor: &Actor, student: UserId) -> Result<bool, Error> {
        let taught = self
            .classes
            .taught_by(actor.user_id())
            .await
            .map_err(map_persistence_error)?;
        if taught.is_empty() {
            return Ok(false);
        }
        let enrollments = self
            .classes
            .enrollments_of_student(student)
            .await
            .map_err(map_persistence_error)?;
        Ok(rules::teaches_enrolled_student(&taught, &enrollments))
    }
}

fn role_list(roles: &[UserRole]) -> String {
    roles
        .iter()
        .map(|role| role.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
