//! Organization service: creation, membership, access codes and the school
//! and community views.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::permissions::{PermissionEngine, RoleGate};
use crate::domain::ports::{
    ClassRepository, CommunityLibrary, CreateOrganizationRequest, LibraryRepository,
    OrganizationRepository, Organizations, PersistenceError, PublicMember, SchoolDashboard,
    UserRepository,
};
use crate::domain::service_support::{
    AuditTrail, Repositories, bounded_text, found, map_persistence_error, map_write_error,
};
use crate::domain::{
    AccessCode, Actor, AuditAction, AuditTarget, Error, Member, Membership, MembershipRole,
    NewMembership, NewOrganization, ORGANIZATION_NAME_MAX, Organization, OrganizationId,
    OrganizationType, SubscriptionStatus, TargetKind, UserId, UserRole, founder_role, join_role,
};

/// Implements [`Organizations`].
#[derive(Clone)]
pub struct OrganizationService {
    organizations: Arc<dyn OrganizationRepository>,
    classes: Arc<dyn ClassRepository>,
    library: Arc<dyn LibraryRepository>,
    users: Arc<dyn UserRepository>,
    permissions: PermissionEngine,
    audit: AuditTrail,
    clock: Arc<dyn Clock>,
}

impl OrganizationService {
    /// Create the service from the shared repositories.
    pub fn new(repos: &Repositories) -> Self {
        Self {
            organizations: Arc::clone(&repos.organizations),
            classes: Arc::clone(&repos.classes),
            library: Arc::clone(&repos.library),
            users: Arc::clone(&repos.users),
            permissions: PermissionEngine::new(repos),
            audit: AuditTrail::new(repos),
            clock: Arc::clone(&repos.clock),
        }
    }

    async fn organization(&self, id: OrganizationId) -> Result<Organization, Error> {
        found(
            self.organizations
                .find_by_id(id)
                .await
                .map_err(map_persistence_error)?,
            "organization",
        )
    }

    async fn public_members(&self, members: Vec<Member>) -> Result<Vec<PublicMember>, Error> {
        let mut listed = Vec::new();
        for member in members {
            let profile = self
                .users
                .find_profile(member.user_id)
                .await
                .map_err(map_persistence_error)?;
            if let Some(profile) = profile.filter(|p| p.is_public) {
                listed.push(PublicMember {
                    user_id: member.user_id,
                    username: member.username,
                    bio: profile.bio,
                });
            }
        }
        Ok(listed)
    }
}

fn join_conflict(error: PersistenceError) -> Error {
    match error {
        PersistenceError::ConstraintViolation { constraint } if constraint.contains("access_code") => {
            Error::conflict("access code already used")
                .with_details(json!({ "constraint": constraint }))
        }
        other => map_write_error("already joined")(other),
    }
}

#[async_trait]
impl Organizations for OrganizationService {
    async fn create_organization(
        &self,
        actor: &Actor,
        request: CreateOrganizationRequest,
    ) -> Result<Organization, Error> {
        let founder = self
            .permissions
            .require_role(actor, RoleGate::CreateOrganization)
            .await?;
        let name = bounded_text("name", &request.name, ORGANIZATION_NAME_MAX)?;
        let now = self.clock.utc();
        let organization = NewOrganization {
            org_type: request.org_type,
            name,
            profile: request.profile,
            is_public: request.is_public,
            created_at: now,
        };
        let membership = NewMembership {
            organization_id: OrganizationId::new(0),
            user_id: founder.id,
            role: founder_role(founder.role),
            access_code: None,
            joined_on: now.date_naive(),
        };
        let (created, _) = self
            .organizations
            .create_with_founder(&organization, &membership)
            .await
            .map_err(map_write_error("organization could not be created"))?;
        info!(organization_id = %created.id, founder = %founder.id, "organization created");
        self.audit
            .record(
                actor,
                AuditAction::CreateOrganization,
                AuditTarget::new(TargetKind::Organization, created.id),
            )
            .await;
        Ok(created)
    }

    async fn join_organization(
        &self,
        actor: &Actor,
        organization: OrganizationId,
        access_code: Option<AccessCode>,
    ) -> Result<Membership, Error> {
        let account = self.permissions.account(actor).await?;
        let org = self.organization(organization).await?;
        if !org.is_public && access_code.is_none() {
            return Err(Error::invalid_state("access code required"));
        }
        let existing = self
            .organizations
            .find_membership(org.id, account.id)
            .await
            .map_err(map_persistence_error)?;
        if existing.is_some() {
            return Err(Error::conflict("already joined"));
        }
        let membership = NewMembership {
            organization_id: org.id,
            user_id: account.id,
            role: join_role(org.org_type, account.role),
            access_code,
            joined_on: self.clock.utc().date_naive(),
        };
        let joined = self
            .organizations
            .add_membership(&membership)
            .await
            .map_err(join_conflict)?;
        self.audit
            .record(
                actor,
                AuditAction::JoinOrganization,
                AuditTarget::new(TargetKind::Organization, org.id),
            )
            .await;
        Ok(joined)
    }

    async fn list_members(
        &self,
        actor: &Actor,
        organization: OrganizationId,
    ) -> Result<Vec<Member>, Error> {
        let account = self.permissions.account(actor).await?;
        let org = self.organization(organization).await?;
        if account.role != UserRole::Admin {
            let membership = self
                .organizations
                .find_membership(org.id, account.id)
                .await
                .map_err(map_persistence_error)?;
            if membership.is_none() {
                return Err(Error::forbidden("only members may list an organization"));
            }
        }
        self.organizations
            .list_members(org.id)
            .await
            .map_err(map_persistence_error)
    }

    async fn generate_access_code(
        &self,
        actor: &Actor,
        organization: OrganizationId,
        student: UserId,
    ) -> Result<AccessCode, Error> {
        let org = self.organization(organization).await?;
        if !self.permissions.is_principal_of(actor, Some(org.id)).await? {
            return Err(Error::forbidden(
                "only the organization's principal may issue access codes",
            ));
        }
        let membership = found(
            self.organizations
                .find_membership(org.id, student)
                .await
                .map_err(map_persistence_error)?,
            "student membership",
        )?;
        if membership.role != MembershipRole::Student {
            return Err(Error::invalid_state(
                "access codes are only issued to student members",
            ));
        }
        let code = AccessCode::generate();
        self.organizations
            .set_access_code(membership.id, &code)
            .await
            .map_err(map_write_error("access code collision, try again"))?;
        self.audit
            .record(
                actor,
                AuditAction::GenerateAccessCode,
                AuditTarget::new(TargetKind::Student, student),
            )
            .await;
        Ok(code)
    }

    async fn update_subscription(
        &self,
        actor: &Actor,
        organization: OrganizationId,
        status: SubscriptionStatus,
    ) -> Result<Organization, Error> {
        self.permissions
            .require_role(actor, RoleGate::UpdateSubscription)
            .await?;
        let updated = found(
            self.organizations
                .update_subscription(organization, status)
                .await
                .map_err(map_persistence_error)?,
            "organization",
        )?;
        info!(organization_id = %updated.id, %status, "subscription updated");
        self.audit
            .record(
                actor,
                AuditAction::UpdateSubscription,
                AuditTarget::new(TargetKind::Organization, updated.id),
            )
            .await;
        Ok(updated)
    }

    async fn school_dashboard(
        &self,
        actor: &Actor,
        organization: OrganizationId,
    ) -> Result<SchoolDashboard, Error> {
        let org = self.organization(organization).await?;
        if org.org_type != OrganizationType::School {
            return Err(Error::invalid_state("dashboards are only available for schools"));
        }
        if !self.permissions.is_principal_of(actor, Some(org.id)).await? {
            return Err(Error::forbidden("only the school's principal may view its dashboard"));
        }
        let members = self
            .organizations
            .list_members(org.id)
            .await
            .map_err(map_persistence_error)?;
        let (teachers, students) = members.into_iter().fold(
            (Vec::new(), Vec::new()),
            |(mut teachers, mut students), member| {
                match member.role {
                    MembershipRole::Teacher => teachers.push(member),
                    MembershipRole::Student => students.push(member),
                    _ => {}
                }
                (teachers, students)
            },
        );
        let classes = self
            .classes
            .in_organization(org.id)
            .await
            .map_err(map_persistence_error)?;
        let library_items = self
            .library
            .organization_content(org.id, true)
            .await
            .map_err(map_persistence_error)?
            .len();
        Ok(SchoolDashboard {
            subscription_status: org.subscription_status,
            organization: org,
            teachers,
            students,
            classes,
            library_items,
        })
    }

    async fn community_library(
        &self,
        organization: OrganizationId,
    ) -> Result<CommunityLibrary, Error> {
        let org = self.organization(organization).await?;
        if org.org_type != OrganizationType::Community || !org.is_public {
            return Err(Error::not_found("community not found"));
        }
        let content = self
            .library
            .organization_content(org.id, false)
            .await
            .map_err(map_persistence_error)?;
        let members = self
            .organizations
            .list_members(org.id)
            .await
            .map_err(map_persistence_error)?;
        let members = self.public_members(members).await?;
        Ok(CommunityLibrary {
            organization: org,
            content,
            members,
        })
    }
}

#[cfg(test)]
#[path = "organization_service_tests.rs"]
mod tests;
