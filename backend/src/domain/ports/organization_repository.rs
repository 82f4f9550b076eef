//! Port for organization and membership persistence.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::{
    AccessCode, Member, Membership, MembershipId, NewMembership, NewOrganization, Organization,
    OrganizationId, SubscriptionStatus, UserId,
};

/// Storage for organizations and the memberships linking users to them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Insert an organization and its founding membership in one
    /// transaction. Either both rows become visible or neither does.
    ///
    /// `founder.organization_id` is ignored; the new organization's id is
    /// used instead.
    async fn create_with_founder(
        &self,
        organization: &NewOrganization,
        founder: &NewMembership,
    ) -> Result<(Organization, Membership), PersistenceError>;

    /// Fetch an organization by id.
    async fn find_by_id(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, PersistenceError>;

    /// Insert a membership. A second membership for the same (user,
    /// organization) pair, or a reused access code, surfaces as
    /// [`PersistenceError::ConstraintViolation`].
    async fn add_membership(
        &self,
        membership: &NewMembership,
    ) -> Result<Membership, PersistenceError>;

    /// Fetch the membership of `user` in `organization`.
    async fn find_membership(
        &self,
        organization: OrganizationId,
        user: UserId,
    ) -> Result<Option<Membership>, PersistenceError>;

    /// Every membership held by `user`.
    async fn memberships_of(&self, user: UserId) -> Result<Vec<Membership>, PersistenceError>;

    /// Members of an organization with their usernames, oldest first.
    async fn list_members(
        &self,
        organization: OrganizationId,
    ) -> Result<Vec<Member>, PersistenceError>;

    /// Record an access code on an existing membership.
    async fn set_access_code(
        &self,
        membership: MembershipId,
        code: &AccessCode,
    ) -> Result<(), PersistenceError>;

    /// Change the subscription status, returning the updated organization.
    async fn update_subscription(
        &self,
        id: OrganizationId,
        status: SubscriptionStatus,
    ) -> Result<Option<Organization>, PersistenceError>;
}
