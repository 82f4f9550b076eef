//! Driving port for organizations and memberships.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{
    AccessCode, Actor, Class, Content, Error, Member, Membership, Organization, OrganizationId,
    OrganizationType, SubscriptionStatus, UserId,
};

/// Fields for a new organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrganizationRequest {
    pub org_type: OrganizationType,
    pub name: String,
    pub profile: Option<String>,
    pub is_public: bool,
}

/// Overview of a school for its principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolDashboard {
    pub organization: Organization,
    pub teachers: Vec<Member>,
    pub students: Vec<Member>,
    pub classes: Vec<Class>,
    pub library_items: usize,
    pub subscription_status: SubscriptionStatus,
}

/// Member entry shown in a public community listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicMember {
    pub user_id: UserId,
    pub username: String,
    pub bio: Option<String>,
}

/// Public view of a community organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityLibrary {
    pub organization: Organization,
    pub content: Vec<Content>,
    pub members: Vec<PublicMember>,
}

/// Organization use-cases consumed by inbound adapters.
#[async_trait]
pub trait Organizations: Send + Sync {
    /// Create an organization with the actor as founding member.
    async fn create_organization(
        &self,
        actor: &Actor,
        request: CreateOrganizationRequest,
    ) -> Result<Organization, Error>;

    /// Join an organization; private organizations need an access code.
    ///
    /// # Errors
    /// `Conflict` when the actor is already a member.
    async fn join_organization(
        &self,
        actor: &Actor,
        organization: OrganizationId,
        access_code: Option<AccessCode>,
    ) -> Result<Membership, Error>;

    /// Members of an organization, visible to members and admins.
    async fn list_members(
        &self,
        actor: &Actor,
        organization: OrganizationId,
    ) -> Result<Vec<Member>, Error>;

    /// Issue an access code for a student member.
    async fn generate_access_code(
        &self,
        actor: &Actor,
        organization: OrganizationId,
        student: UserId,
    ) -> Result<AccessCode, Error>;

    /// Change the subscription status (platform admins only).
    async fn update_subscription(
        &self,
        actor: &Actor,
        organization: OrganizationId,
        status: SubscriptionStatus,
    ) -> Result<Organization, Error>;

    /// School overview for one of its principals.
    async fn school_dashboard(
        &self,
        actor: &Actor,
        organization: OrganizationId,
    ) -> Result<SchoolDashboard, Error>;

    /// Public library of a public community; no login needed.
    async fn community_library(
        &self,
        organization: OrganizationId,
    ) -> Result<CommunityLibrary, Error>;
}
