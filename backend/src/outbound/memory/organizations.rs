//! Organizations and memberships.

use async_trait::async_trait;

use super::{MemoryStore, Tables, reject_duplicate, require_row};
use crate::domain::ports::{OrganizationRepository, PersistenceError};
use crate::domain::{
    AccessCode, Member, Membership, MembershipId, NewMembership, NewOrganization, Organization,
    OrganizationId, SubscriptionStatus, UserId,
};

/// Check the membership uniqueness rules without writing anything.
fn check_membership(
    tables: &Tables,
    organization_id: OrganizationId,
    membership: &NewMembership,
) -> Result<(), PersistenceError> {
    require_row(
        tables.users.contains(membership.user_id.get()),
        "organization_members_user_id_fkey",
    )?;
    reject_duplicate(
        tables.memberships.values().any(|row| {
            row.organization_id == organization_id && row.user_id == membership.user_id
        }),
        "organization_members_org_user_key",
    )?;
    if let Some(code) = &membership.access_code {
        reject_duplicate(
            tables
                .memberships
                .values()
                .any(|row| row.access_code.as_ref() == Some(code)),
            "organization_members_access_code_key",
        )?;
    }
    Ok(())
}

fn store_membership(
    tables: &mut Tables,
    organization_id: OrganizationId,
    membership: &NewMembership,
) -> Membership {
    tables.memberships.insert_with(|id| Membership {
        id: MembershipId::new(id),
        organization_id,
        user_id: membership.user_id,
        role: membership.role,
        access_code: membership.access_code.clone(),
        joined_on: membership.joined_on,
    })
}

#[async_trait]
impl OrganizationRepository for MemoryStore {
    async fn create_with_founder(
        &self,
        organization: &NewOrganization,
        founder: &NewMembership,
    ) -> Result<(Organization, Membership), PersistenceError> {
        self.with_tables(|tables| {
            let pending_id = OrganizationId::new(tables.organizations.next_id());
            check_membership(tables, pending_id, founder)?;
            let created = tables.organizations.insert_with(|id| Organization {
                id: OrganizationId::new(id),
                org_type: organization.org_type,
                name: organization.name.clone(),
                profile: organization.profile.clone(),
                is_public: organization.is_public,
                subscription_status: SubscriptionStatus::Pending,
                created_at: organization.created_at,
            });
            let membership = store_membership(tables, created.id, founder);
            Ok((created, membership))
        })
    }

    async fn find_by_id(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, PersistenceError> {
        self.with_tables(|tables| Ok(tables.organizations.get(id.get()).cloned()))
    }

    async fn add_membership(
        &self,
        membership: &NewMembership,
    ) -> Result<Membership, PersistenceError> {
        self.with_tables(|tables| {
            require_row(
                tables.organizations.contains(membership.organization_id.get()),
                "organization_members_org_id_fkey",
            )?;
            check_membership(tables, membership.organization_id, membership)?;
            Ok(store_membership(tables, membership.organization_id, membership))
        })
    }

    async fn find_membership(
        &self,
        organization: OrganizationId,
        user: UserId,
    ) -> Result<Option<Membership>, PersistenceError> {
        self.with_tables(|tables| {
            Ok(tables
                .memberships
                .values()
                .find(|row| row.organization_id == organization && row.user_id == user)
                .cloned())
        })
    }

    async fn memberships_of(&self, user: UserId) -> Result<Vec<Membership>, PersistenceError> {
        self.with_tables(|tables| {
            Ok(tables
                .memberships
                .values()
                .filter(|row| row.user_id == user)
                .cloned()
                .collect())
        })
    }

    async fn list_members(
        &self,
        organization: OrganizationId,
    ) -> Result<Vec<Member>, PersistenceError> {
        self.with_tables(|tables| {
            let mut members: Vec<(MembershipId, Member)> = tables
                .memberships
                .values()
                .filter(|row| row.organization_id == organization)
                .filter_map(|row| {
                    let user = tables.users.get(row.user_id.get())?;
                    Some((
                        row.id,
                        Member {
                            user_id: row.user_id,
                            username: user.username.to_string(),
                            role: row.role,
                            joined_on: row.joined_on,
                        },
                    ))
                })
                .collect();
            members.sort_by_key(|(id, member)| (member.joined_on, *id));
            Ok(members.into_iter().map(|(_, member)| member).collect())
        })
    }

    async fn set_access_code(
        &self,
        membership: MembershipId,
        code: &AccessCode,
    ) -> Result<(), PersistenceError> {
        self.with_tables(|tables| {
            reject_duplicate(
                tables
                    .memberships
                    .values()
                    .any(|row| row.id != membership && row.access_code.as_ref() == Some(code)),
                "organization_members_access_code_key",
            )?;
            if let Some(row) = tables.memberships.get_mut(membership.get()) {
                row.access_code = Some(code.clone());
            }
            Ok(())
        })
    }

    async fn update_subscription(
        &self,
        id: OrganizationId,
        status: SubscriptionStatus,
    ) -> Result<Option<Organization>, PersistenceError> {
        self.with_tables(|tables| {
            Ok(tables.organizations.get_mut(id.get()).map(|row| {
                row.subscription_status = status;
                row.clone()
            }))
        })
    }
}
