//! PostgreSQL-backed [`OrganizationRepository`].

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{OrganizationRepository, PersistenceError};
use crate::domain::{
    AccessCode, Member, Membership, MembershipId, NewMembership, NewOrganization, Organization,
    OrganizationId, SubscriptionStatus, UserId,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    MembershipRow, NewMembershipRow, NewOrganizationRow, OrganizationRow, convert_rows, decode,
};
use super::pool::DbPool;
use super::schema::{organization_members, organizations, users};

/// Diesel adapter for organizations and memberships.
#[derive(Clone)]
pub struct DieselOrganizationRepository {
    pool: DbPool,
}

impl DieselOrganizationRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn membership_row(organization: OrganizationId, membership: &NewMembership) -> NewMembershipRow<'_> {
    NewMembershipRow {
        org_id: organization.get(),
        user_id: membership.user_id.get(),
        role: membership.role.as_str(),
        access_code: membership.access_code.as_ref().map(|code| code.as_ref()),
        joined_on: membership.joined_on,
    }
}

#[async_trait]
impl OrganizationRepository for DieselOrganizationRepository {
    async fn create_with_founder(
        &self,
        organization: &NewOrganization,
        founder: &NewMembership,
    ) -> Result<(Organization, Membership), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let org_row = NewOrganizationRow {
            org_type: organization.org_type.as_str(),
            name: organization.name.as_str(),
            profile: organization.profile.as_deref(),
            is_public: organization.is_public,
            created_at: organization.created_at,
        };

        let (org, membership) = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let org: OrganizationRow = diesel::insert_into(organizations::table)
                        .values(&org_row)
                        .returning(OrganizationRow::as_returning())
                        .get_result(conn)
                        .await?;
                    let membership: MembershipRow =
                        diesel::insert_into(organization_members::table)
                            .values(&membership_row(OrganizationId::new(org.id), founder))
                            .returning(MembershipRow::as_returning())
                            .get_result(conn)
                            .await?;
                    Ok((org, membership))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok((Organization::try_from(org)?, Membership::try_from(membership)?))
    }

    async fn find_by_id(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<OrganizationRow> = organizations::table
            .find(id.get())
            .select(OrganizationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Organization::try_from).transpose()
    }

    async fn add_membership(
        &self,
        membership: &NewMembership,
    ) -> Result<Membership, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: MembershipRow = diesel::insert_into(organization_members::table)
            .values(&membership_row(membership.organization_id, membership))
            .returning(MembershipRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Membership::try_from(row)
    }

    async fn find_membership(
        &self,
        organization: OrganizationId,
        user: UserId,
    ) -> Result<Option<Membership>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<MembershipRow> = organization_members::table
            .filter(organization_members::org_id.eq(organization.get()))
            .filter(organization_members::user_id.eq(user.get()))
            .select(MembershipRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Membership::try_from).transpose()
    }

    async fn memberships_of(&self, user: UserId) -> Result<Vec<Membership>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MembershipRow> = organization_members::table
            .filter(organization_members::user_id.eq(user.get()))
            .order(organization_members::id.asc())
            .select(MembershipRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }

    async fn list_members(
        &self,
        organization: OrganizationId,
    ) -> Result<Vec<Member>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(i64, String, String, NaiveDate)> = organization_members::table
            .inner_join(users::table)
            .filter(organization_members::org_id.eq(organization.get()))
            .order((
                organization_members::joined_on.asc(),
                organization_members::id.asc(),
            ))
            .select((
                organization_members::user_id,
                users::username,
                organization_members::role,
                organization_members::joined_on,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(user_id, username, role, joined_on)| {
                Ok(Member {
                    user_id: UserId::new(user_id),
                    username,
                    role: decode(&role)?,
                    joined_on,
                })
            })
            .collect()
    }

    async fn set_access_code(
        &self,
        membership: MembershipId,
        code: &AccessCode,
    ) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(organization_members::table.find(membership.get()))
            .set(organization_members::access_code.eq(Some(code.as_ref())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update_subscription(
        &self,
        id: OrganizationId,
        status: SubscriptionStatus,
    ) -> Result<Option<Organization>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<OrganizationRow> = diesel::update(organizations::table.find(id.get()))
            .set(organizations::subscription_status.eq(status.as_str()))
            .returning(OrganizationRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Organization::try_from).transpose()
    }
}
