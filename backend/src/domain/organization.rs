//! Organizations and their memberships.
//!
//! Also hosts the two membership role mappings: [`founder_role`] for the
//! creator of an organization and [`join_role`] for later joiners.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::user::UserRole;
use super::vocabulary::define_vocabulary;
use super::{MembershipId, OrganizationId, UserId};

define_vocabulary! {
    /// Kind of organization.
    pub enum OrganizationType as "organization type" {
        School => "school",
        Community => "community",
    }
}

define_vocabulary! {
    /// Billing state of an organization.
    pub enum SubscriptionStatus as "subscription status" {
        Pending => "pending",
        Active => "active",
        Inactive => "inactive",
    }
}

define_vocabulary! {
    /// Role a user holds inside one organization.
    pub enum MembershipRole as "membership role" {
        Principal => "principal",
        Admin => "admin",
        Teacher => "teacher",
        Student => "student",
        /// Leader of a community organization.
        Chairman => "chairman",
        Member => "member",
    }
}

impl MembershipRole {
    /// Roles allowed to manage the organization.
    #[must_use]
    pub const fn can_manage(self) -> bool {
        matches!(self, Self::Principal | Self::Admin | Self::Chairman)
    }
}

/// Maximum organization name length.
pub const ORGANIZATION_NAME_MAX: usize = 200;

/// School or community organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: OrganizationId,
    pub org_type: OrganizationType,
    pub name: String,
    pub profile: Option<String>,
    pub is_public: bool,
    pub subscription_status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrganization {
    pub org_type: OrganizationType,
    pub name: String,
    pub profile: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// Link between a user and an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: MembershipId,
    pub organization_id: OrganizationId,
    pub user_id: UserId,
    pub role: MembershipRole,
    pub access_code: Option<AccessCode>,
    pub joined_on: NaiveDate,
}

/// Insert payload for a membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMembership {
    pub organization_id: OrganizationId,
    pub user_id: UserId,
    pub role: MembershipRole,
    pub access_code: Option<AccessCode>,
    pub joined_on: NaiveDate,
}

/// Membership joined with the member's account details for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub user_id: UserId,
    pub username: String,
    pub role: MembershipRole,
    pub joined_on: NaiveDate,
}

/// Access code validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessCodeError {
    /// Code was blank once trimmed.
    #[error("access code must not be empty")]
    Empty,
    /// Code exceeded the storage limit.
    #[error("access code must be at most {max} characters")]
    TooLong {
        /// Maximum length.
        max: usize,
    },
}

const ACCESS_CODE_MAX: usize = 50;
const GENERATED_CODE_LEN: usize = 8;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Single-use token recorded on a membership.
///
/// Codes are unique across all memberships, so a code can be presented once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessCode(String);

impl AccessCode {
    /// Validate a caller-supplied code.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccessCodeError> {
        let value = raw.as_ref().trim();
        if value.is_empty() {
            return Err(AccessCodeError::Empty);
        }
        if value.chars().count() > ACCESS_CODE_MAX {
            return Err(AccessCodeError::TooLong {
                max: ACCESS_CODE_MAX,
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Generate a fresh eight character uppercase code.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..GENERATED_CODE_LEN)
            .map(|_| {
                let index = rng.gen_range(0..CODE_ALPHABET.len());
                CODE_ALPHABET.get(index).copied().map_or('X', char::from)
            })
            .collect();
        Self(code)
    }
}

impl AsRef<str> for AccessCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<AccessCode> for String {
    fn from(value: AccessCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for AccessCode {
    type Error = AccessCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Membership role given to the user who creates an organization.
#[must_use]
pub const fn founder_role(account_role: UserRole) -> MembershipRole {
    match account_role {
        UserRole::Principal => MembershipRole::Principal,
        UserRole::CommunityChair => MembershipRole::Chairman,
        _ => MembershipRole::Admin,
    }
}

/// Membership role granted when a user joins an organization.
///
/// Schools distinguish teachers from everyone else; communities make every
/// joiner a plain member whatever their account role.
#[must_use]
pub fn join_role(org_type: OrganizationType, account_role: UserRole) -> MembershipRole {
    match (org_type, account_role) {
        (OrganizationType::School, UserRole::Teacher) => MembershipRole::Teacher,
        (OrganizationType::School, _) => MembershipRole::Student,
        (OrganizationType::Community, _) => MembershipRole::Member,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(UserRole::Principal, MembershipRole::Principal)]
    #[case(UserRole::CommunityChair, MembershipRole::Chairman)]
    #[case(UserRole::Admin, MembershipRole::Admin)]
    #[case(UserRole::Teacher, MembershipRole::Admin)]
    fn founder_role_mapping(#[case] account: UserRole, #[case] expected: MembershipRole) {
        assert_eq!(founder_role(account), expected);
    }

    #[rstest]
    #[case(OrganizationType::School, UserRole::Teacher, MembershipRole::Teacher)]
    #[case(OrganizationType::School, UserRole::Student, MembershipRole::Student)]
    #[case(OrganizationType::School, UserRole::Principal, MembershipRole::Student)]
    #[case(OrganizationType::Community, UserRole::Teacher, MembershipRole::Member)]
    #[case(OrganizationType::Community, UserRole::CommunityChair, MembershipRole::Member)]
    fn join_role_mapping(
        #[case] org_type: OrganizationType,
        #[case] account: UserRole,
        #[case] expected: MembershipRole,
    ) {
        assert_eq!(join_role(org_type, account), expected);
    }

    #[rstest]
    #[case(MembershipRole::Principal, true)]
    #[case(MembershipRole::Admin, true)]
    #[case(MembershipRole::Chairman, true)]
    #[case(MembershipRole::Teacher, false)]
    #[case(MembershipRole::Member, false)]
    fn manager_roles(#[case] role: MembershipRole, #[case] expected: bool) {
        assert_eq!(role.can_manage(), expected);
    }

    #[rstest]
    fn generated_codes_are_uppercase_and_sized() {
        let code = AccessCode::generate();
        assert_eq!(code.as_ref().len(), GENERATED_CODE_LEN);
        assert!(
            code.as_ref()
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[rstest]
    #[case(String::from("   "), AccessCodeError::Empty)]
    #[case("X".repeat(51), AccessCodeError::TooLong { max: 50 })]
    fn rejects_invalid_codes(#[case] raw: String, #[case] expected: AccessCodeError) {
        assert_eq!(AccessCode::new(raw), Err(expected));
    }
}
