//! Tests for the organization service.

use rstest::rstest;

use super::*;
use crate::domain::test_fixtures::{MockPorts, actor, class, fixed_now, membership, today, user};
use crate::domain::{ErrorCode, MembershipId, UserProfile};

fn service(ports: MockPorts) -> OrganizationService {
    OrganizationService::new(&ports.into_repositories())
}

fn organization(id: i64, org_type: OrganizationType, is_public: bool) -> Organization {
    Organization {
        id: OrganizationId::new(id),
        org_type,
        name: format!("Org {id}"),
        profile: None,
        is_public,
        subscription_status: SubscriptionStatus::Pending,
        created_at: fixed_now(),
    }
}

fn member(user: i64, role: MembershipRole) -> Member {
    Member {
        user_id: UserId::new(user),
        username: format!("user{user}"),
        role,
        joined_on: today(),
    }
}

fn request(org_type: OrganizationType) -> CreateOrganizationRequest {
    CreateOrganizationRequest {
        org_type,
        name: "  Komodo Island School ".to_owned(),
        profile: None,
        is_public: true,
    }
}

#[rstest]
#[case(UserRole::Admin, MembershipRole::Admin)]
#[case(UserRole::Principal, MembershipRole::Principal)]
#[case(UserRole::CommunityChair, MembershipRole::Chairman)]
#[tokio::test]
async fn creator_becomes_founding_member(
    #[case] role: UserRole,
    #[case] expected: MembershipRole,
) {
    let mut ports = MockPorts::new().with_account(user(1, role));
    ports
        .organizations
        .expect_create_with_founder()
        .withf(move |org, founder| {
            org.name == "Komodo Island School"
                && founder.user_id == UserId::new(1)
                && founder.role == expected
                && founder.joined_on == today()
        })
        .times(1)
        .returning(|org, founder| {
            Ok((
                organization(9, org.org_type, org.is_public),
                membership(9, founder.user_id.get(), founder.role),
            ))
        });
    ports
        .access_log
        .expect_append()
        .withf(|entry| {
            entry.action == AuditAction::CreateOrganization
                && entry.target == Some(AuditTarget::new(TargetKind::Organization, 9_i64))
        })
        .times(1)
        .returning(|_| Ok(()));

    let created = service(ports)
        .create_organization(&actor(1), request(OrganizationType::School))
        .await
        .expect("organization created");
    assert_eq!(created.id, OrganizationId::new(9));
}

#[rstest]
#[tokio::test]
async fn teachers_cannot_create_organizations() {
    let ports = MockPorts::new().with_account(user(2, UserRole::Teacher));
    let err = service(ports)
        .create_organization(&actor(2), request(OrganizationType::School))
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn failed_creation_reports_no_organization() {
    let mut ports = MockPorts::new().with_account(user(1, UserRole::Admin));
    ports
        .organizations
        .expect_create_with_founder()
        .return_once(|_, _| Err(PersistenceError::unavailable("connection reset")));
    let err = service(ports)
        .create_organization(&actor(1), request(OrganizationType::Community))
        .await
        .expect_err("store down");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn private_organization_requires_access_code() {
    let mut ports = MockPorts::new().with_account(user(3, UserRole::Student));
    ports
        .organizations
        .expect_find_by_id()
        .return_once(|_| Ok(Some(organization(5, OrganizationType::School, false))));
    ports.organizations.expect_add_membership().never();

    let err = service(ports)
        .join_organization(&actor(3), OrganizationId::new(5), None)
        .await
        .expect_err("code required");
    assert_eq!(err.code(), ErrorCode::InvalidState);
    assert_eq!(err.message(), "access code required");
}

#[rstest]
#[case(OrganizationType::School, UserRole::Teacher, MembershipRole::Teacher)]
#[case(OrganizationType::School, UserRole::Principal, MembershipRole::Student)]
#[case(OrganizationType::Community, UserRole::Teacher, MembershipRole::Member)]
#[tokio::test]
async fn join_assigns_role_from_organization_type(
    #[case] org_type: OrganizationType,
    #[case] account_role: UserRole,
    #[case] expected: MembershipRole,
) {
    let mut ports = MockPorts::new()
        .with_account(user(3, account_role))
        .allow_audit();
    ports
        .organizations
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(organization(5, org_type, true))));
    ports
        .organizations
        .expect_find_membership()
        .return_once(|_, _| Ok(None));
    ports
        .organizations
        .expect_add_membership()
        .withf(move |m| m.role == expected && m.organization_id == OrganizationId::new(5))
        .times(1)
        .returning(|m| Ok(membership(5, m.user_id.get(), m.role)));

    let joined = service(ports)
        .join_organization(&actor(3), OrganizationId::new(5), None)
        .await
        .expect("joined");
    assert_eq!(joined.role, expected);
}

#[rstest]
#[tokio::test]
async fn access_code_is_stored_on_membership() {
    let mut ports = MockPorts::new()
        .with_account(user(3, UserRole::Student))
        .allow_audit();
    ports
        .organizations
        .expect_find_by_id()
        .return_once(|_| Ok(Some(organization(5, OrganizationType::School, false))));
    ports
        .organizations
        .expect_find_membership()
        .return_once(|_, _| Ok(None));
    ports
        .organizations
        .expect_add_membership()
        .withf(|m| {
            m.access_code
                .as_ref()
                .is_some_and(|code| code.as_ref() == "KMD4P9QX")
        })
        .times(1)
        .returning(|m| {
            let mut stored = membership(5, m.user_id.get(), m.role);
            stored.access_code = m.access_code.clone();
            Ok(stored)
        });

    let code = AccessCode::new("KMD4P9QX").expect("valid code");
    let joined = service(ports)
        .join_organization(&actor(3), OrganizationId::new(5), Some(code))
        .await
        .expect("joined with code");
    assert!(joined.access_code.is_some());
}

#[rstest]
#[tokio::test]
async fn duplicate_join_is_a_recoverable_conflict() {
    let mut ports = MockPorts::new().with_account(user(3, UserRole::Student));
    ports
        .organizations
        .expect_find_by_id()
        .return_once(|_| Ok(Some(organization(5, OrganizationType::School, true))));
    ports
        .organizations
        .expect_find_membership()
        .return_once(|_, _| Ok(Some(membership(5, 3, MembershipRole::Student))));
    ports.organizations.expect_add_membership().never();

    let err = service(ports)
        .join_organization(&actor(3), OrganizationId::new(5), None)
        .await
        .expect_err("already joined");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "already joined");
}

#[rstest]
#[case("organization_members_org_user_key", "already joined")]
#[case("organization_members_access_code_key", "access code already used")]
#[tokio::test]
async fn losing_join_race_is_a_conflict(#[case] constraint: &'static str, #[case] message: &str) {
    let mut ports = MockPorts::new().with_account(user(3, UserRole::Student));
    ports
        .organizations
        .expect_find_by_id()
        .return_once(|_| Ok(Some(organization(5, OrganizationType::School, true))));
    ports
        .organizations
        .expect_find_membership()
        .return_once(|_, _| Ok(None));
    ports
        .organizations
        .expect_add_membership()
        .return_once(move |_| Err(PersistenceError::constraint_violation(constraint)));

    let err = service(ports)
        .join_organization(&actor(3), OrganizationId::new(5), None)
        .await
        .expect_err("race lost");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), message);
}

#[rstest]
#[tokio::test]
async fn outsiders_cannot_list_members() {
    let mut ports = MockPorts::new().with_account(user(8, UserRole::Teacher));
    ports
        .organizations
        .expect_find_by_id()
        .return_once(|_| Ok(Some(organization(5, OrganizationType::School, true))));
    ports
        .organizations
        .expect_find_membership()
        .return_once(|_, _| Ok(None));

    let err = service(ports)
        .list_members(&actor(8), OrganizationId::new(5))
        .await
        .expect_err("not a member");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn principal_issues_codes_to_students_only() {
    let mut ports = MockPorts::new().with_account(user(2, UserRole::Principal));
    ports
        .organizations
        .expect_find_by_id()
        .return_once(|_| Ok(Some(organization(5, OrganizationType::School, true))));
    ports
        .organizations
        .expect_find_membership()
        .returning(|org, who| {
            let role = if who == UserId::new(2) {
                MembershipRole::Principal
            } else {
                MembershipRole::Teacher
            };
            Ok(Some(membership(org.get(), who.get(), role)))
        });
    ports.organizations.expect_set_access_code().never();

    let err = service(ports)
        .generate_access_code(&actor(2), OrganizationId::new(5), UserId::new(7))
        .await
        .expect_err("teacher target");
    assert_eq!(err.code(), ErrorCode::InvalidState);
}

#[rstest]
#[tokio::test]
async fn generated_code_is_written_to_student_membership() {
    let mut ports = MockPorts::new()
        .with_account(user(2, UserRole::Principal))
        .allow_audit();
    ports
        .organizations
        .expect_find_by_id()
        .return_once(|_| Ok(Some(organization(5, OrganizationType::School, true))));
    ports
        .organizations
        .expect_find_membership()
        .returning(|org, who| {
            let role = if who == UserId::new(2) {
                MembershipRole::Principal
            } else {
                MembershipRole::Student
            };
            Ok(Some(membership(org.get(), who.get(), role)))
        });
    ports
        .organizations
        .expect_set_access_code()
        .withf(|id, code| *id == MembershipId::new(5007) && code.as_ref().len() == 8)
        .times(1)
        .returning(|_, _| Ok(()));

    let code = service(ports)
        .generate_access_code(&actor(2), OrganizationId::new(5), UserId::new(7))
        .await
        .expect("code issued");
    assert_eq!(code.as_ref().len(), 8);
}

#[rstest]
#[tokio::test]
async fn school_dashboard_groups_members() {
    let mut ports = MockPorts::new().with_account(user(2, UserRole::Principal));
    ports
        .organizations
        .expect_find_by_id()
        .return_once(|_| Ok(Some(organization(5, OrganizationType::School, false))));
    ports
        .organizations
        .expect_find_membership()
        .return_once(|_, _| Ok(Some(membership(5, 2, MembershipRole::Principal))));
    ports.organizations.expect_list_members().return_once(|_| {
        Ok(vec![
            member(2, MembershipRole::Principal),
            member(3, MembershipRole::Teacher),
            member(4, MembershipRole::Student),
            member(6, MembershipRole::Student),
        ])
    });
    ports
        .classes
        .expect_in_organization()
        .return_once(|_| Ok(vec![class(1, 5, 3)]));
    ports
        .library
        .expect_organization_content()
        .withf(|_, include_private| *include_private)
        .return_once(|_, _| Ok(Vec::new()));

    let dashboard = service(ports)
        .school_dashboard(&actor(2), OrganizationId::new(5))
        .await
        .expect("dashboard");
    assert_eq!(dashboard.teachers.len(), 1);
    assert_eq!(dashboard.students.len(), 2);
    assert_eq!(dashboard.classes.len(), 1);
    assert_eq!(dashboard.subscription_status, SubscriptionStatus::Pending);
}

#[rstest]
#[tokio::test]
async fn community_library_lists_only_public_profiles() {
    let mut ports = MockPorts::new();
    ports
        .organizations
        .expect_find_by_id()
        .return_once(|_| Ok(Some(organization(6, OrganizationType::Community, true))));
    ports
        .library
        .expect_organization_content()
        .withf(|_, include_private| !*include_private)
        .return_once(|_, _| Ok(Vec::new()));
    ports.organizations.expect_list_members().return_once(|_| {
        Ok(vec![
            member(3, MembershipRole::Chairman),
            member(4, MembershipRole::Member),
        ])
    });
    ports.users.expect_find_profile().returning(|id| {
        Ok(Some(UserProfile {
            user_id: id,
            avatar_path: None,
            color_scheme: None,
            bio: Some(format!("bio {id}")),
            is_public: id == UserId::new(4),
        }))
    });

    let library = service(ports)
        .community_library(OrganizationId::new(6))
        .await
        .expect("library");
    assert_eq!(library.members.len(), 1);
    assert_eq!(library.members[0].user_id, UserId::new(4));
}

#[rstest]
#[tokio::test]
async fn schools_have_no_public_library() {
    let mut ports = MockPorts::new();
    ports
        .organizations
        .expect_find_by_id()
        .return_once(|_| Ok(Some(organization(5, OrganizationType::School, true))));
    let err = service(ports)
        .community_library(OrganizationId::new(5))
        .await
        .expect_err("not a community");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
