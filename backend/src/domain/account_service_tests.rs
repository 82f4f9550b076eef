//! Tests for the account service.

use rstest::rstest;

use super::*;
use crate::domain::ports::PersistenceError;
use crate::domain::test_fixtures::{MockPorts, actor, fixed_now, user};
use crate::domain::ErrorCode;

fn service(ports: MockPorts) -> AccountService {
    AccountService::new(&ports.into_repositories())
}

fn stored(new_user: &NewUser, id: i64) -> User {
    User {
        id: UserId::new(id),
        username: new_user.username.clone(),
        email: new_user.email.clone(),
        password_hash: new_user.password_hash.clone(),
        role: new_user.role,
        created_at: new_user.created_at,
        last_login: None,
    }
}

fn registration(role: UserRole) -> Registration {
    Registration::try_new("ranger_ana", "Ana@Example.org", "komodo-dragon", role)
        .expect("valid registration")
}

#[rstest]
#[tokio::test]
async fn register_hashes_password_and_audits() {
    let mut ports = MockPorts::new();
    ports
        .users
        .expect_insert()
        .withf(|new_user| {
            new_user.email.as_ref() == "ana@example.org"
                && new_user.created_at == fixed_now()
                && new_user
                    .password_hash
                    .verify("komodo-dragon")
                    .unwrap_or(false)
        })
        .times(1)
        .returning(|new_user| Ok(stored(new_user, 11)));
    ports
        .access_log
        .expect_append()
        .withf(|entry| entry.action == AuditAction::Register && entry.user_id == Some(UserId::new(11)))
        .times(1)
        .returning(|_| Ok(()));

    let created = service(ports)
        .register(registration(UserRole::Teacher), None)
        .await
        .expect("registration succeeds");
    assert_eq!(created.id, UserId::new(11));
    assert_eq!(created.role, UserRole::Teacher);
}

#[rstest]
#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let mut ports = MockPorts::new();
    ports
        .users
        .expect_insert()
        .return_once(|_| Err(PersistenceError::constraint_violation("users_username_key")));

    let err = service(ports)
        .register(registration(UserRole::Student), None)
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "username or email already registered");
}

#[rstest]
#[tokio::test]
async fn provision_may_create_admins() {
    let mut ports = MockPorts::new().allow_audit();
    ports
        .users
        .expect_insert()
        .withf(|new_user| new_user.role == UserRole::Admin)
        .returning(|new_user| Ok(stored(new_user, 1)));

    let admin = service(ports)
        .provision("root_admin", "admin@example.org", "changeme-now", UserRole::Admin)
        .await
        .expect("provisioned");
    assert_eq!(admin.role, UserRole::Admin);
}

#[rstest]
#[tokio::test]
async fn provision_validates_password_length() {
    let err = service(MockPorts::new())
        .provision("root_admin", "admin@example.org", "short", UserRole::Admin)
        .await
        .expect_err("too short");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn login_stamps_last_login() {
    let mut account = user(4, UserRole::Student);
    account.password_hash = PasswordHash::generate("open-sesame").expect("hash");
    let mut ports = MockPorts::new();
    ports
        .users
        .expect_find_by_username()
        .return_once(move |_| Ok(Some(account)));
    ports
        .users
        .expect_record_login()
        .withf(|id, at| *id == UserId::new(4) && *at == fixed_now())
        .times(1)
        .return_once(|_, _| Ok(()));
    ports
        .access_log
        .expect_append()
        .withf(|entry| entry.action == AuditAction::Login)
        .times(1)
        .returning(|_| Ok(()));

    let credentials = LoginCredentials::try_from_parts("user4", "open-sesame").expect("creds");
    let logged_in = service(ports)
        .login(&credentials, None)
        .await
        .expect("login succeeds");
    assert_eq!(logged_in.last_login, Some(fixed_now()));
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn failed_login_is_anonymous_and_unauthorized(#[case] known_user: bool) {
    let mut account = user(4, UserRole::Student);
    account.password_hash = PasswordHash::generate("open-sesame").expect("hash");
    let mut ports = MockPorts::new();
    ports
        .users
        .expect_find_by_username()
        .return_once(move |_| Ok(known_user.then_some(account)));
    ports
        .access_log
        .expect_append()
        .withf(|entry| entry.action == AuditAction::LoginFailed && entry.user_id.is_none())
        .times(1)
        .returning(|_| Ok(()));

    let credentials = LoginCredentials::try_from_parts("user4", "wrong-guess").expect("creds");
    let err = service(ports)
        .login(&credentials, None)
        .await
        .expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "invalid username or password");
}

#[rstest]
#[tokio::test]
async fn update_profile_upserts_for_actor() {
    let mut ports = MockPorts::new()
        .with_account(user(3, UserRole::CommunityMember))
        .allow_audit();
    ports
        .users
        .expect_upsert_profile()
        .withf(|profile| profile.user_id == UserId::new(3) && profile.is_public)
        .times(1)
        .returning(|profile| Ok(profile.clone()));

    let profile = service(ports)
        .update_profile(
            &actor(3),
            ProfileUpdate {
                bio: Some("Birdwatcher".to_owned()),
                is_public: true,
                ..ProfileUpdate::default()
            },
        )
        .await
        .expect("profile saved");
    assert_eq!(profile.bio.as_deref(), Some("Birdwatcher"));
}

#[rstest]
#[case::avatar(
    ProfileUpdate { avatar_path: Some(format!("avatars/{}.png", "a".repeat(250))), ..ProfileUpdate::default() },
    "avatarPath must be at most 255 characters",
)]
#[case::color_scheme(
    ProfileUpdate { color_scheme: Some("jungle-".repeat(8)), ..ProfileUpdate::default() },
    "colorScheme must be at most 50 characters",
)]
#[tokio::test]
async fn oversized_profile_fields_are_rejected_before_storage(
    #[case] update: ProfileUpdate,
    #[case] message: &str,
) {
    let ports = MockPorts::new().with_account(user(3, UserRole::CommunityMember));

    let err = service(ports)
        .update_profile(&actor(3), update)
        .await
        .expect_err("too long");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), message);
}

#[rstest]
#[tokio::test]
async fn student_record_is_forbidden_to_unrelated_users() {
    let ports = MockPorts::new().with_account(user(5, UserRole::Student));
    let err = service(ports)
        .student_record(&actor(5), UserId::new(6))
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn students_can_read_their_own_record() {
    let mut ports = MockPorts::new().with_account(user(6, UserRole::Student));
    ports
        .submissions
        .expect_submissions_of_student()
        .return_once(|_| Ok(Vec::new()));
    ports
        .submissions
        .expect_assessments_of_student()
        .return_once(|_| Ok(Vec::new()));

    let record = service(ports)
        .student_record(&actor(6), UserId::new(6))
        .await
        .expect("own record");
    assert_eq!(record.username, "user6");
    assert!(record.submissions.is_empty());
}
