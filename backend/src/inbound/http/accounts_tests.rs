//! Tests for account handlers.

use super::*;
use crate::inbound::http::test_utils::{PASSWORD, TestHub, id_of, login, send};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

fn register_body(username: &str, role: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{username}@komodo.test"),
        "password": PASSWORD,
        "role": role,
    })
}

#[actix_web::test]
async fn registered_users_can_log_in_and_see_themselves() {
    let hub = TestHub::new();
    let app = actix_test::init_service(hub.app()).await;

    let (status, created) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(register_body("ranger", "student")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["role"], "student");
    assert!(created.get("passwordHash").is_none());

    let cookie = login(&app, "ranger").await;
    let (status, me) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(id_of(&me), id_of(&created));
    assert_eq!(me["username"], "ranger");
    assert!(me["lastLogin"].is_string());
}

#[rstest]
#[case(register_body("ranger", "admin"), "role")]
#[case(register_body("ranger", "wizard"), "role")]
#[case(register_body("r", "student"), "username")]
#[case(json!({"username": "ranger", "email": "nope", "password": PASSWORD, "role": "student"}), "email")]
#[case(json!({"username": "ranger", "email": "r@komodo.test", "password": "short", "role": "student"}), "password")]
#[actix_web::test]
async fn invalid_registrations_name_the_field(#[case] body: Value, #[case] field: &str) {
    let hub = TestHub::new();
    let app = actix_test::init_service(hub.app()).await;
    let (status, error) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "invalid_request");
    assert_eq!(error["details"]["field"], field);
}

#[actix_web::test]
async fn duplicate_usernames_conflict() {
    let hub = TestHub::new();
    hub.provision("ranger", UserRole::Student).await;
    let app = actix_test::init_service(hub.app()).await;
    let (status, error) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(register_body("ranger", "teacher")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "conflict");
}

#[actix_web::test]
async fn malformed_bodies_are_bad_requests() {
    let hub = TestHub::new();
    let app = actix_test::init_service(hub.app()).await;
    let (status, error) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/accounts")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"username\":"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"]["code"], "malformed_body");
}

#[rstest]
#[case("   ", "password", "username", "empty_username")]
#[case("ranger", "", "password", "empty_password")]
#[actix_web::test]
async fn blank_login_fields_are_rejected(
    #[case] username: &str,
    #[case] password: &str,
    #[case] field: &str,
    #[case] code: &str,
) {
    let hub = TestHub::new();
    let app = actix_test::init_service(hub.app()).await;
    let (status, error) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(LoginRequest {
                username: username.into(),
                password: password.into(),
            }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"]["field"], field);
    assert_eq!(error["details"]["code"], code);
}

#[actix_web::test]
async fn wrong_password_is_unauthorised_without_a_cookie() {
    let hub = TestHub::new();
    hub.provision("ranger", UserRole::Student).await;
    let app = actix_test::init_service(hub.app()).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"username": "ranger", "password": "not-the-password"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.response().cookies().all(|c| c.name() != "session"));
}

#[actix_web::test]
async fn current_user_requires_login() {
    let hub = TestHub::new();
    let app = actix_test::init_service(hub.app()).await;
    let (status, error) =
        send(&app, actix_test::TestRequest::get().uri("/api/v1/users/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error["code"], "unauthorized");
}

#[actix_web::test]
async fn logout_expires_the_session_cookie() {
    let hub = TestHub::new();
    hub.provision("ranger", UserRole::Student).await;
    let app = actix_test::init_service(hub.app()).await;
    let cookie = login(&app, "ranger").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let cleared = res
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .map(|c| c.into_owned())
        .expect("removal cookie");

    let (status, _) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cleared),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn profile_updates_are_returned() {
    let hub = TestHub::new();
    let user = hub.provision("ranger", UserRole::CommunityMember).await;
    let app = actix_test::init_service(hub.app()).await;
    let cookie = login(&app, "ranger").await;

    let (status, profile) = send(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/users/me/profile")
            .cookie(cookie)
            .set_json(ProfileRequest {
                bio: Some("Counting dragons on Rinca".into()),
                is_public: true,
                ..ProfileRequest::default()
            }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["userId"], user.id.get());
    assert_eq!(profile["bio"], "Counting dragons on Rinca");
    assert_eq!(profile["isPublic"], true);
}

#[actix_web::test]
async fn student_records_are_private_to_unrelated_teachers() {
    let hub = TestHub::new();
    let student = hub.provision("pupil", UserRole::Student).await;
    hub.provision("mentor", UserRole::Teacher).await;
    let app = actix_test::init_service(hub.app()).await;

    let uri = format!("/api/v1/students/{}/record", student.id.get());
    let teacher_cookie = login(&app, "mentor").await;
    let (status, _) = send(
        &app,
        actix_test::TestRequest::get()
            .uri(&uri)
            .cookie(teacher_cookie),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let student_cookie = login(&app, "pupil").await;
    let (status, record) = send(
        &app,
        actix_test::TestRequest::get()
            .uri(&uri)
            .cookie(student_cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["studentId"], student.id.get());
    assert_eq!(record["submissions"], json!([]));
}

#[actix_web::test]
async fn non_numeric_ids_are_bad_requests() {
    let hub = TestHub::new();
    hub.provision("pupil", UserRole::Student).await;
    let app = actix_test::init_service(hub.app()).await;
    let cookie = login(&app, "pupil").await;
    let (status, error) = send(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/students/abc/record")
            .cookie(cookie),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"]["code"], "malformed_path");
}
