//! Tests for organization handlers.

use super::*;
use crate::domain::UserRole;
use crate::inbound::http::test_utils::{TestHub, id_of, login, send};
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use serde_json::{Value, json};

async fn create_org<S>(app: &S, cookie: Cookie<'static>, org_type: &str, is_public: bool) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, org) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/organizations")
            .cookie(cookie)
            .set_json(json!({
                "orgType": org_type,
                "name": "Komodo Primary",
                "isPublic": is_public,
            })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    org
}

async fn join<S>(app: &S, cookie: Cookie<'static>, org: i64, body: Value) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(
        app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/organizations/{org}/members"))
            .cookie(cookie)
            .set_json(body),
    )
    .await
}

#[actix_web::test]
async fn founders_are_listed_as_members() {
    let hub = TestHub::new();
    hub.provision("head", UserRole::Principal).await;
    let app = actix_test::init_service(hub.app()).await;
    let cookie = login(&app, "head").await;

    let org = create_org(&app, cookie.clone(), "school", true).await;
    assert_eq!(org["orgType"], "school");
    assert_eq!(org["isPublic"], true);

    let (status, members) = send(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/organizations/{}/members", id_of(&org)))
            .cookie(cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(members[0]["username"], "head");
    assert_eq!(members[0]["role"], "principal");
}

#[actix_web::test]
async fn students_cannot_found_organizations() {
    let hub = TestHub::new();
    hub.provision("pupil", UserRole::Student).await;
    let app = actix_test::init_service(hub.app()).await;
    let cookie = login(&app, "pupil").await;
    let (status, error) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/organizations")
            .cookie(cookie)
            .set_json(json!({"orgType": "school", "name": "Nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["code"], "forbidden");
}

#[actix_web::test]
async fn unknown_organization_types_are_rejected() {
    let hub = TestHub::new();
    hub.provision("head", UserRole::Principal).await;
    let app = actix_test::init_service(hub.app()).await;
    let cookie = login(&app, "head").await;
    let (status, error) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/organizations")
            .cookie(cookie)
            .set_json(json!({"orgType": "guild", "name": "Dragons"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"]["field"], "orgType");
}

#[actix_web::test]
async fn private_organizations_need_an_access_code() {
    let hub = TestHub::new();
    hub.provision("head", UserRole::Principal).await;
    hub.provision("pupil", UserRole::Student).await;
    let app = actix_test::init_service(hub.app()).await;
    let head = login(&app, "head").await;
    let org = id_of(&create_org(&app, head, "school", false).await);

    let pupil = login(&app, "pupil").await;
    let (status, error) = join(&app, pupil.clone(), org, json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["code"], "invalid_state");

    let (status, membership) = join(&app, pupil, org, json!({"accessCode": "WELCOME1"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(membership["role"], "student");
    assert_eq!(membership["accessCode"], "WELCOME1");
}

#[actix_web::test]
async fn joining_twice_conflicts() {
    let hub = TestHub::new();
    hub.provision("head", UserRole::Principal).await;
    hub.provision("mentor", UserRole::Teacher).await;
    let app = actix_test::init_service(hub.app()).await;
    let head = login(&app, "head").await;
    let org = id_of(&create_org(&app, head, "school", true).await);

    let mentor = login(&app, "mentor").await;
    let (status, membership) = join(&app, mentor.clone(), org, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(membership["role"], "teacher");
    let (status, _) = join(&app, mentor, org, json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn principals_issue_codes_to_student_members() {
    let hub = TestHub::new();
    hub.provision("head", UserRole::Principal).await;
    hub.provision("mentor", UserRole::Teacher).await;
    let pupil_account = hub.provision("pupil", UserRole::Student).await;
    let app = actix_test::init_service(hub.app()).await;
    let head = login(&app, "head").await;
    let org = id_of(&create_org(&app, head.clone(), "school", true).await);
    let mentor = login(&app, "mentor").await;
    join(&app, mentor.clone(), org, json!({})).await;
    let pupil = login(&app, "pupil").await;
    join(&app, pupil, org, json!({})).await;

    let uri = format!("/api/v1/organizations/{org}/access-codes");
    let body = json!({"studentId": pupil_account.id.get()});
    let (status, _) = send(
        &app,
        actix_test::TestRequest::post()
            .uri(&uri)
            .cookie(mentor)
            .set_json(&body),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, issued) = send(
        &app,
        actix_test::TestRequest::post()
            .uri(&uri)
            .cookie(head)
            .set_json(&body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let code = issued["accessCode"].as_str().expect("code");
    assert_eq!(code.len(), 8);
    assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
}

#[actix_web::test]
async fn only_admins_change_subscriptions() {
    let hub = TestHub::new();
    hub.provision("root", UserRole::Admin).await;
    hub.provision("head", UserRole::Principal).await;
    let app = actix_test::init_service(hub.app()).await;
    let head = login(&app, "head").await;
    let org = id_of(&create_org(&app, head.clone(), "school", true).await);
    let uri = format!("/api/v1/organizations/{org}/subscription");

    let (status, _) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&uri)
            .cookie(head)
            .set_json(json!({"status": "active"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let root = login(&app, "root").await;
    let (status, updated) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&uri)
            .cookie(root)
            .set_json(json!({"status": "active"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["subscriptionStatus"], "active");
}

#[actix_web::test]
async fn dashboards_are_for_schools_only() {
    let hub = TestHub::new();
    hub.provision("head", UserRole::Principal).await;
    let app = actix_test::init_service(hub.app()).await;
    let head = login(&app, "head").await;
    let school = id_of(&create_org(&app, head.clone(), "school", true).await);
    let community = id_of(&create_org(&app, head.clone(), "community", true).await);

    let (status, dashboard) = send(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/organizations/{school}/dashboard"))
            .cookie(head.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["organization"]["id"], school);
    assert_eq!(dashboard["classes"], json!([]));

    let (status, _) = send(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/organizations/{community}/dashboard"))
            .cookie(head),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn community_libraries_are_public_without_login() {
    let hub = TestHub::new();
    hub.provision("chair", UserRole::CommunityChair).await;
    let app = actix_test::init_service(hub.app()).await;
    let chair = login(&app, "chair").await;
    let community = id_of(&create_org(&app, chair.clone(), "community", true).await);
    let school = id_of(&create_org(&app, chair, "school", true).await);

    let (status, library) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/api/v1/communities/{community}/library")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(library["organization"]["id"], community);

    let (status, _) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/api/v1/communities/{school}/library")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
