//! Tests for program handlers.

use super::*;
use crate::domain::UserRole;
use crate::inbound::http::test_utils::{TestHub, id_of, login, send};
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

async fn post<S>(app: &S, cookie: &Cookie<'static>, uri: &str, body: Value) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(
        app,
        actix_test::TestRequest::post()
            .uri(uri)
            .cookie(cookie.clone())
            .set_json(body),
    )
    .await
}

async fn dragon_watch<S>(app: &S, cookie: &Cookie<'static>) -> i64
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, program) = post(
        app,
        cookie,
        "/api/v1/programs",
        json!({"name": "Dragon Watch", "programType": "regional"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(program["programType"], "regional");
    id_of(&program)
}

#[rstest]
#[case(UserRole::Student)]
#[case(UserRole::Teacher)]
#[case(UserRole::CommunityMember)]
#[actix_web::test]
async fn only_leaders_create_programs(#[case] role: UserRole) {
    let hub = TestHub::new();
    hub.provision("someone", role).await;
    let app = actix_test::init_service(hub.app()).await;
    let cookie = login(&app, "someone").await;
    let (status, _) = post(
        &app,
        &cookie,
        "/api/v1/programs",
        json!({"name": "Dragon Watch", "programType": "local"}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn unknown_program_types_are_rejected() {
    let hub = TestHub::new();
    hub.provision("chair", UserRole::CommunityChair).await;
    let app = actix_test::init_service(hub.app()).await;
    let cookie = login(&app, "chair").await;
    let (status, error) = post(
        &app,
        &cookie,
        "/api/v1/programs",
        json!({"name": "Dragon Watch", "programType": "galactic"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"]["field"], "programType");
}

#[actix_web::test]
async fn users_enroll_themselves_once() {
    let hub = TestHub::new();
    hub.provision("chair", UserRole::CommunityChair).await;
    hub.provision("pupil", UserRole::Student).await;
    let app = actix_test::init_service(hub.app()).await;
    let chair = login(&app, "chair").await;
    let program = dragon_watch(&app, &chair).await;
    let pupil = login(&app, "pupil").await;
    let uri = format!("/api/v1/programs/{program}/enrollments");

    let (status, enrollment) = post(&app, &pupil, &uri, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(enrollment["enrollee"]["kind"], "user");
    assert_eq!(enrollment["status"], "active");

    let (status, _) = post(&app, &pupil, &uri, json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn organizations_are_enrolled_by_their_managers() {
    let hub = TestHub::new();
    hub.provision("head", UserRole::Principal).await;
    hub.provision("mentor", UserRole::Teacher).await;
    let app = actix_test::init_service(hub.app()).await;
    let head = login(&app, "head").await;
    let (_, org) = post(
        &app,
        &head,
        "/api/v1/organizations",
        json!({"orgType": "school", "name": "Komodo Primary", "isPublic": true}),
    )
    .await;
    let org = id_of(&org);
    let mentor = login(&app, "mentor").await;
    post(&app, &mentor, &format!("/api/v1/organizations/{org}/members"), json!({})).await;
    let program = dragon_watch(&app, &head).await;
    let uri = format!("/api/v1/programs/{program}/enrollments");

    let (status, _) = post(&app, &mentor, &uri, json!({"organizationId": org})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, enrollment) = post(&app, &head, &uri, json!({"organizationId": org})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(enrollment["enrollee"], json!({"kind": "organization", "id": org}));
}

#[actix_web::test]
async fn enrolling_in_a_missing_program_is_not_found() {
    let hub = TestHub::new();
    hub.provision("pupil", UserRole::Student).await;
    let app = actix_test::init_service(hub.app()).await;
    let pupil = login(&app, "pupil").await;
    let (status, _) = post(&app, &pupil, "/api/v1/programs/999/enrollments", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn canvases_keep_the_latest_assets() {
    let hub = TestHub::new();
    hub.provision("chair", UserRole::CommunityChair).await;
    hub.provision("pupil", UserRole::Student).await;
    let app = actix_test::init_service(hub.app()).await;
    let chair = login(&app, "chair").await;
    let program = dragon_watch(&app, &chair).await;
    let pupil = login(&app, "pupil").await;
    let uri = format!("/api/v1/programs/{program}/canvas");

    let mut ids = Vec::new();
    for strokes in [1, 2] {
        let (status, canvas) = send(
            &app,
            actix_test::TestRequest::put()
                .uri(&uri)
                .cookie(pupil.clone())
                .set_json(json!({"assets": {"strokes": strokes}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(canvas["assets"]["strokes"], strokes);
        ids.push(id_of(&canvas));
    }
    assert_eq!(ids[0], ids[1]);
}
