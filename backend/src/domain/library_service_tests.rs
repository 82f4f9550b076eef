//! Tests for the library service.

use chrono::Duration;
use rstest::rstest;

use super::*;
use crate::domain::test_fixtures::{MockPorts, actor, fixed_now, membership, user};
use crate::domain::{
    AnalyticsId, ErrorCode, MembershipRole, NoteId, OrganizationId, UserId, UserRole,
};

fn service(ports: MockPorts) -> LibraryService {
    LibraryService::new(&ports.into_repositories())
}

fn content(is_public: bool, organization: Option<i64>) -> Content {
    Content {
        id: ContentId::new(4),
        title: "Nesting sites".to_owned(),
        content_type: ContentType::Article,
        body: Some("...".to_owned()),
        created_by: UserId::new(1),
        organization_id: organization.map(OrganizationId::new),
        is_public,
        created_at: fixed_now(),
    }
}

fn sighting(id: i64, verified: bool) -> Sighting {
    Sighting {
        id: SightingId::new(id),
        species_name: "Komodo dragon".to_owned(),
        location: "Rinca".to_owned(),
        observed_at: fixed_now(),
        description: None,
        photo_path: None,
        reported_by: UserId::new(2),
        verified,
        created_at: fixed_now(),
    }
}

#[rstest]
#[tokio::test]
async fn hidden_content_reads_as_missing() {
    let mut ports = MockPorts::new();
    ports
        .library
        .expect_find_content()
        .return_once(|_| Ok(Some(content(false, Some(3)))));

    let err = service(ports)
        .view_content(None, ContentId::new(4))
        .await
        .expect_err("hidden");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn organization_members_can_view_private_content() {
    let mut ports = MockPorts::new();
    ports
        .library
        .expect_find_content()
        .return_once(|_| Ok(Some(content(false, Some(3)))));
    ports
        .organizations
        .expect_memberships_of()
        .return_once(|who| Ok(vec![membership(3, who.get(), MembershipRole::Member)]));

    let seen = service(ports)
        .view_content(Some(actor(9)), ContentId::new(4))
        .await
        .expect("visible");
    assert_eq!(seen.id, ContentId::new(4));
}

#[rstest]
#[tokio::test]
async fn publishing_for_an_organization_needs_membership() {
    let mut ports = MockPorts::new().with_account(user(9, UserRole::CommunityMember));
    ports
        .organizations
        .expect_find_membership()
        .return_once(|_, _| Ok(None));
    ports.library.expect_insert_content().never();

    let err = service(ports)
        .upload_content(
            &actor(9),
            UploadContentRequest {
                title: "Survey".to_owned(),
                content_type: ContentType::Report,
                body: None,
                organization_id: Some(OrganizationId::new(3)),
                is_public: false,
            },
        )
        .await
        .expect_err("not a member");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(0, 1)]
#[case(500, 100)]
#[tokio::test]
async fn public_listing_limit_is_clamped(#[case] requested: u32, #[case] applied: u32) {
    let mut ports = MockPorts::new();
    ports
        .library
        .expect_public_content()
        .withf(move |kind, limit| kind.is_none() && *limit == applied)
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    service(ports)
        .public_content(None, requested)
        .await
        .expect("listing");
}

#[rstest]
#[tokio::test]
async fn future_sightings_are_rejected() {
    let ports = MockPorts::new().with_account(user(2, UserRole::Public));
    let err = service(ports)
        .report_sighting(
            &actor(2),
            ReportSightingRequest {
                species_name: "Komodo dragon".to_owned(),
                location: "Rinca".to_owned(),
                observed_at: fixed_now() + Duration::hours(1),
                description: None,
                photo_path: None,
            },
        )
        .await
        .expect_err("future");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn oversized_photo_paths_are_rejected_before_storage() {
    let ports = MockPorts::new().with_account(user(2, UserRole::Public));
    let err = service(ports)
        .report_sighting(
            &actor(2),
            ReportSightingRequest {
                species_name: "Komodo dragon".to_owned(),
                location: "Rinca".to_owned(),
                observed_at: fixed_now() - Duration::hours(1),
                description: None,
                photo_path: Some("p".repeat(256)),
            },
        )
        .await
        .expect_err("path too long");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "photoPath must be at most 255 characters");
}

#[rstest]
#[case(UserRole::Teacher, true)]
#[case(UserRole::Student, false)]
#[tokio::test]
async fn verification_is_role_gated(#[case] role: UserRole, #[case] allowed: bool) {
    let mut ports = MockPorts::new().with_account(user(5, role)).allow_audit();
    ports
        .library
        .expect_verify_sighting()
        .returning(|id| Ok(Some(sighting(id.get(), true))));

    let result = service(ports)
        .verify_sighting(&actor(5), SightingId::new(8))
        .await;
    assert_eq!(result.is_ok(), allowed);
}

#[rstest]
#[tokio::test]
async fn browse_drops_blank_filters() {
    let mut ports = MockPorts::new();
    ports
        .library
        .expect_browse_sightings()
        .withf(|filter, _| {
            filter.species_name.is_none()
                && filter.location.as_deref() == Some("Rinca")
                && filter.verified_only
        })
        .times(1)
        .returning(|_, _| Ok(vec![sighting(1, true)]));

    let found = service(ports)
        .browse_sightings(
            SightingFilter {
                species_name: Some("  ".to_owned()),
                location: Some(" Rinca ".to_owned()),
                verified_only: true,
            },
            20,
        )
        .await
        .expect("browse");
    assert_eq!(found.len(), 1);
}

#[rstest]
#[tokio::test]
async fn notes_need_an_existing_target() {
    let mut ports = MockPorts::new().with_account(user(7, UserRole::Teacher));
    ports
        .library
        .expect_find_sighting()
        .return_once(|_| Ok(None));
    ports.library.expect_insert_note().never();

    let err = service(ports)
        .add_note(
            &actor(7),
            AddNoteRequest {
                target_type: NoteTargetType::Sighting,
                target_id: 77,
                text: "Check the photo".to_owned(),
            },
        )
        .await
        .expect_err("missing target");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "sighting not found");
}

#[rstest]
#[tokio::test]
async fn notes_attach_to_content() {
    let mut ports = MockPorts::new()
        .with_account(user(7, UserRole::Teacher))
        .allow_audit();
    ports
        .library
        .expect_find_content()
        .return_once(|_| Ok(Some(content(true, None))));
    ports.library.expect_insert_note().times(1).returning(|n| {
        Ok(Note {
            id: NoteId::new(1),
            teacher_id: n.teacher_id,
            target_type: n.target_type,
            target_id: n.target_id,
            text: n.text.clone(),
            created_at: n.created_at,
        })
    });

    let note = service(ports)
        .add_note(
            &actor(7),
            AddNoteRequest {
                target_type: NoteTargetType::Content,
                target_id: 4,
                text: " Great sources ".to_owned(),
            },
        )
        .await
        .expect("note added");
    assert_eq!(note.text, "Great sources");
}

#[rstest]
#[tokio::test]
async fn analytics_are_admin_only() {
    let ports = MockPorts::new().with_account(user(2, UserRole::Principal));
    let err = service(ports)
        .record_analytics(
            &actor(2),
            RecordAnalyticsRequest {
                metric_type: "active_users".to_owned(),
                metric_value: Some(12.0),
                metric_data: None,
            },
        )
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn analytics_reject_non_finite_values() {
    let ports = MockPorts::new().with_account(user(1, UserRole::Admin));
    let err = service(ports)
        .record_analytics(
            &actor(1),
            RecordAnalyticsRequest {
                metric_type: "active_users".to_owned(),
                metric_value: Some(f64::NAN),
                metric_data: None,
            },
        )
        .await
        .expect_err("nan");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn admins_record_analytics() {
    let mut ports = MockPorts::new()
        .with_account(user(1, UserRole::Admin))
        .allow_audit();
    ports.library.expect_insert_analytics().times(1).returning(|r| {
        Ok(AnalyticsRecord {
            id: AnalyticsId::new(3),
            metric_type: r.metric_type.clone(),
            metric_value: r.metric_value,
            metric_data: r.metric_data.clone(),
            recorded_at: r.recorded_at,
        })
    });

    let record = service(ports)
        .record_analytics(
            &actor(1),
            RecordAnalyticsRequest {
                metric_type: "active_users".to_owned(),
                metric_value: Some(12.0),
                metric_data: None,
            },
        )
        .await
        .expect("recorded");
    assert_eq!(record.metric_type, "active_users");
}
