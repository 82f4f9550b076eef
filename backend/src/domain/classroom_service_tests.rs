//! Tests for the classroom service.

use rstest::rstest;

use super::*;
use crate::domain::ports::PersistenceError;
use crate::domain::test_fixtures::{
    MockPorts, actor, class, enrollment, fixed_now, membership, today, user,
};
use crate::domain::{
    ActivityType, AssessmentId, ErrorCode, Grade, MembershipRole, Organization, OrganizationId,
    Program, ProgramId, ProgramType, SubscriptionStatus, UserId,
};

fn service(ports: MockPorts) -> ClassroomService {
    ClassroomService::new(&ports.into_repositories())
}

fn organization(org_type: OrganizationType) -> Organization {
    Organization {
        id: OrganizationId::new(1),
        org_type,
        name: "Org".to_owned(),
        profile: None,
        is_public: true,
        subscription_status: SubscriptionStatus::Active,
        created_at: fixed_now(),
    }
}

fn activity(id: i64, class_id: Option<i64>) -> Activity {
    Activity {
        id: ActivityId::new(id),
        program_id: ProgramId::new(1),
        class_id: class_id.map(ClassId::new),
        name: "Reef count".to_owned(),
        activity_type: ActivityType::Outdoor,
        description: None,
        created_by: UserId::new(7),
        created_at: fixed_now(),
    }
}

fn submission(id: i64, activity: i64, status: SubmissionStatus) -> Submission {
    Submission {
        id: SubmissionId::new(id),
        activity_id: ActivityId::new(activity),
        student_id: UserId::new(30),
        data: Some("12 turtles".to_owned()),
        file_path: None,
        submitted_at: fixed_now(),
        status,
    }
}

fn grade_request() -> GradeRequest {
    GradeRequest {
        grade: Grade::new("A").expect("grade"),
        feedback: Some("Thorough".to_owned()),
    }
}

fn class_request() -> CreateClassRequest {
    CreateClassRequest {
        organization_id: OrganizationId::new(1),
        name: "Marine Biology".to_owned(),
        syllabus: None,
    }
}

#[rstest]
#[tokio::test]
async fn classes_need_a_school() {
    let mut ports = MockPorts::new().with_account(user(7, UserRole::Teacher));
    ports
        .organizations
        .expect_find_by_id()
        .return_once(|_| Ok(Some(organization(OrganizationType::Community))));
    ports.classes.expect_insert().never();

    let err = service(ports)
        .create_class(&actor(7), class_request())
        .await
        .expect_err("community");
    assert_eq!(err.code(), ErrorCode::InvalidState);
}

#[rstest]
#[tokio::test]
async fn class_creator_must_belong_to_school() {
    let mut ports = MockPorts::new().with_account(user(7, UserRole::Teacher));
    ports
        .organizations
        .expect_find_by_id()
        .return_once(|_| Ok(Some(organization(OrganizationType::School))));
    ports
        .organizations
        .expect_find_membership()
        .return_once(|_, _| Ok(None));

    let err = service(ports)
        .create_class(&actor(7), class_request())
        .await
        .expect_err("not a member");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn teacher_creates_class_in_own_school() {
    let mut ports = MockPorts::new()
        .with_account(user(7, UserRole::Teacher))
        .allow_audit();
    ports
        .organizations
        .expect_find_by_id()
        .return_once(|_| Ok(Some(organization(OrganizationType::School))));
    ports
        .organizations
        .expect_find_membership()
        .return_once(|_, _| Ok(Some(membership(1, 7, MembershipRole::Teacher))));
    ports
        .classes
        .expect_insert()
        .withf(|c| c.teacher_id == UserId::new(7) && c.name == "Marine Biology")
        .times(1)
        .returning(|_| Ok(class(11, 1, 7)));

    let created = service(ports)
        .create_class(&actor(7), class_request())
        .await
        .expect("class created");
    assert_eq!(created.id, ClassId::new(11));
}

#[rstest]
#[tokio::test]
async fn second_enrollment_is_a_conflict() {
    let mut ports = MockPorts::new().with_account(user(30, UserRole::Student));
    ports
        .classes
        .expect_find_by_id()
        .return_once(|_| Ok(Some(class(11, 1, 7))));
    ports
        .classes
        .expect_find_enrollment()
        .return_once(|_, _| Ok(Some(enrollment(11, 30, EnrollmentStatus::Active))));
    ports.classes.expect_enroll().never();

    let err = service(ports)
        .enroll_in_class(&actor(30), ClassId::new(11))
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "already enrolled");
}

#[rstest]
#[tokio::test]
async fn losing_enrollment_race_is_a_conflict() {
    let mut ports = MockPorts::new().with_account(user(30, UserRole::Student));
    ports
        .classes
        .expect_find_by_id()
        .return_once(|_| Ok(Some(class(11, 1, 7))));
    ports
        .classes
        .expect_find_enrollment()
        .return_once(|_, _| Ok(None));
    ports.classes.expect_enroll().return_once(|_| {
        Err(PersistenceError::constraint_violation(
            "class_enrollments_class_student_key",
        ))
    });

    let err = service(ports)
        .enroll_in_class(&actor(30), ClassId::new(11))
        .await
        .expect_err("race lost");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn enrollment_is_active_and_dated_today() {
    let mut ports = MockPorts::new()
        .with_account(user(30, UserRole::Student))
        .allow_audit();
    ports
        .classes
        .expect_find_by_id()
        .return_once(|_| Ok(Some(class(11, 1, 7))));
    ports
        .classes
        .expect_find_enrollment()
        .return_once(|_, _| Ok(None));
    ports
        .classes
        .expect_enroll()
        .withf(|e| e.enrolled_on == today())
        .times(1)
        .returning(|e| {
            Ok(enrollment(
                e.class_id.get(),
                e.student_id.get(),
                EnrollmentStatus::Active,
            ))
        });

    let created = service(ports)
        .enroll_in_class(&actor(30), ClassId::new(11))
        .await
        .expect("enrolled");
    assert_eq!(created.status, EnrollmentStatus::Active);
}

#[rstest]
#[tokio::test]
async fn teachers_cannot_scope_activities_to_foreign_classes() {
    let mut ports = MockPorts::new().with_account(user(8, UserRole::Teacher));
    ports.programs.expect_find_program().return_once(|id| {
        Ok(Some(Program {
            id,
            name: "Reef Watch".to_owned(),
            description: None,
            program_type: ProgramType::Regional,
            created_at: fixed_now(),
        }))
    });
    ports
        .classes
        .expect_find_by_id()
        .return_once(|_| Ok(Some(class(11, 1, 7))));
    ports.programs.expect_insert_activity().never();

    let err = service(ports)
        .create_activity(
            &actor(8),
            CreateActivityRequest {
                program_id: ProgramId::new(1),
                class_id: Some(ClassId::new(11)),
                name: "Survey".to_owned(),
                activity_type: ActivityType::Outdoor,
                description: None,
            },
        )
        .await
        .expect_err("foreign class");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(None)]
#[case(Some(EnrollmentStatus::Inactive))]
#[tokio::test]
async fn submitting_requires_active_class_enrollment(#[case] status: Option<EnrollmentStatus>) {
    let mut ports = MockPorts::new().with_account(user(30, UserRole::Student));
    ports
        .programs
        .expect_find_activity()
        .return_once(|_| Ok(Some(activity(3, Some(11)))));
    ports
        .classes
        .expect_find_enrollment()
        .return_once(move |c, s| Ok(status.map(|st| enrollment(c.get(), s.get(), st))));
    ports.submissions.expect_insert().never();

    let err = service(ports)
        .submit_assignment(
            &actor(30),
            ActivityId::new(3),
            SubmitAssignmentRequest {
                data: Some("done".to_owned()),
                file_path: None,
            },
        )
        .await
        .expect_err("not enrolled");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn unscoped_activities_accept_any_student() {
    let mut ports = MockPorts::new()
        .with_account(user(30, UserRole::Student))
        .allow_audit();
    ports
        .programs
        .expect_find_activity()
        .return_once(|_| Ok(Some(activity(3, None))));
    ports
        .submissions
        .expect_insert()
        .times(1)
        .returning(|s| Ok(submission(5, s.activity_id.get(), SubmissionStatus::Submitted)));

    let created = service(ports)
        .submit_assignment(
            &actor(30),
            ActivityId::new(3),
            SubmitAssignmentRequest {
                data: Some("done".to_owned()),
                file_path: None,
            },
        )
        .await
        .expect("submitted");
    assert_eq!(created.status, SubmissionStatus::Submitted);
}

#[rstest]
#[tokio::test]
async fn empty_submissions_are_rejected() {
    let ports = MockPorts::new().with_account(user(30, UserRole::Student));
    let err = service(ports)
        .submit_assignment(&actor(30), ActivityId::new(3), SubmitAssignmentRequest::default())
        .await
        .expect_err("empty");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn oversized_file_paths_are_rejected_before_storage() {
    let ports = MockPorts::new().with_account(user(30, UserRole::Student));
    let err = service(ports)
        .submit_assignment(
            &actor(30),
            ActivityId::new(3),
            SubmitAssignmentRequest {
                data: None,
                file_path: Some(format!("uploads/{}.jpg", "x".repeat(260))),
            },
        )
        .await
        .expect_err("path too long");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "filePath must be at most 255 characters");
}

fn grading_ports(activity_class: Option<i64>, status: SubmissionStatus) -> MockPorts {
    let mut ports = MockPorts::new().with_account(user(7, UserRole::Teacher));
    ports
        .submissions
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(submission(5, 3, status))));
    ports
        .programs
        .expect_find_activity()
        .return_once(move |_| Ok(Some(activity(3, activity_class))));
    ports
}

#[rstest]
#[tokio::test]
async fn grading_unscoped_activity_is_invalid_state() {
    let ports = grading_ports(None, SubmissionStatus::Submitted);
    let err = service(ports)
        .grade_submission(&actor(7), SubmissionId::new(5), grade_request())
        .await
        .expect_err("no class");
    assert_eq!(err.code(), ErrorCode::InvalidState);
}

#[rstest]
#[tokio::test]
async fn only_class_teacher_may_grade() {
    let mut ports = grading_ports(Some(11), SubmissionStatus::Submitted);
    ports
        .classes
        .expect_find_by_id()
        .return_once(|_| Ok(Some(class(11, 1, 99))));
    ports.submissions.expect_record_assessment().never();

    let err = service(ports)
        .grade_submission(&actor(7), SubmissionId::new(5), grade_request())
        .await
        .expect_err("other teacher");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(SubmissionStatus::Graded)]
#[case(SubmissionStatus::Returned)]
#[tokio::test]
async fn graded_submissions_cannot_be_regraded(#[case] status: SubmissionStatus) {
    let mut ports = grading_ports(Some(11), status);
    ports
        .classes
        .expect_find_by_id()
        .return_once(|_| Ok(Some(class(11, 1, 7))));
    ports.submissions.expect_record_assessment().never();

    let err = service(ports)
        .grade_submission(&actor(7), SubmissionId::new(5), grade_request())
        .await
        .expect_err("already graded");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn grading_records_one_assessment() {
    let mut ports = grading_ports(Some(11), SubmissionStatus::Submitted);
    ports
        .classes
        .expect_find_by_id()
        .return_once(|_| Ok(Some(class(11, 1, 7))));
    ports
        .submissions
        .expect_record_assessment()
        .times(1)
        .returning(|a| {
            Ok(Assessment {
                id: AssessmentId::new(1),
                submission_id: a.submission_id,
                teacher_id: a.teacher_id,
                grade: a.grade.clone(),
                feedback: a.feedback.clone(),
                assessed_at: a.assessed_at,
            })
        });
    ports
        .access_log
        .expect_append()
        .withf(|entry| entry.action == AuditAction::GradeSubmission)
        .times(1)
        .returning(|_| Ok(()));

    let assessment = service(ports)
        .grade_submission(&actor(7), SubmissionId::new(5), grade_request())
        .await
        .expect("graded");
    assert_eq!(assessment.grade.as_ref(), "A");
}

#[rstest]
#[tokio::test]
async fn teacher_dashboard_counts_distinct_active_students() {
    let mut ports = MockPorts::new().with_account(user(7, UserRole::Teacher));
    ports
        .classes
        .expect_taught_by()
        .return_once(|_| Ok(vec![class(11, 1, 7), class(12, 1, 7)]));
    ports.classes.expect_enrollments_in().returning(|c| {
        Ok(vec![
            enrollment(c.get(), 30, EnrollmentStatus::Active),
            enrollment(c.get(), 31, EnrollmentStatus::Inactive),
        ])
    });
    ports
        .submissions
        .expect_pending_for_teacher()
        .return_once(|_| Ok(vec![submission(5, 3, SubmissionStatus::Submitted)]));

    let dashboard = service(ports)
        .teacher_dashboard(&actor(7))
        .await
        .expect("dashboard");
    assert_eq!(dashboard.classes.len(), 2);
    assert_eq!(dashboard.total_students, 1);
    assert_eq!(dashboard.pending_submissions.len(), 1);
}

#[rstest]
#[tokio::test]
async fn student_dashboard_is_for_students() {
    let ports = MockPorts::new().with_account(user(7, UserRole::Teacher));
    let err = service(ports)
        .student_dashboard(&actor(7))
        .await
        .expect_err("teacher");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}
