//! Classroom handlers: classes, activities, submissions, grading and the
//! teacher and student dashboards.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{
    ClassDetail, CreateActivityRequest, CreateClassRequest, GradeRequest, StudentDashboard,
    SubmitAssignmentRequest, TeacherDashboard,
};
use crate::domain::{
    Activity, ActivityId, ActivityType, Assessment, Class, ClassId, Grade, OrganizationId,
    ProgramId, Submission, SubmissionId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ActivitySchema, AssessmentSchema, ClassSchema, EnrollmentSchema, ErrorSchema, SubmissionSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field, parse_vocabulary};

/// Body for `POST /api/v1/classes`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassBody {
    pub organization_id: i64,
    pub name: String,
    pub syllabus: Option<String>,
}

/// Body for `POST /api/v1/activities`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityBody {
    pub program_id: i64,
    /// Restrict the activity to one class.
    pub class_id: Option<i64>,
    pub name: String,
    /// `in-class`, `outdoor`, `challenge`, `game` or `assessment`.
    #[schema(example = "outdoor")]
    pub activity_type: String,
    pub description: Option<String>,
}

/// Body for `POST /api/v1/activities/{id}/submissions`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssignmentBody {
    pub data: Option<String>,
    pub file_path: Option<String>,
}

/// Body for `POST /api/v1/submissions/{id}/assessment`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradeBody {
    #[schema(example = "A-")]
    pub grade: String,
    pub feedback: Option<String>,
}

/// Create a class in a school the caller belongs to.
#[utoipa::path(
    post,
    path = "/api/v1/classes",
    request_body = CreateClassBody,
    responses(
        (status = 201, description = "Class created", body = ClassSchema),
        (status = 403, description = "Not a teacher or not a member of the school", body = ErrorSchema),
        (status = 404, description = "Organization not found", body = ErrorSchema),
        (status = 422, description = "Organization is not a school", body = ErrorSchema)
    ),
    tags = ["classrooms"],
    operation_id = "createClass"
)]
#[post("/classes")]
pub async fn create_class(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateClassBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let request = CreateClassRequest {
        organization_id: OrganizationId::new(body.organization_id),
        name: body.name,
        syllabus: body.syllabus,
    };
    let class = state.classrooms.create_class(&actor, request).await?;
    Ok(HttpResponse::Created().json(class))
}

/// Enroll the calling student in a class.
#[utoipa::path(
    post,
    path = "/api/v1/classes/{id}/enrollments",
    params(("id" = i64, Path, description = "Class id")),
    responses(
        (status = 201, description = "Enrolled", body = EnrollmentSchema),
        (status = 403, description = "Only students enroll", body = ErrorSchema),
        (status = 409, description = "Already enrolled", body = ErrorSchema)
    ),
    tags = ["classrooms"],
    operation_id = "enrollInClass"
)]
#[post("/classes/{id}/enrollments")]
pub async fn enroll_in_class(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let enrollment = state
        .classrooms
        .enroll_in_class(&actor, ClassId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(enrollment))
}

/// Class and roster, for its teacher and enrolled students.
#[utoipa::path(
    get,
    path = "/api/v1/classes/{id}",
    params(("id" = i64, Path, description = "Class id")),
    responses(
        (status = 200, description = "Class with enrollments"),
        (status = 403, description = "Not part of the class", body = ErrorSchema),
        (status = 404, description = "Class not found", body = ErrorSchema)
    ),
    tags = ["classrooms"],
    operation_id = "classDetail"
)]
#[get("/classes/{id}")]
pub async fn class_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ClassDetail>> {
    let actor = session.require_actor()?;
    let detail = state
        .classrooms
        .class_detail(&actor, ClassId::new(path.into_inner()))
        .await?;
    Ok(web::Json(detail))
}

/// Create an activity in a program.
#[utoipa::path(
    post,
    path = "/api/v1/activities",
    request_body = CreateActivityBody,
    responses(
        (status = 201, description = "Activity created", body = ActivitySchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Role or class not permitted", body = ErrorSchema),
        (status = 404, description = "Program or class not found", body = ErrorSchema)
    ),
    tags = ["classrooms"],
    operation_id = "createActivity"
)]
#[post("/activities")]
pub async fn create_activity(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateActivityBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let activity_type: ActivityType =
        parse_vocabulary(&body.activity_type, FieldName::new("activityType"))?;
    let request = CreateActivityRequest {
        program_id: ProgramId::new(body.program_id),
        class_id: body.class_id.map(ClassId::new),
        name: body.name,
        activity_type,
        description: body.description,
    };
    let activity = state.classrooms.create_activity(&actor, request).await?;
    Ok(HttpResponse::Created().json(activity))
}

/// Submit work for an activity.
#[utoipa::path(
    post,
    path = "/api/v1/activities/{id}/submissions",
    params(("id" = i64, Path, description = "Activity id")),
    request_body = SubmitAssignmentBody,
    responses(
        (status = 201, description = "Submission stored", body = SubmissionSchema),
        (status = 403, description = "Not enrolled in the activity's class", body = ErrorSchema),
        (status = 404, description = "Activity not found", body = ErrorSchema)
    ),
    tags = ["classrooms"],
    operation_id = "submitAssignment"
)]
#[post("/activities/{id}/submissions")]
pub async fn submit_assignment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<SubmitAssignmentBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let request = SubmitAssignmentRequest {
        data: body.data,
        file_path: body.file_path,
    };
    let submission = state
        .classrooms
        .submit_assignment(&actor, ActivityId::new(path.into_inner()), request)
        .await?;
    Ok(HttpResponse::Created().json(submission))
}

/// Grade a submission.
#[utoipa::path(
    post,
    path = "/api/v1/submissions/{id}/assessment",
    params(("id" = i64, Path, description = "Submission id")),
    request_body = GradeBody,
    responses(
        (status = 201, description = "Assessment recorded", body = AssessmentSchema),
        (status = 400, description = "Invalid grade", body = ErrorSchema),
        (status = 403, description = "Not the class teacher", body = ErrorSchema),
        (status = 409, description = "Already graded", body = ErrorSchema)
    ),
    tags = ["classrooms"],
    operation_id = "gradeSubmission"
)]
#[post("/submissions/{id}/assessment")]
pub async fn grade_submission(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<GradeBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let grade = Grade::new(&body.grade).map_err(|err| invalid_field(FieldName::new("grade"), err))?;
    let request = GradeRequest {
        grade,
        feedback: body.feedback,
    };
    let assessment = state
        .classrooms
        .grade_submission(&actor, SubmissionId::new(path.into_inner()), request)
        .await?;
    Ok(HttpResponse::Created().json(assessment))
}

/// Classes, student count and pending submissions of the calling teacher.
#[utoipa::path(
    get,
    path = "/api/v1/dashboards/teacher",
    responses(
        (status = 200, description = "Teacher dashboard"),
        (status = 403, description = "Teachers only", body = ErrorSchema)
    ),
    tags = ["classrooms"],
    operation_id = "teacherDashboard"
)]
#[get("/dashboards/teacher")]
pub async fn teacher_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<TeacherDashboard>> {
    let actor = session.require_actor()?;
    Ok(web::Json(state.classrooms.teacher_dashboard(&actor).await?))
}

/// Classes, programs, submissions and grades of the calling student.
#[utoipa::path(
    get,
    path = "/api/v1/dashboards/student",
    responses(
        (status = 200, description = "Student dashboard"),
        (status = 403, description = "Students only", body = ErrorSchema)
    ),
    tags = ["classrooms"],
    operation_id = "studentDashboard"
)]
#[get("/dashboards/student")]
pub async fn student_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<StudentDashboard>> {
    let actor = session.require_actor()?;
    Ok(web::Json(state.classrooms.student_dashboard(&actor).await?))
}

#[cfg(test)]
#[path = "classrooms_tests.rs"]
mod tests;
