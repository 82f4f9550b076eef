//! Driving port for classes, activities, submissions and grading.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{
    Activity, ActivityId, ActivityType, Actor, Assessment, Class, ClassId, Enrollment, Error,
    Grade, OrganizationId, ProgramEnrollment, ProgramId, Submission, SubmissionId, UserId,
};

/// Fields for a new class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateClassRequest {
    pub organization_id: OrganizationId,
    pub name: String,
    pub syllabus: Option<String>,
}

/// Fields for a new activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateActivityRequest {
    pub program_id: ProgramId,
    pub class_id: Option<ClassId>,
    pub name: String,
    pub activity_type: ActivityType,
    pub description: Option<String>,
}

/// Student's answer to an activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitAssignmentRequest {
    pub data: Option<String>,
    pub file_path: Option<String>,
}

/// Teacher's verdict on a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeRequest {
    pub grade: Grade,
    pub feedback: Option<String>,
}

/// Class with its roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDetail {
    pub class: Class,
    pub enrollments: Vec<Enrollment>,
}

/// Teacher overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDashboard {
    pub teacher_id: UserId,
    pub classes: Vec<Class>,
    pub total_students: usize,
    pub pending_submissions: Vec<Submission>,
}

/// Student overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub student_id: UserId,
    pub enrollments: Vec<Enrollment>,
    pub programs: Vec<ProgramEnrollment>,
    pub submissions: Vec<Submission>,
    pub graded_submissions: usize,
    pub assessments: Vec<Assessment>,
}

/// Classroom use-cases consumed by inbound adapters.
#[async_trait]
pub trait Classrooms: Send + Sync {
    /// Create a class in a school the actor belongs to.
    async fn create_class(&self, actor: &Actor, request: CreateClassRequest)
    -> Result<Class, Error>;

    /// Class and roster, for its teacher and enrolled students.
    async fn class_detail(&self, actor: &Actor, class: ClassId) -> Result<ClassDetail, Error>;

    /// Enroll the acting student in a class.
    ///
    /// # Errors
    /// `Conflict` when already enrolled.
    async fn enroll_in_class(&self, actor: &Actor, class: ClassId) -> Result<Enrollment, Error>;

    /// Create an activity in a program, optionally scoped to a class.
    async fn create_activity(
        &self,
        actor: &Actor,
        request: CreateActivityRequest,
    ) -> Result<Activity, Error>;

    /// Submit work for an activity.
    async fn submit_assignment(
        &self,
        actor: &Actor,
        activity: ActivityId,
        request: SubmitAssignmentRequest,
    ) -> Result<Submission, Error>;

    /// Grade a submission to an activity in one of the actor's classes.
    ///
    /// # Errors
    /// `Conflict` when the submission already has an assessment.
    async fn grade_submission(
        &self,
        actor: &Actor,
        submission: SubmissionId,
        request: GradeRequest,
    ) -> Result<Assessment, Error>;

    /// Overview for the acting teacher.
    async fn teacher_dashboard(&self, actor: &Actor) -> Result<TeacherDashboard, Error>;

    /// Overview for the acting student.
    async fn student_dashboard(&self, actor: &Actor) -> Result<StudentDashboard, Error>;
}
