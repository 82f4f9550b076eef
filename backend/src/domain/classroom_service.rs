//! Classroom service: classes, enrollments, activities, submissions and
//! grading.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::permissions::{PermissionEngine, RoleGate};
use crate::domain::ports::{
    ClassDetail, ClassRepository, Classrooms, CreateActivityRequest, CreateClassRequest,
    GradeRequest, OrganizationRepository, ProgramRepository, StudentDashboard,
    SubmissionRepository, SubmitAssignmentRequest, TeacherDashboard,
};
use crate::domain::service_support::{
    AuditTrail, Repositories, bounded_text, found, map_persistence_error, map_write_error,
    optional_bounded_text,
};
use crate::domain::{
    Activity, ActivityId, Actor, Assessment, AuditAction, AuditTarget, CLASS_NAME_MAX, Class,
    ClassId, Enrollment, EnrollmentStatus, Error, NewActivity, NewAssessment, NewClass,
    NewEnrollment, NewSubmission, OrganizationType, ProgramEnrollee, Submission, SubmissionId,
    SubmissionStatus, TargetKind, UserRole,
};

/// Maximum activity name length.
const ACTIVITY_NAME_MAX: usize = 200;
/// Maximum stored upload path length.
const FILE_PATH_MAX: usize = 255;

/// Implements [`Classrooms`].
#[derive(Clone)]
pub struct ClassroomService {
    organizations: Arc<dyn OrganizationRepository>,
    classes: Arc<dyn ClassRepository>,
    programs: Arc<dyn ProgramRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    permissions: PermissionEngine,
    audit: AuditTrail,
    clock: Arc<dyn Clock>,
}

impl ClassroomService {
    /// Create the service from the shared repositories.
    pub fn new(repos: &Repositories) -> Self {
        Self {
            organizations: Arc::clone(&repos.organizations),
            classes: Arc::clone(&repos.classes),
            programs: Arc::clone(&repos.programs),
            submissions: Arc::clone(&repos.submissions),
            permissions: PermissionEngine::new(repos),
            audit: AuditTrail::new(repos),
            clock: Arc::clone(&repos.clock),
        }
    }

    async fn class(&self, id: ClassId) -> Result<Class, Error> {
        found(
            self.classes
                .find_by_id(id)
                .await
                .map_err(map_persistence_error)?,
            "class",
        )
    }

    async fn activity(&self, id: ActivityId) -> Result<Activity, Error> {
        found(
            self.programs
                .find_activity(id)
                .await
                .map_err(map_persistence_error)?,
            "activity",
        )
    }

    async fn require_account_role(&self, actor: &Actor, role: UserRole) -> Result<(), Error> {
        let account = self.permissions.account(actor).await?;
        if account.role == role {
            Ok(())
        } else {
            Err(Error::forbidden(format!("dashboard is only available to the {role} role")))
        }
    }
}

#[async_trait]
impl Classrooms for ClassroomService {
    async fn create_class(
        &self,
        actor: &Actor,
        request: CreateClassRequest,
    ) -> Result<Class, Error> {
        let teacher = self
            .permissions
            .require_role(actor, RoleGate::CreateClass)
            .await?;
        let name = bounded_text("name", &request.name, CLASS_NAME_MAX)?;
        let organization = found(
            self.organizations
                .find_by_id(request.organization_id)
                .await
                .map_err(map_persistence_error)?,
            "organization",
        )?;
        if organization.org_type != OrganizationType::School {
            return Err(Error::invalid_state("classes can only be created in schools"));
        }
        let membership = self
            .organizations
            .find_membership(organization.id, teacher.id)
            .await
            .map_err(map_persistence_error)?;
        if membership.is_none() {
            return Err(Error::forbidden("only members of the school may create classes"));
        }
        let class = self
            .classes
            .insert(&NewClass {
                organization_id: organization.id,
                teacher_id: teacher.id,
                name,
                syllabus: request.syllabus,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_persistence_error)?;
        info!(class_id = %class.id, teacher = %teacher.id, "class created");
        self.audit
            .record(
                actor,
                AuditAction::CreateClass,
                AuditTarget::new(TargetKind::Class, class.id),
            )
            .await;
        Ok(class)
    }

    async fn class_detail(&self, actor: &Actor, class: ClassId) -> Result<ClassDetail, Error> {
        let class = self.class(class).await?;
        if !self.permissions.can_access_class(actor, &class).await? {
            return Err(Error::forbidden("not a participant of this class"));
        }
        let enrollments = self
            .classes
            .enrollments_in(class.id)
            .await
            .map_err(map_persistence_error)?;
        Ok(ClassDetail { class, enrollments })
    }

    async fn enroll_in_class(&self, actor: &Actor, class: ClassId) -> Result<Enrollment, Error> {
        let student = self
            .permissions
            .require_role(actor, RoleGate::EnrollInClass)
            .await?;
        let class = self.class(class).await?;
        let existing = self
            .classes
            .find_enrollment(class.id, student.id)
            .await
            .map_err(map_persistence_error)?;
        if existing.is_some() {
            return Err(Error::conflict("already enrolled"));
        }
        let enrollment = self
            .classes
            .enroll(&NewEnrollment {
                class_id: class.id,
                student_id: student.id,
                enrolled_on: self.clock.utc().date_naive(),
            })
            .await
            .map_err(map_write_error("already enrolled"))?;
        self.audit
            .record(
                actor,
                AuditAction::EnrollClass,
                AuditTarget::new(TargetKind::Class, class.id),
            )
            .await;
        Ok(enrollment)
    }

    async fn create_activity(
        &self,
        actor: &Actor,
        request: CreateActivityRequest,
    ) -> Result<Activity, Error> {
        let author = self
            .permissions
            .require_role(actor, RoleGate::CreateActivity)
            .await?;
        let name = bounded_text("name", &request.name, ACTIVITY_NAME_MAX)?;
        let program = found(
            self.programs
                .find_program(request.program_id)
                .await
                .map_err(map_persistence_error)?,
            "program",
        )?;
        if let Some(class_id) = request.class_id {
            let class = self.class(class_id).await?;
            if author.role == UserRole::Teacher && class.teacher_id != author.id {
                return Err(Error::forbidden(
                    "teachers may only add activities to their own classes",
                ));
            }
        }
        let activity = self
            .programs
            .insert_activity(&NewActivity {
                program_id: program.id,
                class_id: request.class_id,
                name,
                activity_type: request.activity_type,
                description: request.description,
                created_by: author.id,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_persistence_error)?;
        self.audit
            .record(
                actor,
                AuditAction::CreateActivity,
                AuditTarget::new(TargetKind::Activity, activity.id),
            )
            .await;
        Ok(activity)
    }

    async fn submit_assignment(
        &self,
        actor: &Actor,
        activity: ActivityId,
        request: SubmitAssignmentRequest,
    ) -> Result<Submission, Error> {
        let student = self
            .permissions
            .require_role(actor, RoleGate::SubmitAssignment)
            .await?;
        let file_path = optional_bounded_text("filePath", request.file_path, FILE_PATH_MAX)?;
        if request.data.is_none() && file_path.is_none() {
            return Err(Error::invalid_request("submission needs data or a file"));
        }
        let activity = self.activity(activity).await?;
        if let Some(class_id) = activity.class_id {
            let enrollment = self
                .classes
                .find_enrollment(class_id, student.id)
                .await
                .map_err(map_persistence_error)?;
            if !enrollment.is_some_and(|e| e.status == EnrollmentStatus::Active) {
                return Err(Error::forbidden("not enrolled in this activity's class"));
            }
        }
        let submission = self
            .submissions
            .insert(&NewSubmission {
                activity_id: activity.id,
                student_id: student.id,
                data: request.data,
                file_path,
                submitted_at: self.clock.utc(),
            })
            .await
            .map_err(map_persistence_error)?;
        self.audit
            .record(
                actor,
                AuditAction::SubmitAssignment,
                AuditTarget::new(TargetKind::Submission, submission.id),
            )
            .await;
        Ok(submission)
    }

    async fn grade_submission(
        &self,
        actor: &Actor,
        submission: SubmissionId,
        request: GradeRequest,
    ) -> Result<Assessment, Error> {
        let teacher = self
            .permissions
            .require_role(actor, RoleGate::GradeSubmission)
            .await?;
        let submission = found(
            self.submissions
                .find_by_id(submission)
                .await
                .map_err(map_persistence_error)?,
            "submission",
        )?;
        let activity = self.activity(submission.activity_id).await?;
        let Some(class_id) = activity.class_id else {
            return Err(Error::invalid_state("activity is not attached to a class"));
        };
        let class = self.class(class_id).await?;
        if class.teacher_id != teacher.id {
            return Err(Error::forbidden("only the class teacher may grade this submission"));
        }
        if !submission.status.can_transition_to(SubmissionStatus::Graded) {
            return Err(Error::conflict("submission already graded"));
        }
        let assessment = self
            .submissions
            .record_assessment(&NewAssessment {
                submission_id: submission.id,
                teacher_id: teacher.id,
                grade: request.grade,
                feedback: request.feedback,
                assessed_at: self.clock.utc(),
            })
            .await
            .map_err(map_write_error("submission already graded"))?;
        info!(submission_id = %submission.id, teacher = %teacher.id, "submission graded");
        self.audit
            .record(
                actor,
                AuditAction::GradeSubmission,
                AuditTarget::new(TargetKind::Submission, submission.id),
            )
            .await;
        Ok(assessment)
    }

    async fn teacher_dashboard(&self, actor: &Actor) -> Result<TeacherDashboard, Error> {
        self.require_account_role(actor, UserRole::Teacher).await?;
        let classes = self
            .classes
            .taught_by(actor.user_id())
            .await
            .map_err(map_persistence_error)?;
        let mut students = BTreeSet::new();
        for class in &classes {
            let enrollments = self
                .classes
                .enrollments_in(class.id)
                .await
                .map_err(map_persistence_error)?;
            students.extend(
                enrollments
                    .into_iter()
                    .filter(|e| e.status == EnrollmentStatus::Active)
                    .map(|e| e.student_id),
            );
        }
        let pending_submissions = self
            .submissions
            .pending_for_teacher(actor.user_id())
            .await
            .map_err(map_persistence_error)?;
        Ok(TeacherDashboard {
            teacher_id: actor.user_id(),
            classes,
            total_students: students.len(),
            pending_submissions,
        })
    }

    async fn student_dashboard(&self, actor: &Actor) -> Result<StudentDashboard, Error> {
        self.require_account_role(actor, UserRole::Student).await?;
        let student = actor.user_id();
        let enrollments = self
            .classes
            .enrollments_of_student(student)
            .await
            .map_err(map_persistence_error)?;
        let programs = self
            .programs
            .programs_of(ProgramEnrollee::User(student))
            .await
            .map_err(map_persistence_error)?;
        let submissions = self
            .submissions
            .submissions_of_student(student)
            .await
            .map_err(map_persistence_error)?;
        let graded_submissions = submissions
            .iter()
            .filter(|s| s.status == SubmissionStatus::Graded)
            .count();
        let assessments = self
            .submissions
            .assessments_of_student(student)
            .await
            .map_err(map_persistence_error)?;
        Ok(StudentDashboard {
            student_id: student,
            enrollments,
            programs,
            submissions,
            graded_submissions,
            assessments,
        })
    }
}

#[cfg(test)]
#[path = "classroom_service_tests.rs"]
mod tests;
