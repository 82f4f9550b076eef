//! Port for programs, program enrollments, activities and canvases.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::{
    Activity, ActivityId, Canvas, CanvasUpsert, NewActivity, NewProgram, NewProgramEnrollment,
    Program, ProgramEnrollee, ProgramEnrollment, ProgramId,
};

/// Storage for programs and everything hanging off them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgramRepository: Send + Sync {
    /// Insert a program.
    async fn insert_program(&self, program: &NewProgram) -> Result<Program, PersistenceError>;

    /// Fetch a program by id.
    async fn find_program(&self, id: ProgramId) -> Result<Option<Program>, PersistenceError>;

    /// Insert an active program enrollment.
    async fn enroll(
        &self,
        enrollment: &NewProgramEnrollment,
    ) -> Result<ProgramEnrollment, PersistenceError>;

    /// Enrollments of `enrollee` in `program`, any status.
    async fn enrollments_of(
        &self,
        program: ProgramId,
        enrollee: ProgramEnrollee,
    ) -> Result<Vec<ProgramEnrollment>, PersistenceError>;

    /// Every program enrollment held by `enrollee`.
    async fn programs_of(
        &self,
        enrollee: ProgramEnrollee,
    ) -> Result<Vec<ProgramEnrollment>, PersistenceError>;

    /// Insert an activity.
    async fn insert_activity(&self, activity: &NewActivity) -> Result<Activity, PersistenceError>;

    /// Fetch an activity by id.
    async fn find_activity(&self, id: ActivityId) -> Result<Option<Activity>, PersistenceError>;

    /// Insert or replace the canvas keyed by (user, program). The latest
    /// write wins.
    async fn save_canvas(&self, canvas: &CanvasUpsert) -> Result<Canvas, PersistenceError>;
}
