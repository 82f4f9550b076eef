//! Port for submissions and assessments.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::{
    Assessment, NewAssessment, NewSubmission, Submission, SubmissionId, UserId,
};

/// Storage for submissions and the assessments grading them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Insert a submission in the `submitted` state.
    async fn insert(&self, submission: &NewSubmission) -> Result<Submission, PersistenceError>;

    /// Fetch a submission by id.
    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>, PersistenceError>;

    /// Insert the assessment and move the submission to `graded` in one
    /// transaction. A second assessment for the same submission surfaces as
    /// [`PersistenceError::ConstraintViolation`] and changes nothing.
    async fn record_assessment(
        &self,
        assessment: &NewAssessment,
    ) -> Result<Assessment, PersistenceError>;

    /// Fetch the assessment of a submission.
    async fn find_assessment(
        &self,
        submission: SubmissionId,
    ) -> Result<Option<Assessment>, PersistenceError>;

    /// Submissions made by `student`, newest first.
    async fn submissions_of_student(
        &self,
        student: UserId,
    ) -> Result<Vec<Submission>, PersistenceError>;

    /// Assessments of `student`'s submissions, newest first.
    async fn assessments_of_student(
        &self,
        student: UserId,
    ) -> Result<Vec<Assessment>, PersistenceError>;

    /// Ungraded submissions to activities in classes taught by `teacher`,
    /// oldest first.
    async fn pending_for_teacher(
        &self,
        teacher: UserId,
    ) -> Result<Vec<Submission>, PersistenceError>;
}
