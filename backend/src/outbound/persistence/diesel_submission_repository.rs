//! PostgreSQL-backed [`SubmissionRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{PersistenceError, SubmissionRepository};
use crate::domain::{
    Assessment, NewAssessment, NewSubmission, Submission, SubmissionId, SubmissionStatus, UserId,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    AssessmentRow, NewAssessmentRow, NewSubmissionRow, SubmissionRow, convert_rows,
};
use super::pool::DbPool;
use super::schema::{activities, assessments, classes, submissions};

/// Diesel adapter for submissions and their assessments.
#[derive(Clone)]
pub struct DieselSubmissionRepository {
    pool: DbPool,
}

impl DieselSubmissionRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionRepository for DieselSubmissionRepository {
    async fn insert(&self, submission: &NewSubmission) -> Result<Submission, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewSubmissionRow {
            activity_id: submission.activity_id.get(),
            student_id: submission.student_id.get(),
            data: submission.data.as_deref(),
            file_path: submission.file_path.as_deref(),
            submitted_at: submission.submitted_at,
        };
        let stored: SubmissionRow = diesel::insert_into(submissions::table)
            .values(&row)
            .returning(SubmissionRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Submission::try_from(stored)
    }

    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SubmissionRow> = submissions::table
            .find(id.get())
            .select(SubmissionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Submission::try_from).transpose()
    }

    async fn record_assessment(
        &self,
        assessment: &NewAssessment,
    ) -> Result<Assessment, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAssessmentRow {
            submission_id: assessment.submission_id.get(),
            teacher_id: assessment.teacher_id.get(),
            grade: assessment.grade.as_ref(),
            feedback: assessment.feedback.as_deref(),
            assessed_at: assessment.assessed_at,
        };
        let submission_id = assessment.submission_id.get();

        let stored = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let stored: AssessmentRow = diesel::insert_into(assessments::table)
                        .values(&row)
                        .returning(AssessmentRow::as_returning())
                        .get_result(conn)
                        .await?;
                    diesel::update(submissions::table.find(submission_id))
                        .set(submissions::status.eq(SubmissionStatus::Graded.as_str()))
                        .execute(conn)
                        .await?;
                    Ok(stored)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Assessment::try_from(stored)
    }

    async fn find_assessment(
        &self,
        submission: SubmissionId,
    ) -> Result<Option<Assessment>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AssessmentRow> = assessments::table
            .filter(assessments::submission_id.eq(submission.get()))
            .select(AssessmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Assessment::try_from).transpose()
    }

    async fn submissions_of_student(
        &self,
        student: UserId,
    ) -> Result<Vec<Submission>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SubmissionRow> = submissions::table
            .filter(submissions::student_id.eq(student.get()))
            .order((submissions::submitted_at.desc(), submissions::id.desc()))
            .select(SubmissionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }

    async fn assessments_of_student(
        &self,
        student: UserId,
    ) -> Result<Vec<Assessment>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let own_submissions = submissions::table
            .filter(submissions::student_id.eq(student.get()))
            .select(submissions::id);
        let rows: Vec<AssessmentRow> = assessments::table
            .filter(assessments::submission_id.eq_any(own_submissions))
            .order((assessments::assessed_at.desc(), assessments::id.desc()))
            .select(AssessmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }

    async fn pending_for_teacher(
        &self,
        teacher: UserId,
    ) -> Result<Vec<Submission>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let taught_classes = classes::table
            .filter(classes::teacher_id.eq(teacher.get()))
            .select(classes::id.nullable());
        let class_activities = activities::table
            .filter(activities::class_id.eq_any(taught_classes))
            .select(activities::id);
        let rows: Vec<SubmissionRow> = submissions::table
            .filter(submissions::status.eq(SubmissionStatus::Submitted.as_str()))
            .filter(submissions::activity_id.eq_any(class_activities))
            .order((submissions::submitted_at.asc(), submissions::id.asc()))
            .select(SubmissionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }
}
