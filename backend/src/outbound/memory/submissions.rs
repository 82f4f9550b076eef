//! Submissions and assessments.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use async_trait::async_trait;

use super::{MemoryStore, reject_duplicate, require_row};
use crate::domain::ports::{PersistenceError, SubmissionRepository};
use crate::domain::{
    Assessment, AssessmentId, NewAssessment, NewSubmission, Submission, SubmissionId,
    SubmissionStatus, UserId,
};

#[async_trait]
impl SubmissionRepository for MemoryStore {
    async fn insert(&self, submission: &NewSubmission) -> Result<Submission, PersistenceError> {
        self.with_tables(|tables| {
            require_row(
                tables.activities.contains(submission.activity_id.get()),
                "submissions_activity_id_fkey",
            )?;
            require_row(
                tables.users.contains(submission.student_id.get()),
                "submissions_student_id_fkey",
            )?;
            Ok(tables.submissions.insert_with(|id| Submission {
                id: SubmissionId::new(id),
                activity_id: submission.activity_id,
                student_id: submission.student_id,
                data: submission.data.clone(),
                file_path: submission.file_path.clone(),
                submitted_at: submission.submitted_at,
                status: SubmissionStatus::Submitted,
            }))
        })
    }

    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>, PersistenceError> {
        self.with_tables(|tables| Ok(tables.submissions.get(id.get()).cloned()))
    }

    async fn record_assessment(
        &self,
        assessment: &NewAssessment,
    ) -> Result<Assessment, PersistenceError> {
        self.with_tables(|tables| {
            require_row(
                tables.submissions.contains(assessment.submission_id.get()),
                "assessments_submission_id_fkey",
            )?;
            reject_duplicate(
                tables
                    .assessments
                    .values()
                    .any(|row| row.submission_id == assessment.submission_id),
                "assessments_submission_key",
            )?;
            if let Some(row) = tables.submissions.get_mut(assessment.submission_id.get()) {
                row.status = SubmissionStatus::Graded;
            }
            Ok(tables.assessments.insert_with(|id| Assessment {
                id: AssessmentId::new(id),
                submission_id: assessment.submission_id,
                teacher_id: assessment.teacher_id,
                grade: assessment.grade.clone(),
                feedback: assessment.feedback.clone(),
                assessed_at: assessment.assessed_at,
            }))
        })
    }

    async fn find_assessment(
        &self,
        submission: SubmissionId,
    ) -> Result<Option<Assessment>, PersistenceError> {
        self.with_tables(|tables| {
            Ok(tables
                .assessments
                .values()
                .find(|row| row.submission_id == submission)
                .cloned())
        })
    }

    async fn submissions_of_student(
        &self,
        student: UserId,
    ) -> Result<Vec<Submission>, PersistenceError> {
        self.with_tables(|tables| {
            let mut rows: Vec<Submission> = tables
                .submissions
                .values()
                .filter(|row| row.student_id == student)
                .cloned()
                .collect();
            rows.sort_by_key(|row| Reverse((row.submitted_at, row.id)));
            Ok(rows)
        })
    }

    async fn assessments_of_student(
        &self,
        student: UserId,
    ) -> Result<Vec<Assessment>, PersistenceError> {
        self.with_tables(|tables| {
            let mut rows: Vec<Assessment> = tables
                .assessments
                .values()
                .filter(|row| {
                    tables
                        .submissions
                        .get(row.submission_id.get())
                        .is_some_and(|submission| submission.student_id == student)
                })
                .cloned()
                .collect();
            rows.sort_by_key(|row| Reverse((row.assessed_at, row.id)));
            Ok(rows)
        })
    }

    async fn pending_for_teacher(
        &self,
        teacher: UserId,
    ) -> Result<Vec<Submission>, PersistenceError> {
        self.with_tables(|tables| {
            let taught: BTreeSet<_> = tables
                .classes
                .values()
                .filter(|class| class.teacher_id == teacher)
                .map(|class| class.id)
                .collect();
            let mut rows: Vec<Submission> = tables
                .submissions
                .values()
                .filter(|row| row.status == SubmissionStatus::Submitted)
                .filter(|row| {
                    tables
                        .activities
                        .get(row.activity_id.get())
                        .and_then(|activity| activity.class_id)
                        .is_some_and(|class| taught.contains(&class))
                })
                .cloned()
                .collect();
            rows.sort_by_key(|row| (row.submitted_at, row.id));
            Ok(rows)
        })
    }
}
