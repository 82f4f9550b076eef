//! Student submissions and their assessments.
//!
//! Lifecycle: `submitted → graded`. Grading is the only transition and it
//! happens together with the insert of the single [`Assessment`]. `returned`
//! is a stored value with no transition into it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::vocabulary::define_vocabulary;
use super::{ActivityId, AssessmentId, SubmissionId, UserId};

define_vocabulary! {
    /// Lifecycle state of a submission.
    pub enum SubmissionStatus as "submission status" {
        Submitted => "submitted",
        Graded => "graded",
        /// Reserved; no operation moves a submission here.
        Returned => "returned",
    }
}

impl SubmissionStatus {
    /// Whether a submission in this state may receive an assessment.
    #[must_use]
    pub const fn is_gradable(self) -> bool {
        matches!(self, Self::Submitted)
    }

    /// Whether moving from `self` to `next` is an allowed transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!((self, next), (Self::Submitted, Self::Graded))
    }
}

/// A student's response to an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub activity_id: ActivityId,
    pub student_id: UserId,
    pub data: Option<String>,
    pub file_path: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
}

/// Insert payload for a submission; status starts at `submitted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub activity_id: ActivityId,
    pub student_id: UserId,
    pub data: Option<String>,
    pub file_path: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Grade validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GradeError {
    /// Grade was blank.
    #[error("grade must not be empty")]
    Empty,
    /// Grade exceeded the storage limit.
    #[error("grade must be at most {max} characters")]
    TooLong {
        /// Maximum length.
        max: usize,
    },
}

const GRADE_MAX: usize = 10;

/// Short free-form grade such as `A-` or `87`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Grade(String);

impl Grade {
    /// Validate and construct a grade.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, GradeError> {
        let value = raw.as_ref().trim();
        if value.is_empty() {
            return Err(GradeError::Empty);
        }
        if value.chars().count() > GRADE_MAX {
            return Err(GradeError::TooLong { max: GRADE_MAX });
        }
        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for Grade {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Grade> for String {
    fn from(value: Grade) -> Self {
        value.0
    }
}

impl TryFrom<String> for Grade {
    type Error = GradeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Teacher's grade and feedback for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: AssessmentId,
    pub submission_id: SubmissionId,
    pub teacher_id: UserId,
    pub grade: Grade,
    pub feedback: Option<String>,
    pub assessed_at: DateTime<Utc>,
}

/// Insert payload for an assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssessment {
    pub submission_id: SubmissionId,
    pub teacher_id: UserId,
    pub grade: Grade,
    pub feedback: Option<String>,
    pub assessed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SubmissionStatus::Submitted, SubmissionStatus::Graded, true)]
    #[case(SubmissionStatus::Graded, SubmissionStatus::Returned, false)]
    #[case(SubmissionStatus::Submitted, SubmissionStatus::Returned, false)]
    #[case(SubmissionStatus::Graded, SubmissionStatus::Submitted, false)]
    #[case(SubmissionStatus::Returned, SubmissionStatus::Graded, false)]
    fn only_grading_transition_is_allowed(
        #[case] from: SubmissionStatus,
        #[case] to: SubmissionStatus,
        #[case] expected: bool,
    ) {
        assert_eq!(from.can_transition_to(to), expected);
    }

    #[rstest]
    fn returned_is_not_gradable() {
        assert!(!SubmissionStatus::Returned.is_gradable());
        assert!(!SubmissionStatus::Graded.is_gradable());
        assert!(SubmissionStatus::Submitted.is_gradable());
    }

    #[rstest]
    #[case(" ", GradeError::Empty)]
    #[case("exceptional!", GradeError::TooLong { max: 10 })]
    fn grade_rejects_invalid_values(#[case] raw: &str, #[case] expected: GradeError) {
        assert_eq!(Grade::new(raw), Err(expected));
    }

    #[rstest]
    fn grade_trims_input() {
        assert_eq!(Grade::new(" A- ").expect("valid grade").as_ref(), "A-");
    }
}
