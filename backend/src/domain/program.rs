//! Conservation programs, their enrollments, activities and canvases.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::vocabulary::define_vocabulary;
use super::{
    ActivityId, CanvasId, ClassId, OrganizationId, ProgramEnrollmentId, ProgramId, UserId,
};

/// Maximum program and activity name length.
pub const PROGRAM_NAME_MAX: usize = 200;

define_vocabulary! {
    /// Reach of a program.
    pub enum ProgramType as "program type" {
        Internal => "internal",
        Local => "local",
        Regional => "regional",
        National => "national",
    }
}

/// Named initiative; not owned by any organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
    pub description: Option<String>,
    pub program_type: ProgramType,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProgram {
    pub name: String,
    pub description: Option<String>,
    pub program_type: ProgramType,
    pub created_at: DateTime<Utc>,
}

/// Party enrolled in a program: exactly one user or one organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ProgramEnrollee {
    User(UserId),
    Organization(OrganizationId),
}

/// Error raised when stored enrollee columns break the exactly-one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("program enrollment must reference exactly one of user or organization")]
pub struct EnrolleeShapeError;

impl ProgramEnrollee {
    /// Rebuild the enrollee from nullable user and organization columns.
    pub fn from_columns(
        user_id: Option<i64>,
        organization_id: Option<i64>,
    ) -> Result<Self, EnrolleeShapeError> {
        match (user_id, organization_id) {
            (Some(user), None) => Ok(Self::User(UserId::new(user))),
            (None, Some(org)) => Ok(Self::Organization(OrganizationId::new(org))),
            _ => Err(EnrolleeShapeError),
        }
    }

    /// Split into the nullable storage columns.
    #[must_use]
    pub const fn to_columns(self) -> (Option<i64>, Option<i64>) {
        match self {
            Self::User(id) => (Some(id.get()), None),
            Self::Organization(id) => (None, Some(id.get())),
        }
    }
}

define_vocabulary! {
    /// Progress of a program enrollment.
    pub enum ProgramEnrollmentStatus as "program enrollment status" {
        Active => "active",
        Completed => "completed",
        Dropped => "dropped",
    }
}

/// Enrollment of a user or organization in a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramEnrollment {
    pub id: ProgramEnrollmentId,
    pub program_id: ProgramId,
    pub enrollee: ProgramEnrollee,
    pub enrolled_on: NaiveDate,
    pub status: ProgramEnrollmentStatus,
}

/// Insert payload for a program enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProgramEnrollment {
    pub program_id: ProgramId,
    pub enrollee: ProgramEnrollee,
    pub enrolled_on: NaiveDate,
}

define_vocabulary! {
    /// Format of an activity.
    pub enum ActivityType as "activity type" {
        InClass => "in-class",
        Outdoor => "outdoor",
        Challenge => "challenge",
        Game => "game",
        Assessment => "assessment",
    }
}

/// Task within a program, optionally scoped to one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub program_id: ProgramId,
    pub class_id: Option<ClassId>,
    pub name: String,
    pub activity_type: ActivityType,
    pub description: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for an activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub program_id: ProgramId,
    pub class_id: Option<ClassId>,
    pub name: String,
    pub activity_type: ActivityType,
    pub description: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Creative canvas for one user in one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    pub id: CanvasId,
    pub user_id: UserId,
    pub program_id: ProgramId,
    pub assets: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload keyed by (user, program). The latest write wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasUpsert {
    pub user_id: UserId,
    pub program_id: ProgramId,
    pub assets: Value,
    pub saved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(1), Some(2))]
    #[case(None, None)]
    fn enrollee_requires_exactly_one_column(
        #[case] user: Option<i64>,
        #[case] org: Option<i64>,
    ) {
        assert_eq!(
            ProgramEnrollee::from_columns(user, org),
            Err(EnrolleeShapeError)
        );
    }

    #[rstest]
    #[case(ProgramEnrollee::User(UserId::new(4)))]
    #[case(ProgramEnrollee::Organization(OrganizationId::new(9)))]
    fn enrollee_columns_round_trip(#[case] enrollee: ProgramEnrollee) {
        let (user, org) = enrollee.to_columns();
        assert_eq!(ProgramEnrollee::from_columns(user, org), Ok(enrollee));
    }

    #[rstest]
    fn activity_type_uses_hyphenated_storage_form() {
        assert_eq!(ActivityType::InClass.as_str(), "in-class");
        assert_eq!("in-class".parse::<ActivityType>(), Ok(ActivityType::InClass));
    }
}
