//! Classes taught inside schools and the students enrolled in them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::vocabulary::define_vocabulary;
use super::{ClassId, EnrollmentId, OrganizationId, UserId};

/// Maximum class name length.
pub const CLASS_NAME_MAX: usize = 100;

/// Class owned by one teacher within a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: ClassId,
    pub organization_id: OrganizationId,
    pub teacher_id: UserId,
    pub name: String,
    pub syllabus: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClass {
    pub organization_id: OrganizationId,
    pub teacher_id: UserId,
    pub name: String,
    pub syllabus: Option<String>,
    pub created_at: DateTime<Utc>,
}

define_vocabulary! {
    /// Whether an enrollment still grants access to the class.
    pub enum EnrollmentStatus as "enrollment status" {
        Active => "active",
        Inactive => "inactive",
    }
}

/// Student registration in a class. Unique per (class, student).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub class_id: ClassId,
    pub student_id: UserId,
    pub enrolled_on: NaiveDate,
    pub status: EnrollmentStatus,
}

/// Insert payload for a class enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEnrollment {
    pub class_id: ClassId,
    pub student_id: UserId,
    pub enrolled_on: NaiveDate,
}
