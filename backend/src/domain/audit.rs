//! Acting identity and the append-only access log.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::vocabulary::define_vocabulary;
use super::{AccessLogId, UserId};

/// Authenticated caller on whose behalf a service operation runs.
///
/// Services receive the actor explicitly on every call and reload the
/// account's role from storage; the actor carries identity only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    user_id: UserId,
    origin: Option<IpAddr>,
}

impl Actor {
    /// Build an actor for `user_id` calling from `origin`.
    #[must_use]
    pub const fn new(user_id: UserId, origin: Option<IpAddr>) -> Self {
        Self { user_id, origin }
    }

    /// Acting user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Network origin of the request, when known.
    #[must_use]
    pub const fn origin(&self) -> Option<IpAddr> {
        self.origin
    }
}

define_vocabulary! {
    /// Sensitive actions mirrored into the access log.
    pub enum AuditAction as "audit action" {
        Register => "register",
        Login => "login",
        LoginFailed => "login_failed",
        UpdateProfile => "update_profile",
        AccessStudentData => "access_student_data",
        CreateOrganization => "create_organization",
        JoinOrganization => "join_organization",
        GenerateAccessCode => "generate_access_code",
        UpdateSubscription => "update_subscription",
        CreateClass => "create_class",
        EnrollClass => "enroll_class",
        CreateActivity => "create_activity",
        SubmitAssignment => "submit_assignment",
        GradeSubmission => "grade_submission",
        CreateProgram => "create_program",
        EnrollProgram => "enroll_program",
        SaveCanvas => "save_canvas",
        UploadContent => "upload_content",
        ReportSighting => "report_sighting",
        VerifySighting => "verify_sighting",
        AddNote => "add_note",
        SendMessage => "send_message",
        RecordAnalytics => "record_analytics",
    }
}

define_vocabulary! {
    /// Kind of entity an access log entry points at.
    pub enum TargetKind as "audit target" {
        User => "user",
        Student => "student",
        Organization => "organization",
        Class => "class",
        Activity => "activity",
        Submission => "submission",
        Program => "program",
        Canvas => "canvas",
        Content => "content",
        Sighting => "sighting",
        Note => "note",
        Message => "message",
        Analytics => "analytics",
    }
}

/// Entity referenced by an access log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditTarget {
    pub kind: TargetKind,
    pub id: i64,
}

impl AuditTarget {
    /// Reference `id` of the given kind.
    pub fn new(kind: TargetKind, id: impl Into<i64>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// Entry to append to the access log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccessLogEntry {
    /// `None` for anonymous or failed actions.
    pub user_id: Option<UserId>,
    pub action: AuditAction,
    pub target: Option<AuditTarget>,
    pub origin: Option<IpAddr>,
    pub recorded_at: DateTime<Utc>,
}

/// Stored access log entry.
///
/// Action and target strings are kept verbatim so entries written by other
/// tools remain readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogEntry {
    pub id: AccessLogId,
    pub user_id: Option<UserId>,
    pub action: String,
    pub target_type: Option<String>,
    pub target_id: Option<i64>,
    pub recorded_at: DateTime<Utc>,
    pub origin: Option<String>,
}
