//! Internal Diesel row structs and their conversions into domain types.
//!
//! Rows never leave the persistence layer. Stored strings that fail domain
//! validation surface as [`PersistenceError::Query`]; they indicate data
//! written outside the application.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

use crate::domain::ports::PersistenceError;
use crate::domain::{
    AccessCode, AccessLogEntry, AccessLogId, Activity, ActivityId, AnalyticsId, AnalyticsRecord,
    Assessment, AssessmentId, Canvas, CanvasId, Class, ClassId, Content, ContentId, Email,
    Enrollment, EnrollmentId, Grade, Membership, MembershipId, Message, MessageId, Note, NoteId,
    Organization, OrganizationId, PasswordHash, Program, ProgramEnrollee, ProgramEnrollment,
    ProgramEnrollmentId, ProgramId, Sighting, SightingId, Submission, SubmissionId,
    UnknownVariant, User, UserId, UserProfile, Username,
};

use super::schema::{
    access_logs, activities, assessments, business_analytics, class_enrollments, classes,
    content_library, creative_canvas, messages, notes, organization_members, organizations,
    program_enrollments, programs, species_sightings, submissions, user_profiles, users,
};

/// Parse a vocabulary column.
pub(crate) fn decode<T>(raw: &str) -> Result<T, PersistenceError>
where
    T: FromStr<Err = UnknownVariant>,
{
    raw.parse()
        .map_err(|err: UnknownVariant| PersistenceError::query(err.to_string()))
}

fn invalid(column: &str, err: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::query(format!("stored {column} is invalid: {err}"))
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(row.id),
            username: Username::new(&row.username).map_err(|err| invalid("username", err))?,
            email: Email::new(&row.email).map_err(|err| invalid("email", err))?,
            password_hash: PasswordHash::from_phc(row.password_hash),
            role: decode(&row.role)?,
            created_at: row.created_at,
            last_login: row.last_login,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = user_profiles)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserProfileRow {
    pub user_id: i64,
    pub avatar_path: Option<String>,
    pub color_scheme: Option<String>,
    pub bio: Option<String>,
    pub is_public: bool,
}

impl From<UserProfileRow> for UserProfile {
    fn from(row: UserProfileRow) -> Self {
        Self {
            user_id: UserId::new(row.user_id),
            avatar_path: row.avatar_path,
            color_scheme: row.color_scheme,
            bio: row.bio,
            is_public: row.is_public,
        }
    }
}

impl From<&UserProfile> for UserProfileRow {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user_id: profile.user_id.get(),
            avatar_path: profile.avatar_path.clone(),
            color_scheme: profile.color_scheme.clone(),
            bio: profile.bio.clone(),
            is_public: profile.is_public,
        }
    }
}

// ---------------------------------------------------------------------------
// Organizations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = organizations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrganizationRow {
    pub id: i64,
    pub org_type: String,
    pub name: String,
    pub profile: Option<String>,
    pub is_public: bool,
    pub subscription_status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<OrganizationRow> for Organization {
    type Error = PersistenceError;

    fn try_from(row: OrganizationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrganizationId::new(row.id),
            org_type: decode(&row.org_type)?,
            name: row.name,
            profile: row.profile,
            is_public: row.is_public,
            subscription_status: decode(&row.subscription_status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = organizations)]
pub(crate) struct NewOrganizationRow<'a> {
    pub org_type: &'a str,
    pub name: &'a str,
    pub profile: Option<&'a str>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = organization_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MembershipRow {
    pub id: i64,
    pub org_id: i64,
    pub user_id: i64,
    pub role: String,
    pub access_code: Option<String>,
    pub joined_on: NaiveDate,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = PersistenceError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        let access_code = row
            .access_code
            .map(AccessCode::new)
            .transpose()
            .map_err(|err| invalid("access_code", err))?;
        Ok(Self {
            id: MembershipId::new(row.id),
            organization_id: OrganizationId::new(row.org_id),
            user_id: UserId::new(row.user_id),
            role: decode(&row.role)?,
            access_code,
            joined_on: row.joined_on,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = organization_members)]
pub(crate) struct NewMembershipRow<'a> {
    pub org_id: i64,
    pub user_id: i64,
    pub role: &'a str,
    pub access_code: Option<&'a str>,
    pub joined_on: NaiveDate,
}

// ---------------------------------------------------------------------------
// Classes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = classes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClassRow {
    pub id: i64,
    pub org_id: i64,
    pub teacher_id: i64,
    pub name: String,
    pub syllabus: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ClassRow> for Class {
    fn from(row: ClassRow) -> Self {
        Self {
            id: ClassId::new(row.id),
            organization_id: OrganizationId::new(row.org_id),
            teacher_id: UserId::new(row.teacher_id),
            name: row.name,
            syllabus: row.syllabus,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = classes)]
pub(crate) struct NewClassRow<'a> {
    pub org_id: i64,
    pub teacher_id: i64,
    pub name: &'a str,
    pub syllabus: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = class_enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EnrollmentRow {
    pub id: i64,
    pub class_id: i64,
    pub student_id: i64,
    pub enrolled_on: NaiveDate,
    pub status: String,
}

impl TryFrom<EnrollmentRow> for Enrollment {
    type Error = PersistenceError;

    fn try_from(row: EnrollmentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EnrollmentId::new(row.id),
            class_id: ClassId::new(row.class_id),
            student_id: UserId::new(row.student_id),
            enrolled_on: row.enrolled_on,
            status: decode(&row.status)?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = class_enrollments)]
pub(crate) struct NewEnrollmentRow {
    pub class_id: i64,
    pub student_id: i64,
    pub enrolled_on: NaiveDate,
}

// ---------------------------------------------------------------------------
// Programs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = programs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProgramRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub program_type: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ProgramRow> for Program {
    type Error = PersistenceError;

    fn try_from(row: ProgramRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProgramId::new(row.id),
            name: row.name,
            description: row.description,
            program_type: decode(&row.program_type)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = programs)]
pub(crate) struct NewProgramRow<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub program_type: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = program_enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProgramEnrollmentRow {
    pub id: i64,
    pub program_id: i64,
    pub user_id: Option<i64>,
    pub org_id: Option<i64>,
    pub enrolled_on: NaiveDate,
    pub status: String,
}

impl TryFrom<ProgramEnrollmentRow> for ProgramEnrollment {
    type Error = PersistenceError;

    fn try_from(row: ProgramEnrollmentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProgramEnrollmentId::new(row.id),
            program_id: ProgramId::new(row.program_id),
            enrollee: ProgramEnrollee::from_columns(row.user_id, row.org_id)
                .map_err(|err| invalid("program enrollee", err))?,
            enrolled_on: row.enrolled_on,
            status: decode(&row.status)?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = program_enrollments)]
pub(crate) struct NewProgramEnrollmentRow {
    pub program_id: i64,
    pub user_id: Option<i64>,
    pub org_id: Option<i64>,
    pub enrolled_on: NaiveDate,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ActivityRow {
    pub id: i64,
    pub program_id: i64,
    pub class_id: Option<i64>,
    pub name: String,
    pub activity_type: String,
    pub description: Option<String>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = PersistenceError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActivityId::new(row.id),
            program_id: ProgramId::new(row.program_id),
            class_id: row.class_id.map(ClassId::new),
            name: row.name,
            activity_type: decode(&row.activity_type)?,
            description: row.description,
            created_by: UserId::new(row.created_by),
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = activities)]
pub(crate) struct NewActivityRow<'a> {
    pub program_id: i64,
    pub class_id: Option<i64>,
    pub name: &'a str,
    pub activity_type: &'a str,
    pub description: Option<&'a str>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = creative_canvas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CanvasRow {
    pub id: i64,
    pub user_id: i64,
    pub program_id: i64,
    pub assets: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CanvasRow> for Canvas {
    fn from(row: CanvasRow) -> Self {
        Self {
            id: CanvasId::new(row.id),
            user_id: UserId::new(row.user_id),
            program_id: ProgramId::new(row.program_id),
            assets: row.assets,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = creative_canvas)]
pub(crate) struct NewCanvasRow<'a> {
    pub user_id: i64,
    pub program_id: i64,
    pub assets: &'a Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = submissions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SubmissionRow {
    pub id: i64,
    pub activity_id: i64,
    pub student_id: i64,
    pub data: Option<String>,
    pub file_path: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub status: String,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = PersistenceError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: SubmissionId::new(row.id),
            activity_id: ActivityId::new(row.activity_id),
            student_id: UserId::new(row.student_id),
            data: row.data,
            file_path: row.file_path,
            submitted_at: row.submitted_at,
            status: decode(&row.status)?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = submissions)]
pub(crate) struct NewSubmissionRow<'a> {
    pub activity_id: i64,
    pub student_id: i64,
    pub data: Option<&'a str>,
    pub file_path: Option<&'a str>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = assessments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AssessmentRow {
    pub id: i64,
    pub submission_id: i64,
    pub teacher_id: i64,
    pub grade: String,
    pub feedback: Option<String>,
    pub assessed_at: DateTime<Utc>,
}

impl TryFrom<AssessmentRow> for Assessment {
    type Error = PersistenceError;

    fn try_from(row: AssessmentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AssessmentId::new(row.id),
            submission_id: SubmissionId::new(row.submission_id),
            teacher_id: UserId::new(row.teacher_id),
            grade: Grade::new(&row.grade).map_err(|err| invalid("grade", err))?,
            feedback: row.feedback,
            assessed_at: row.assessed_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = assessments)]
pub(crate) struct NewAssessmentRow<'a> {
    pub submission_id: i64,
    pub teacher_id: i64,
    pub grade: &'a str,
    pub feedback: Option<&'a str>,
    pub assessed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Library
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = content_library)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContentRow {
    pub id: i64,
    pub title: String,
    pub content_type: String,
    pub body: Option<String>,
    pub created_by: i64,
    pub org_id: Option<i64>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ContentRow> for Content {
    type Error = PersistenceError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ContentId::new(row.id),
            title: row.title,
            content_type: decode(&row.content_type)?,
            body: row.body,
            created_by: UserId::new(row.created_by),
            organization_id: row.org_id.map(OrganizationId::new),
            is_public: row.is_public,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = content_library)]
pub(crate) struct NewContentRow<'a> {
    pub title: &'a str,
    pub content_type: &'a str,
    pub body: Option<&'a str>,
    pub created_by: i64,
    pub org_id: Option<i64>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = species_sightings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SightingRow {
    pub id: i64,
    pub species_name: String,
    pub location: String,
    pub observed_at: DateTime<Utc>,
    pub description: Option<String>,
    pub photo_path: Option<String>,
    pub reported_by: i64,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<SightingRow> for Sighting {
    fn from(row: SightingRow) -> Self {
        Self {
            id: SightingId::new(row.id),
            species_name: row.species_name,
            location: row.location,
            observed_at: row.observed_at,
            description: row.description,
            photo_path: row.photo_path,
            reported_by: UserId::new(row.reported_by),
            verified: row.verified,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = species_sightings)]
pub(crate) struct NewSightingRow<'a> {
    pub species_name: &'a str,
    pub location: &'a str,
    pub observed_at: DateTime<Utc>,
    pub description: Option<&'a str>,
    pub photo_path: Option<&'a str>,
    pub reported_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NoteRow {
    pub id: i64,
    pub teacher_id: i64,
    pub target_type: String,
    pub target_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NoteRow> for Note {
    type Error = PersistenceError;

    fn try_from(row: NoteRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: NoteId::new(row.id),
            teacher_id: UserId::new(row.teacher_id),
            target_type: decode(&row.target_type)?,
            target_id: row.target_id,
            text: row.text,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notes)]
pub(crate) struct NewNoteRow<'a> {
    pub teacher_id: i64,
    pub target_type: &'a str,
    pub target_id: i64,
    pub text: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = business_analytics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AnalyticsRow {
    pub id: i64,
    pub metric_type: String,
    pub metric_value: Option<f64>,
    pub metric_data: Option<Value>,
    pub recorded_at: DateTime<Utc>,
}

impl From<AnalyticsRow> for AnalyticsRecord {
    fn from(row: AnalyticsRow) -> Self {
        Self {
            id: AnalyticsId::new(row.id),
            metric_type: row.metric_type,
            metric_value: row.metric_value,
            metric_data: row.metric_data,
            recorded_at: row.recorded_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = business_analytics)]
pub(crate) struct NewAnalyticsRow<'a> {
    pub metric_type: &'a str,
    pub metric_value: Option<f64>,
    pub metric_data: Option<&'a Value>,
    pub recorded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Messaging and audit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MessageRow {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: MessageId::new(row.id),
            sender_id: UserId::new(row.sender_id),
            recipient_id: UserId::new(row.recipient_id),
            text: row.text,
            sent_at: row.sent_at,
            read_at: row.read_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub(crate) struct NewMessageRow<'a> {
    pub sender_id: i64,
    pub recipient_id: i64,
    pub text: &'a str,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = access_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccessLogRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub action: String,
    pub target_type: Option<String>,
    pub target_id: Option<i64>,
    pub recorded_at: DateTime<Utc>,
    pub origin: Option<String>,
}

impl From<AccessLogRow> for AccessLogEntry {
    fn from(row: AccessLogRow) -> Self {
        Self {
            id: AccessLogId::new(row.id),
            user_id: row.user_id.map(UserId::new),
            action: row.action,
            target_type: row.target_type,
            target_id: row.target_id,
            recorded_at: row.recorded_at,
            origin: row.origin,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = access_logs)]
pub(crate) struct NewAccessLogRow<'a> {
    pub user_id: Option<i64>,
    pub action: &'a str,
    pub target_type: Option<&'a str>,
    pub target_id: Option<i64>,
    pub recorded_at: DateTime<Utc>,
    pub origin: Option<String>,
}

/// Convert a batch of rows, failing on the first invalid one.
pub(crate) fn convert_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, PersistenceError>
where
    T: TryFrom<R, Error = PersistenceError>,
{
    rows.into_iter().map(T::try_from).collect()
}
