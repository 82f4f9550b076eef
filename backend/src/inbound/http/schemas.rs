//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their serialised shape and register under the domain
//! type's path so handler annotations can name the domain type directly.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist or is hidden from the caller.
    #[schema(rename = "not_found")]
    NotFound,
    /// The action duplicates existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A precondition on the target entity does not hold.
    #[schema(rename = "invalid_state")]
    InvalidState,
    /// The data store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "name must not be empty")]
    message: String,
    /// Request correlation identifier, echoed in the `trace-id` header.
    #[schema(example = "6f1c0e8e-4c5b-4fb0-9a53-2f1b3c1f9d10")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Organization`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Organization, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct OrganizationSchema {
    id: i64,
    /// `school` or `community`.
    #[schema(example = "school")]
    org_type: String,
    #[schema(example = "Komodo Primary")]
    name: String,
    profile: Option<String>,
    is_public: bool,
    /// `pending`, `active` or `inactive`.
    #[schema(example = "pending")]
    subscription_status: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Membership`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Membership, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MembershipSchema {
    id: i64,
    organization_id: i64,
    user_id: i64,
    #[schema(example = "teacher")]
    role: String,
    access_code: Option<String>,
    #[schema(value_type = String, format = Date)]
    joined_on: String,
}

/// OpenAPI schema for [`crate::domain::Member`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Member, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MemberSchema {
    user_id: i64,
    username: String,
    #[schema(example = "student")]
    role: String,
    #[schema(value_type = String, format = Date)]
    joined_on: String,
}

/// OpenAPI schema for [`crate::domain::Class`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Class, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ClassSchema {
    id: i64,
    organization_id: i64,
    teacher_id: i64,
    #[schema(example = "Year 5 Wildlife")]
    name: String,
    syllabus: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Enrollment`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Enrollment, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EnrollmentSchema {
    id: i64,
    class_id: i64,
    student_id: i64,
    #[schema(value_type = String, format = Date)]
    enrolled_on: String,
    #[schema(example = "active")]
    status: String,
}

/// OpenAPI schema for [`crate::domain::Activity`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Activity, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ActivitySchema {
    id: i64,
    program_id: i64,
    class_id: Option<i64>,
    name: String,
    #[schema(example = "outdoor")]
    activity_type: String,
    description: Option<String>,
    created_by: i64,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Submission`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Submission, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SubmissionSchema {
    id: i64,
    activity_id: i64,
    student_id: i64,
    data: Option<String>,
    file_path: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    submitted_at: String,
    /// `submitted`, `graded` or `returned`.
    #[schema(example = "submitted")]
    status: String,
}

/// OpenAPI schema for [`crate::domain::Assessment`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Assessment, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AssessmentSchema {
    id: i64,
    submission_id: i64,
    teacher_id: i64,
    #[schema(example = "A-")]
    grade: String,
    feedback: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    assessed_at: String,
}

/// OpenAPI schema for [`crate::domain::Content`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Content, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ContentSchema {
    id: i64,
    title: String,
    #[schema(example = "article")]
    content_type: String,
    body: Option<String>,
    created_by: i64,
    organization_id: Option<i64>,
    is_public: bool,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Sighting`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Sighting, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SightingSchema {
    id: i64,
    #[schema(example = "Varanus komodoensis")]
    species_name: String,
    #[schema(example = "Rinca Island")]
    location: String,
    #[schema(value_type = String, format = DateTime)]
    observed_at: String,
    description: Option<String>,
    photo_path: Option<String>,
    reported_by: i64,
    verified: bool,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Message`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Message, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MessageSchema {
    id: i64,
    sender_id: i64,
    recipient_id: i64,
    text: String,
    #[schema(value_type = String, format = DateTime)]
    sent_at: String,
    #[schema(value_type = Option<String>, format = DateTime)]
    read_at: Option<String>,
}

/// OpenAPI schema for [`crate::domain::AccessLogEntry`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AccessLogEntry, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AccessLogEntrySchema {
    id: i64,
    /// Absent for anonymous or failed actions.
    user_id: Option<i64>,
    #[schema(example = "grade_submission")]
    action: String,
    target_type: Option<String>,
    target_id: Option<i64>,
    #[schema(value_type = String, format = DateTime)]
    recorded_at: String,
    #[schema(example = "203.0.113.7")]
    origin: Option<String>,
}

/// OpenAPI schema for [`crate::domain::AnalyticsRecord`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AnalyticsRecord, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AnalyticsRecordSchema {
    id: i64,
    #[schema(example = "daily_active_users")]
    metric_type: String,
    metric_value: Option<f64>,
    metric_data: Option<serde_json::Value>,
    #[schema(value_type = String, format = DateTime)]
    recorded_at: String,
}

/// OpenAPI schema for [`crate::domain::RoleCount`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RoleCount, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RoleCountSchema {
    #[schema(example = "student")]
    role: String,
    count: u64,
}

/// OpenAPI schema for [`crate::domain::SubscriptionCount`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SubscriptionCount, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SubscriptionCountSchema {
    #[schema(example = "school")]
    org_type: String,
    #[schema(example = "active")]
    status: String,
    count: u64,
}

/// OpenAPI schema for [`crate::domain::ProgramPopularity`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ProgramPopularity, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ProgramPopularitySchema {
    program_id: i64,
    name: String,
    #[schema(example = "regional")]
    program_type: String,
    /// Active enrollments only.
    enrollment_count: u64,
}

/// OpenAPI schema for [`crate::domain::ContentTypeCount`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ContentTypeCount, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ContentTypeCountSchema {
    #[schema(example = "article")]
    content_type: String,
    public: u64,
    private: u64,
}

/// OpenAPI schema for [`crate::domain::ContentStatistics`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ContentStatistics, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ContentStatisticsSchema {
    by_type: Vec<ContentTypeCountSchema>,
    public_count: u64,
    private_count: u64,
    total_count: u64,
}

/// OpenAPI schema for [`crate::domain::SightingStatistics`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SightingStatistics, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SightingStatisticsSchema {
    total_sightings: u64,
    unique_species: u64,
    unique_reporters: u64,
    verified_count: u64,
}

/// OpenAPI schema for [`crate::domain::AnalyticsDashboard`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AnalyticsDashboard, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AnalyticsDashboardSchema {
    #[schema(value_type = String, format = DateTime)]
    generated_at: String,
    user_demographics: Vec<RoleCountSchema>,
    total_users: u64,
    subscriptions: Vec<SubscriptionCountSchema>,
    active_subscriptions: u64,
    /// At most ten programs, most enrolled first.
    program_popularity: Vec<ProgramPopularitySchema>,
    content: ContentStatisticsSchema,
    sightings: SightingStatisticsSchema,
    /// Distinct users with an access log entry since midnight UTC.
    daily_active_users: u64,
    latest_metrics: Vec<AnalyticsRecordSchema>,
}

/// OpenAPI schema for [`crate::domain::StudentAccessRecord`].
///
/// The access log entry fields sit inline next to the accessor.
#[derive(ToSchema)]
#[schema(as = crate::domain::StudentAccessRecord, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct StudentAccessRecordSchema {
    id: i64,
    user_id: Option<i64>,
    #[schema(example = "access_student_data")]
    action: String,
    target_type: Option<String>,
    target_id: Option<i64>,
    #[schema(value_type = String, format = DateTime)]
    recorded_at: String,
    origin: Option<String>,
    /// Absent when the accessor's account no longer exists.
    #[schema(example = "ms_rahma")]
    accessor_name: Option<String>,
    #[schema(example = "teacher")]
    accessor_role: Option<String>,
}
