//! Domain primitives, authorization and services.
//!
//! Purpose: define the strongly typed entities of the hub, the permission
//! rules that guard them and the services that drive every use-case. The
//! domain talks to storage only through the ports in [`ports`]; adapters
//! live under `outbound` and `inbound`.
//!
//! Public surface:
//! - entities and vocabularies (`User`, `Organization`, `Class`, ...).
//! - `Error` / `ErrorCode`: transport-agnostic failures.
//! - `PermissionEngine`: role and relationship checks.
//! - one service per driving port (`AccountService`, `AnalyticsService`,
//!   ...), all built from a shared [`Repositories`] bundle.

pub mod analytics;
pub mod audit;
pub mod auth;
pub mod classroom;
pub mod error;
pub mod ids;
pub mod library;
pub mod message;
pub mod organization;
pub mod permissions;
pub mod ports;
pub mod program;
pub mod submission;
pub mod trace_id;
pub mod user;
pub mod vocabulary;

mod account_service;
mod analytics_service;
mod audit_service;
mod classroom_service;
mod library_service;
mod messaging_service;
mod organization_service;
mod program_service;
mod service_support;
#[cfg(test)]
mod test_fixtures;

pub use self::account_service::AccountService;
pub use self::analytics::{
    AnalyticsDashboard, ContentStatistics, ContentTypeCount, METRIC_HISTORY_DAYS_DEFAULT,
    METRIC_HISTORY_DAYS_MAX, PROGRAM_POPULARITY_TOP, ProgramPopularity, RoleCount,
    SightingStatistics, StudentAccessRecord, SubscriptionCount,
};
pub use self::analytics_service::AnalyticsService;
pub use self::audit::{AccessLogEntry, Actor, AuditAction, AuditTarget, NewAccessLogEntry, TargetKind};
pub use self::audit_service::AuditService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN, PasswordHash, PasswordHashError,
    Registration, RegistrationValidationError,
};
pub use self::classroom::{
    CLASS_NAME_MAX, Class, Enrollment, EnrollmentStatus, NewClass, NewEnrollment,
};
pub use self::classroom_service::ClassroomService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{
    AccessLogId, ActivityId, AnalyticsId, AssessmentId, CanvasId, ClassId, ContentId,
    EnrollmentId, MembershipId, MessageId, NoteId, OrganizationId, ProgramEnrollmentId,
    ProgramId, SightingId, SubmissionId, UserId,
};
pub use self::library::{
    AnalyticsRecord, CONTENT_TITLE_MAX, Content, ContentType, LISTING_LIMIT_MAX, LOCATION_MAX,
    NewAnalyticsRecord, NewContent, NewNote, NewSighting, Note, NoteTargetType,
    SPECIES_NAME_MAX, Sighting, SightingFilter,
};
pub use self::library_service::LibraryService;
pub use self::message::{Message, NewMessage};
pub use self::messaging_service::MessagingService;
pub use self::organization::{
    AccessCode, AccessCodeError, Member, Membership, MembershipRole, NewMembership,
    NewOrganization, ORGANIZATION_NAME_MAX, Organization, OrganizationType, SubscriptionStatus,
    founder_role, join_role,
};
pub use self::organization_service::OrganizationService;
pub use self::permissions::{PermissionEngine, RoleGate, StudentDataAccess};
pub use self::program::{
    Activity, ActivityType, Canvas, CanvasUpsert, EnrolleeShapeError, NewActivity, NewProgram,
    NewProgramEnrollment, PROGRAM_NAME_MAX, Program, ProgramEnrollee, ProgramEnrollment,
    ProgramEnrollmentStatus, ProgramType,
};
pub use self::program_service::ProgramService;
pub use self::service_support::Repositories;
pub use self::submission::{
    Assessment, Grade, GradeError, NewAssessment, NewSubmission, Submission, SubmissionStatus,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, NewUser, USERNAME_MAX, USERNAME_MIN, User, UserProfile, UserRole,
    UserValidationError, Username,
};
pub use self::vocabulary::UnknownVariant;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use komodo_hub::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
