//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by the outbound adapters;
//! driving ports (`Accounts`, `Analytics`, `Organizations`, ...) are implemented by the
//! domain services and consumed by the HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod access_log_repository;
mod accounts;
mod analytics;
mod analytics_repository;
mod audit_query;
mod class_repository;
mod classrooms;
mod library;
mod library_repository;
mod message_repository;
mod messaging;
mod organization_repository;
mod organizations;
mod persistence_error;
mod program_repository;
mod programs;
mod submission_repository;
mod user_repository;

pub use access_log_repository::AccessLogRepository;
#[cfg(test)]
pub use access_log_repository::MockAccessLogRepository;
pub use accounts::{Accounts, ProfileUpdate, StudentRecord};
pub use analytics::Analytics;
pub use analytics_repository::AnalyticsRepository;
#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
pub use audit_query::AuditQuery;
pub use class_repository::ClassRepository;
#[cfg(test)]
pub use class_repository::MockClassRepository;
pub use classrooms::{
    ClassDetail, Classrooms, CreateActivityRequest, CreateClassRequest, GradeRequest,
    StudentDashboard, SubmitAssignmentRequest, TeacherDashboard,
};
pub use library::{
    AddNoteRequest, Library, RecordAnalyticsRequest, ReportSightingRequest, UploadContentRequest,
};
pub use library_repository::LibraryRepository;
#[cfg(test)]
pub use library_repository::MockLibraryRepository;
pub use message_repository::MessageRepository;
#[cfg(test)]
pub use message_repository::MockMessageRepository;
pub use messaging::Messaging;
#[cfg(test)]
pub use organization_repository::MockOrganizationRepository;
pub use organization_repository::OrganizationRepository;
pub use organizations::{
    CommunityLibrary, CreateOrganizationRequest, Organizations, PublicMember, SchoolDashboard,
};
pub use persistence_error::PersistenceError;
#[cfg(test)]
pub use program_repository::MockProgramRepository;
pub use program_repository::ProgramRepository;
pub use programs::{CreateProgramRequest, Programs};
#[cfg(test)]
pub use submission_repository::MockSubmissionRepository;
pub use submission_repository::SubmissionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
