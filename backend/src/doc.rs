//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the health probes, the
//! request and response bodies, and the schema wrappers that describe domain
//! types without coupling them to utoipa. Swagger UI serves it in debug
//! builds; the `openapi-dump` binary prints it for external tooling.

use crate::inbound::http::accounts::{LoginRequest, ProfileRequest, RegisterRequest, UserResponse};
use crate::inbound::http::analytics::MetricHistoryQuery;
use crate::inbound::http::audit::AccessLogQuery;
use crate::inbound::http::classrooms::{
    CreateActivityBody, CreateClassBody, GradeBody, SubmitAssignmentBody,
};
use crate::inbound::http::library::{
    AddNoteBody, AnalyticsBody, ContentQuery, ReportSightingBody, SightingQuery,
    UploadContentBody,
};
use crate::inbound::http::messaging::SendMessageBody;
use crate::inbound::http::organizations::{
    AccessCodeBody, AccessCodeResponse, CreateOrganizationBody, JoinOrganizationBody,
    SubscriptionBody,
};
use crate::inbound::http::programs::{CanvasBody, CreateProgramBody, EnrollProgramBody};
use crate::inbound::http::schemas::{
    AccessLogEntrySchema, ActivitySchema, AnalyticsDashboardSchema, AnalyticsRecordSchema,
    AssessmentSchema, ClassSchema, ContentSchema, ContentStatisticsSchema,
    ContentTypeCountSchema, EnrollmentSchema, ErrorCodeSchema, ErrorSchema, MemberSchema,
    MembershipSchema, MessageSchema, OrganizationSchema, ProgramPopularitySchema,
    RoleCountSchema, SightingSchema, SightingStatisticsSchema, StudentAccessRecordSchema,
    SubmissionSchema, SubscriptionCountSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the Komodo Hub API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Komodo Hub API",
        description = "Schools, communities, programs and the wildlife library behind Komodo Hub."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::accounts::update_profile,
        crate::inbound::http::accounts::student_record,
        crate::inbound::http::organizations::create_organization,
        crate::inbound::http::organizations::join_organization,
        crate::inbound::http::organizations::list_members,
        crate::inbound::http::organizations::generate_access_code,
        crate::inbound::http::organizations::update_subscription,
        crate::inbound::http::organizations::school_dashboard,
        crate::inbound::http::organizations::community_library,
        crate::inbound::http::classrooms::create_class,
        crate::inbound::http::classrooms::enroll_in_class,
        crate::inbound::http::classrooms::class_detail,
        crate::inbound::http::classrooms::create_activity,
        crate::inbound::http::classrooms::submit_assignment,
        crate::inbound::http::classrooms::grade_submission,
        crate::inbound::http::classrooms::teacher_dashboard,
        crate::inbound::http::classrooms::student_dashboard,
        crate::inbound::http::programs::create_program,
        crate::inbound::http::programs::enroll_in_program,
        crate::inbound::http::programs::save_canvas,
        crate::inbound::http::library::upload_content,
        crate::inbound::http::library::public_content,
        crate::inbound::http::library::view_content,
        crate::inbound::http::library::report_sighting,
        crate::inbound::http::library::browse_sightings,
        crate::inbound::http::library::verify_sighting,
        crate::inbound::http::library::add_note,
        crate::inbound::http::library::record_analytics,
        crate::inbound::http::messaging::send_message,
        crate::inbound::http::messaging::inbox,
        crate::inbound::http::messaging::mark_read,
        crate::inbound::http::audit::access_logs,
        crate::inbound::http::audit::student_access,
        crate::inbound::http::analytics::dashboard,
        crate::inbound::http::analytics::metric_history,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        OrganizationSchema,
        MembershipSchema,
        MemberSchema,
        ClassSchema,
        EnrollmentSchema,
        ActivitySchema,
        SubmissionSchema,
        AssessmentSchema,
        ContentSchema,
        SightingSchema,
        MessageSchema,
        AccessLogEntrySchema,
        StudentAccessRecordSchema,
        AnalyticsRecordSchema,
        AnalyticsDashboardSchema,
        RoleCountSchema,
        SubscriptionCountSchema,
        ProgramPopularitySchema,
        ContentTypeCountSchema,
        ContentStatisticsSchema,
        SightingStatisticsSchema,
        RegisterRequest,
        LoginRequest,
        ProfileRequest,
        UserResponse,
        CreateOrganizationBody,
        JoinOrganizationBody,
        AccessCodeBody,
        AccessCodeResponse,
        SubscriptionBody,
        CreateClassBody,
        CreateActivityBody,
        SubmitAssignmentBody,
        GradeBody,
        CreateProgramBody,
        EnrollProgramBody,
        CanvasBody,
        UploadContentBody,
        ContentQuery,
        ReportSightingBody,
        SightingQuery,
        AddNoteBody,
        AnalyticsBody,
        SendMessageBody,
        AccessLogQuery,
        MetricHistoryQuery,
    )),
    tags(
        (name = "accounts", description = "Registration, login and profiles"),
        (name = "organizations", description = "Schools and communities"),
        (name = "classrooms", description = "Classes, activities, submissions and grading"),
        (name = "programs", description = "Programs and creative canvases"),
        (name = "library", description = "Content, sightings, notes and analytics"),
        (name = "messaging", description = "Direct messages"),
        (name = "audit", description = "Access log and student data audits"),
        (name = "analytics", description = "Admin dashboard and metric histories"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Schema field structure and path registration.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        match schemas.get(name).unwrap_or_else(|| panic!("{name} schema")) {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected Object schema for {name}"),
        }
    }

    #[rstest]
    #[case("crate.domain.Error", &["code", "message", "traceId", "details"])]
    #[case("crate.domain.Submission", &["activityId", "studentId", "status"])]
    #[case("crate.domain.Sighting", &["speciesName", "observedAt", "verified"])]
    #[case("crate.domain.AccessLogEntry", &["action", "targetType", "origin"])]
    #[case("crate.domain.AnalyticsDashboard", &["totalUsers", "dailyActiveUsers", "latestMetrics"])]
    #[case("crate.domain.StudentAccessRecord", &["action", "accessorName", "accessorRole"])]
    #[case("RegisterRequest", &["username", "email", "password", "role"])]
    fn schemas_expose_camel_case_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let present = object_fields(name);
        for field in fields {
            assert!(present.iter().any(|p| p == field), "{name} lacks {field}");
        }
    }

    #[rstest]
    #[case("/api/v1/organizations/{id}/members")]
    #[case("/api/v1/submissions/{id}/assessment")]
    #[case("/api/v1/access-logs")]
    #[case("/api/v1/students/{id}/access-log")]
    #[case("/api/v1/analytics/dashboard")]
    #[case("/api/v1/analytics/metrics/{metricType}")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn session_cookie_scheme_is_declared() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
