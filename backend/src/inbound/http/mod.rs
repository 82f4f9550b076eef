//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod analytics;
pub mod audit;
pub mod classrooms;
pub mod error;
pub mod health;
pub mod library;
pub mod messaging;
pub mod organizations;
pub mod programs;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// Callers mount this inside the versioned scope and supply the session
/// middleware, [`state::HttpState`] and the extractor configs from
/// [`validation`].
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::register)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::current_user)
        .service(accounts::update_profile)
        .service(accounts::student_record)
        .service(organizations::create_organization)
        .service(organizations::join_organization)
        .service(organizations::list_members)
        .service(organizations::generate_access_code)
        .service(organizations::update_subscription)
        .service(organizations::school_dashboard)
        .service(organizations::community_library)
        .service(classrooms::create_class)
        .service(classrooms::enroll_in_class)
        .service(classrooms::class_detail)
        .service(classrooms::create_activity)
        .service(classrooms::submit_assignment)
        .service(classrooms::grade_submission)
        .service(classrooms::teacher_dashboard)
        .service(classrooms::student_dashboard)
        .service(programs::create_program)
        .service(programs::enroll_in_program)
        .service(programs::save_canvas)
        .service(library::upload_content)
        .service(library::public_content)
        .service(library::view_content)
        .service(library::report_sighting)
        .service(library::browse_sightings)
        .service(library::verify_sighting)
        .service(library::add_note)
        .service(library::record_analytics)
        .service(messaging::send_message)
        .service(messaging::inbox)
        .service(messaging::mark_read)
        .service(audit::access_logs)
        .service(audit::student_access)
        .service(analytics::dashboard)
        .service(analytics::metric_history);
}
