//! Program handlers: creation, enrollment and creative canvases.

use actix_web::{HttpResponse, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ports::CreateProgramRequest;
use crate::domain::{Canvas, OrganizationId, ProgramEnrollee, ProgramId, ProgramType};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_vocabulary};

/// Body for `POST /api/v1/programs`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgramBody {
    pub name: String,
    pub description: Option<String>,
    /// `internal`, `local`, `regional` or `national`.
    #[schema(example = "regional")]
    pub program_type: String,
}

/// Body for `POST /api/v1/programs/{id}/enrollments`.
///
/// Without an organization the caller enrolls themselves.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollProgramBody {
    pub organization_id: Option<i64>,
}

/// Body for `PUT /api/v1/programs/{id}/canvas`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanvasBody {
    /// Free-form drawing assets.
    #[schema(value_type = Object)]
    pub assets: Value,
}

/// Create a program.
#[utoipa::path(
    post,
    path = "/api/v1/programs",
    request_body = CreateProgramBody,
    responses(
        (status = 201, description = "Program created"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Role may not create programs", body = ErrorSchema)
    ),
    tags = ["programs"],
    operation_id = "createProgram"
)]
#[post("/programs")]
pub async fn create_program(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateProgramBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let program_type: ProgramType =
        parse_vocabulary(&body.program_type, FieldName::new("programType"))?;
    let request = CreateProgramRequest {
        name: body.name,
        description: body.description,
        program_type,
    };
    let program = state.programs.create_program(&actor, request).await?;
    Ok(HttpResponse::Created().json(program))
}

/// Enroll the caller, or an organization they manage, in a program.
#[utoipa::path(
    post,
    path = "/api/v1/programs/{id}/enrollments",
    params(("id" = i64, Path, description = "Program id")),
    request_body = EnrollProgramBody,
    responses(
        (status = 201, description = "Enrollment recorded"),
        (status = 403, description = "Caller does not manage the organization", body = ErrorSchema),
        (status = 404, description = "Program not found", body = ErrorSchema),
        (status = 409, description = "Already actively enrolled", body = ErrorSchema)
    ),
    tags = ["programs"],
    operation_id = "enrollInProgram"
)]
#[post("/programs/{id}/enrollments")]
pub async fn enroll_in_program(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<EnrollProgramBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let enrollee = match payload.organization_id {
        Some(org) => ProgramEnrollee::Organization(OrganizationId::new(org)),
        None => ProgramEnrollee::User(actor.user_id()),
    };
    let enrollment = state
        .programs
        .enroll_in_program(&actor, ProgramId::new(path.into_inner()), enrollee)
        .await?;
    Ok(HttpResponse::Created().json(enrollment))
}

/// Save the caller's canvas for a program, replacing the previous one.
#[utoipa::path(
    put,
    path = "/api/v1/programs/{id}/canvas",
    params(("id" = i64, Path, description = "Program id")),
    request_body = CanvasBody,
    responses(
        (status = 200, description = "Stored canvas"),
        (status = 404, description = "Program not found", body = ErrorSchema)
    ),
    tags = ["programs"],
    operation_id = "saveCanvas"
)]
#[put("/programs/{id}/canvas")]
pub async fn save_canvas(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<CanvasBody>,
) -> ApiResult<web::Json<Canvas>> {
    let actor = session.require_actor()?;
    let canvas = state
        .programs
        .save_canvas(&actor, ProgramId::new(path.into_inner()), payload.into_inner().assets)
        .await?;
    Ok(web::Json(canvas))
}

#[cfg(test)]
#[path = "programs_tests.rs"]
mod tests;
