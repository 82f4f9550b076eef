//! Access log reads for platform admins, including who touched a
//! student's data.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};

use crate::domain::{AccessLogEntry, StudentAccessRecord, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    AccessLogEntrySchema, ErrorSchema, StudentAccessRecordSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const DEFAULT_LIMIT: u32 = 50;

/// Query parameters for `GET /api/v1/access-logs`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogQuery {
    /// Defaults to 50, maximum 100.
    pub limit: Option<u32>,
}

/// Most recent access log entries, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/access-logs",
    params(("limit" = Option<u32>, Query, description = "Number of entries, default 50, max 100")),
    responses(
        (status = 200, description = "Access log entries", body = [AccessLogEntrySchema]),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Platform admins only", body = ErrorSchema)
    ),
    tags = ["audit"],
    operation_id = "accessLogs"
)]
#[get("/access-logs")]
pub async fn access_logs(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<AccessLogQuery>,
) -> ApiResult<web::Json<Vec<AccessLogEntry>>> {
    let actor = session.require_actor()?;
    let entries = state
        .audit
        .recent_entries(&actor, query.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(web::Json(entries))
}

/// Who accessed one student's data, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/students/{id}/access-log",
    params(
        ("id" = i64, Path, description = "Student user id"),
        ("limit" = Option<u32>, Query, description = "Number of entries, default 50, max 100")
    ),
    responses(
        (status = 200, description = "Accesses with the accessor", body = [StudentAccessRecordSchema]),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Platform admins only", body = ErrorSchema),
        (status = 404, description = "Student not found", body = ErrorSchema)
    ),
    tags = ["audit"],
    operation_id = "studentAccessLog"
)]
#[get("/students/{id}/access-log")]
pub async fn student_access(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    query: web::Query<AccessLogQuery>,
) -> ApiResult<web::Json<Vec<StudentAccessRecord>>> {
    let actor = session.require_actor()?;
    let records = state
        .audit
        .student_access(
            &actor,
            UserId::new(path.into_inner()),
            query.limit.unwrap_or(DEFAULT_LIMIT),
        )
        .await?;
    Ok(web::Json(records))
}
