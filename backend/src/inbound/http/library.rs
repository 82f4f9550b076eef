//! Library handlers: content, species sightings, teacher notes and
//! analytics.
//!
//! ```text
//! GET  /api/v1/content?type=article&limit=20
//! GET  /api/v1/sightings?species=Komodo%20dragon&verifiedOnly=true
//! POST /api/v1/sightings {"speciesName":"Komodo dragon","location":"Rinca","observedAt":"2026-05-01T07:30:00Z"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ports::{
    AddNoteRequest, RecordAnalyticsRequest, ReportSightingRequest, UploadContentRequest,
};
use crate::domain::{
    Content, ContentId, ContentType, NoteTargetType, OrganizationId, Sighting, SightingFilter,
    SightingId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ContentSchema, ErrorSchema, SightingSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_optional_vocabulary, parse_rfc3339_timestamp, parse_vocabulary,
};

const DEFAULT_LIMIT: u32 = 20;

/// Body for `POST /api/v1/content`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadContentBody {
    pub title: String,
    /// `article`, `essay`, `report`, `sighting`, `photo`, `video` or
    /// `educational_material`.
    #[schema(example = "article")]
    pub content_type: String,
    pub body: Option<String>,
    /// Publish on behalf of an organization the caller belongs to.
    pub organization_id: Option<i64>,
    #[serde(default)]
    pub is_public: bool,
}

/// Query parameters for `GET /api/v1/content`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentQuery {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    /// Defaults to 20, maximum 100.
    pub limit: Option<u32>,
}

/// Body for `POST /api/v1/sightings`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSightingBody {
    #[schema(example = "Komodo dragon")]
    pub species_name: String,
    pub location: String,
    /// RFC 3339 observation time; must not be in the future.
    #[schema(example = "2026-05-01T07:30:00Z")]
    pub observed_at: String,
    pub description: Option<String>,
    pub photo_path: Option<String>,
}

/// Query parameters for `GET /api/v1/sightings`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SightingQuery {
    /// Exact species name.
    pub species: Option<String>,
    /// Case-insensitive location fragment.
    pub location: Option<String>,
    #[serde(default)]
    pub verified_only: bool,
    pub limit: Option<u32>,
}

/// Body for `POST /api/v1/notes`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddNoteBody {
    /// `submission`, `content` or `sighting`.
    #[schema(example = "submission")]
    pub target_type: String,
    pub target_id: i64,
    pub text: String,
}

/// Body for `POST /api/v1/analytics`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsBody {
    #[schema(example = "weekly_active_users")]
    pub metric_type: String,
    pub metric_value: Option<f64>,
    #[schema(value_type = Option<Object>)]
    pub metric_data: Option<Value>,
}

/// Upload a library item.
#[utoipa::path(
    post,
    path = "/api/v1/content",
    request_body = UploadContentBody,
    responses(
        (status = 201, description = "Content stored", body = ContentSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not a member of the organization", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "uploadContent"
)]
#[post("/content")]
pub async fn upload_content(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UploadContentBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let content_type: ContentType =
        parse_vocabulary(&body.content_type, FieldName::new("contentType"))?;
    let request = UploadContentRequest {
        title: body.title,
        content_type,
        body: body.body,
        organization_id: body.organization_id.map(OrganizationId::new),
        is_public: body.is_public,
    };
    let content = state.library.upload_content(&actor, request).await?;
    Ok(HttpResponse::Created().json(content))
}

/// Public library items, newest first. No login needed.
#[utoipa::path(
    get,
    path = "/api/v1/content",
    params(
        ("type" = Option<String>, Query, description = "Restrict to one content type"),
        ("limit" = Option<u32>, Query, description = "Number of items, default 20, max 100")
    ),
    responses(
        (status = 200, description = "Public content", body = [ContentSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "publicContent",
    security([])
)]
#[get("/content")]
pub async fn public_content(
    state: web::Data<HttpState>,
    query: web::Query<ContentQuery>,
) -> ApiResult<web::Json<Vec<Content>>> {
    let query = query.into_inner();
    let content_type: Option<ContentType> =
        parse_optional_vocabulary(query.content_type.as_deref(), FieldName::new("type"))?;
    let items = state
        .library
        .public_content(content_type, query.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(web::Json(items))
}

/// One library item. Private items are reported as missing to anyone who
/// may not see them.
#[utoipa::path(
    get,
    path = "/api/v1/content/{id}",
    params(("id" = i64, Path, description = "Content id")),
    responses(
        (status = 200, description = "Content", body = ContentSchema),
        (status = 404, description = "Not found or not visible", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "viewContent"
)]
#[get("/content/{id}")]
pub async fn view_content(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Content>> {
    let actor = session.actor()?;
    let content = state
        .library
        .view_content(actor, ContentId::new(path.into_inner()))
        .await?;
    Ok(web::Json(content))
}

/// Report a species sighting.
#[utoipa::path(
    post,
    path = "/api/v1/sightings",
    request_body = ReportSightingBody,
    responses(
        (status = 201, description = "Sighting recorded", body = SightingSchema),
        (status = 400, description = "Invalid request or future observation", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "reportSighting"
)]
#[post("/sightings")]
pub async fn report_sighting(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ReportSightingBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let observed_at = parse_rfc3339_timestamp(&body.observed_at, FieldName::new("observedAt"))?;
    let request = ReportSightingRequest {
        species_name: body.species_name,
        location: body.location,
        observed_at,
        description: body.description,
        photo_path: body.photo_path,
    };
    let sighting = state.library.report_sighting(&actor, request).await?;
    Ok(HttpResponse::Created().json(sighting))
}

/// Browse sightings, newest observation first. No login needed.
#[utoipa::path(
    get,
    path = "/api/v1/sightings",
    params(
        ("species" = Option<String>, Query, description = "Exact species name"),
        ("location" = Option<String>, Query, description = "Case-insensitive location fragment"),
        ("verifiedOnly" = Option<bool>, Query, description = "Only verified sightings"),
        ("limit" = Option<u32>, Query, description = "Number of sightings, default 20, max 100")
    ),
    responses((status = 200, description = "Sightings", body = [SightingSchema])),
    tags = ["library"],
    operation_id = "browseSightings",
    security([])
)]
#[get("/sightings")]
pub async fn browse_sightings(
    state: web::Data<HttpState>,
    query: web::Query<SightingQuery>,
) -> ApiResult<web::Json<Vec<Sighting>>> {
    let query = query.into_inner();
    let filter = SightingFilter {
        species_name: query.species,
        location: query.location,
        verified_only: query.verified_only,
    };
    let sightings = state
        .library
        .browse_sightings(filter, query.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(web::Json(sightings))
}

/// Mark a sighting verified.
#[utoipa::path(
    post,
    path = "/api/v1/sightings/{id}/verification",
    params(("id" = i64, Path, description = "Sighting id")),
    responses(
        (status = 200, description = "Verified sighting", body = SightingSchema),
        (status = 403, description = "Role may not verify sightings", body = ErrorSchema),
        (status = 404, description = "Sighting not found", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "verifySighting"
)]
#[post("/sightings/{id}/verification")]
pub async fn verify_sighting(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Sighting>> {
    let actor = session.require_actor()?;
    let sighting = state
        .library
        .verify_sighting(&actor, SightingId::new(path.into_inner()))
        .await?;
    Ok(web::Json(sighting))
}

/// Attach a teacher note.
#[utoipa::path(
    post,
    path = "/api/v1/notes",
    request_body = AddNoteBody,
    responses(
        (status = 201, description = "Note stored"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Teachers only", body = ErrorSchema),
        (status = 404, description = "Target not found", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "addNote"
)]
#[post("/notes")]
pub async fn add_note(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AddNoteBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let target_type: NoteTargetType =
        parse_vocabulary(&body.target_type, FieldName::new("targetType"))?;
    let request = AddNoteRequest {
        target_type,
        target_id: body.target_id,
        text: body.text,
    };
    let note = state.library.add_note(&actor, request).await?;
    Ok(HttpResponse::Created().json(note))
}

/// Record an analytics sample.
#[utoipa::path(
    post,
    path = "/api/v1/analytics",
    request_body = AnalyticsBody,
    responses(
        (status = 201, description = "Sample stored"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Platform admins only", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "recordAnalytics"
)]
#[post("/analytics")]
pub async fn record_analytics(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AnalyticsBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let request = RecordAnalyticsRequest {
        metric_type: body.metric_type,
        metric_value: body.metric_value,
        metric_data: body.metric_data,
    };
    let record = state.library.record_analytics(&actor, request).await?;
    Ok(HttpResponse::Created().json(record))
}

#[cfg(test)]
#[path = "library_tests.rs"]
mod tests;
