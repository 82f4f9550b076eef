//! Organization handlers: creation, membership, access codes and
//! dashboards.

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{CommunityLibrary, CreateOrganizationRequest, SchoolDashboard};
use crate::domain::{
    AccessCode, Member, Organization, OrganizationId, OrganizationType, SubscriptionStatus, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, MemberSchema, MembershipSchema, OrganizationSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field, parse_vocabulary};

/// Body for `POST /api/v1/organizations`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationBody {
    /// `school` or `community`.
    #[schema(example = "school")]
    pub org_type: String,
    pub name: String,
    pub profile: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

/// Body for `POST /api/v1/organizations/{id}/members`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinOrganizationBody {
    /// Required for private organizations.
    pub access_code: Option<String>,
}

/// Body for `POST /api/v1/organizations/{id}/access-codes`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessCodeBody {
    pub student_id: i64,
}

/// Freshly issued access code.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessCodeResponse {
    pub student_id: i64,
    #[schema(example = "K7QZ2MNP")]
    pub access_code: String,
}

/// Body for `PUT /api/v1/organizations/{id}/subscription`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionBody {
    /// `pending`, `active` or `inactive`.
    #[schema(example = "active")]
    pub status: String,
}

/// Create an organization with the caller as founding member.
#[utoipa::path(
    post,
    path = "/api/v1/organizations",
    request_body = CreateOrganizationBody,
    responses(
        (status = 201, description = "Organization created", body = OrganizationSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Role may not create organizations", body = ErrorSchema)
    ),
    tags = ["organizations"],
    operation_id = "createOrganization"
)]
#[post("/organizations")]
pub async fn create_organization(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateOrganizationBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let org_type: OrganizationType = parse_vocabulary(&body.org_type, FieldName::new("orgType"))?;
    let request = CreateOrganizationRequest {
        org_type,
        name: body.name,
        profile: body.profile,
        is_public: body.is_public,
    };
    let org = state
        .organizations
        .create_organization(&actor, request)
        .await?;
    Ok(HttpResponse::Created().json(org))
}

/// Join an organization; private ones need an access code.
#[utoipa::path(
    post,
    path = "/api/v1/organizations/{id}/members",
    params(("id" = i64, Path, description = "Organization id")),
    request_body = JoinOrganizationBody,
    responses(
        (status = 201, description = "Joined", body = MembershipSchema),
        (status = 404, description = "Organization not found", body = ErrorSchema),
        (status = 409, description = "Already a member or code used", body = ErrorSchema),
        (status = 422, description = "Access code required", body = ErrorSchema)
    ),
    tags = ["organizations"],
    operation_id = "joinOrganization"
)]
#[post("/organizations/{id}/members")]
pub async fn join_organization(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<JoinOrganizationBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let access_code = payload
        .into_inner()
        .access_code
        .map(AccessCode::new)
        .transpose()
        .map_err(|err| invalid_field(FieldName::new("accessCode"), err))?;
    let membership = state
        .organizations
        .join_organization(&actor, OrganizationId::new(path.into_inner()), access_code)
        .await?;
    Ok(HttpResponse::Created().json(membership))
}

/// Members of an organization.
#[utoipa::path(
    get,
    path = "/api/v1/organizations/{id}/members",
    params(("id" = i64, Path, description = "Organization id")),
    responses(
        (status = 200, description = "Members", body = [MemberSchema]),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Organization not found", body = ErrorSchema)
    ),
    tags = ["organizations"],
    operation_id = "listMembers"
)]
#[get("/organizations/{id}/members")]
pub async fn list_members(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<Member>>> {
    let actor = session.require_actor()?;
    let members = state
        .organizations
        .list_members(&actor, OrganizationId::new(path.into_inner()))
        .await?;
    Ok(web::Json(members))
}

/// Issue an access code for a student member.
#[utoipa::path(
    post,
    path = "/api/v1/organizations/{id}/access-codes",
    params(("id" = i64, Path, description = "Organization id")),
    request_body = AccessCodeBody,
    responses(
        (status = 201, description = "Code issued", body = AccessCodeResponse),
        (status = 403, description = "Not a principal of the organization", body = ErrorSchema),
        (status = 404, description = "Student membership not found", body = ErrorSchema)
    ),
    tags = ["organizations"],
    operation_id = "generateAccessCode"
)]
#[post("/organizations/{id}/access-codes")]
pub async fn generate_access_code(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<AccessCodeBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let student = UserId::new(payload.student_id);
    let code = state
        .organizations
        .generate_access_code(&actor, OrganizationId::new(path.into_inner()), student)
        .await?;
    Ok(HttpResponse::Created().json(AccessCodeResponse {
        student_id: student.get(),
        access_code: code.as_ref().to_owned(),
    }))
}

/// Change an organization's subscription status.
#[utoipa::path(
    put,
    path = "/api/v1/organizations/{id}/subscription",
    params(("id" = i64, Path, description = "Organization id")),
    request_body = SubscriptionBody,
    responses(
        (status = 200, description = "Updated organization", body = OrganizationSchema),
        (status = 403, description = "Platform admins only", body = ErrorSchema),
        (status = 404, description = "Organization not found", body = ErrorSchema)
    ),
    tags = ["organizations"],
    operation_id = "updateSubscription"
)]
#[put("/organizations/{id}/subscription")]
pub async fn update_subscription(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<SubscriptionBody>,
) -> ApiResult<web::Json<Organization>> {
    let actor = session.require_actor()?;
    let status: SubscriptionStatus = parse_vocabulary(&payload.status, FieldName::new("status"))?;
    let org = state
        .organizations
        .update_subscription(&actor, OrganizationId::new(path.into_inner()), status)
        .await?;
    Ok(web::Json(org))
}

/// School overview for one of its principals.
#[utoipa::path(
    get,
    path = "/api/v1/organizations/{id}/dashboard",
    params(("id" = i64, Path, description = "School id")),
    responses(
        (status = 200, description = "Teachers, students, classes, library size and subscription"),
        (status = 403, description = "Not a principal of this school", body = ErrorSchema),
        (status = 422, description = "Organization is not a school", body = ErrorSchema)
    ),
    tags = ["organizations"],
    operation_id = "schoolDashboard"
)]
#[get("/organizations/{id}/dashboard")]
pub async fn school_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<SchoolDashboard>> {
    let actor = session.require_actor()?;
    let dashboard = state
        .organizations
        .school_dashboard(&actor, OrganizationId::new(path.into_inner()))
        .await?;
    Ok(web::Json(dashboard))
}

/// Public library of a public community. No login needed.
#[utoipa::path(
    get,
    path = "/api/v1/communities/{id}/library",
    params(("id" = i64, Path, description = "Community id")),
    responses(
        (status = 200, description = "Public content and members with public profiles"),
        (status = 404, description = "No such public community", body = ErrorSchema)
    ),
    tags = ["organizations"],
    operation_id = "communityLibrary",
    security([])
)]
#[get("/communities/{id}/library")]
pub async fn community_library(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<CommunityLibrary>> {
    let library = state
        .organizations
        .community_library(OrganizationId::new(path.into_inner()))
        .await?;
    Ok(web::Json(library))
}

#[cfg(test)]
#[path = "organizations_tests.rs"]
mod tests;
