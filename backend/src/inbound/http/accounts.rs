//! Account handlers: registration, login, logout and profiles.
//!
//! ```text
//! POST /api/v1/accounts {"username":"ranger","email":"r@hub.id","password":"...","role":"student"}
//! POST /api/v1/login {"username":"ranger","password":"..."}
//! POST /api/v1/logout
//! GET  /api/v1/users/me
//! PUT  /api/v1/users/me/profile
//! GET  /api/v1/students/{id}/record
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::ProfileUpdate;
use crate::domain::{
    Error, LoginCredentials, LoginValidationError, Registration, RegistrationValidationError,
    User, UserId, UserProfile, UserRole, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field, parse_vocabulary};

/// Registration body for `POST /api/v1/accounts`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Any account role except `admin`.
    #[schema(example = "student")]
    pub role: String,
}

/// Login body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<&LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: &LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Profile body for `PUT /api/v1/users/me/profile`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub avatar_path: Option<String>,
    pub color_scheme: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl From<ProfileRequest> for ProfileUpdate {
    fn from(value: ProfileRequest) -> Self {
        Self {
            avatar_path: value.avatar_path,
            color_scheme: value.color_scheme,
            bio: value.bio,
            is_public: value.is_public,
        }
    }
}

/// Account as shown to its owner. The password hash never leaves the
/// domain.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[schema(example = "teacher")]
    pub role: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            username: user.username.as_ref().to_owned(),
            email: user.email.as_ref().to_owned(),
            role: user.role.as_str().to_owned(),
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

fn map_registration_error(err: RegistrationValidationError) -> Error {
    let field = match &err {
        RegistrationValidationError::Field(UserValidationError::InvalidEmail) => "email",
        RegistrationValidationError::Field(_) => "username",
        RegistrationValidationError::PasswordTooShort { .. } => "password",
        RegistrationValidationError::ReservedRole { .. } => "role",
    };
    invalid_field(FieldName::new(field), err)
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::EmptyUsername => ("username", "empty_username"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": field,
        "code": code,
    }))
}

/// Create an account. Does not log the caller in.
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username or email taken", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/accounts")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let role: UserRole = parse_vocabulary(&payload.role, FieldName::new("role"))?;
    let registration =
        Registration::try_new(&payload.username, &payload.email, &payload.password, role)
            .map_err(map_registration_error)?;
    let user = state
        .accounts
        .register(registration, session.origin())
        .await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Check credentials and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(&*payload).map_err(map_login_validation_error)?;
    let user = state.accounts.login(&credentials, session.origin()).await?;
    session.persist_user(user.id)?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["accounts"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.logout();
    HttpResponse::NoContent().finish()
}

/// Account of the logged-in user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let actor = session.require_actor()?;
    let user = state.accounts.current_user(&actor).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Replace the logged-in user's profile.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Stored profile"),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "updateProfile"
)]
#[put("/users/me/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let actor = session.require_actor()?;
    let profile = state
        .accounts
        .update_profile(&actor, payload.into_inner().into())
        .await?;
    Ok(web::Json(profile))
}

/// Submissions and assessments of one student.
#[utoipa::path(
    get,
    path = "/api/v1/students/{id}/record",
    params(("id" = i64, Path, description = "Student user id")),
    responses(
        (status = 200, description = "Student record"),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "No access to this student's data", body = ErrorSchema),
        (status = 404, description = "Student not found", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "studentRecord"
)]
#[get("/students/{id}/record")]
pub async fn student_record(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let record = state
        .accounts
        .student_record(&actor, UserId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
