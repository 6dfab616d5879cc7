//! Registration and login handlers.
//!
//! ```text
//! POST /api/auth/register {"name":"Ada","email":"ada@example.edu","password":"secret","role":"Alumni"}
//! POST /api/auth/login {"email":"ada@example.edu","password":"secret"}
//! ```
//!
//! Both endpoints are public and answer with an [`AuthSession`]: the public
//! user record plus the bearer token for subsequent requests.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::Error;
use crate::domain::auth::{CredentialValidationError, Credentials};
use crate::domain::services::{AuthSession, Registration};
use crate::domain::user::{Profile, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Registration body for `POST /api/auth/register`.
///
/// `role` defaults to `Student` when omitted.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
    #[serde(default)]
    pub profile: Profile,
}

/// Login body for `POST /api/auth/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn map_credential_error(err: CredentialValidationError) -> Error {
    let (field, code) = match err {
        CredentialValidationError::EmptyEmail => ("email", "empty_email"),
        CredentialValidationError::InvalidEmail => ("email", "invalid_email"),
        CredentialValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Create an account and issue its first bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthSession),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let credentials = Credentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_credential_error)?;
    let session = state
        .auth
        .register(Registration {
            name: payload.name,
            credentials,
            role: payload.role.unwrap_or(Role::Student),
            profile: payload.profile,
        })
        .await?;
    Ok(HttpResponse::Created().json(session))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthSession),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthSession>> {
    let payload = payload.into_inner();
    let credentials = Credentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_credential_error)?;
    let session = state.auth.login(credentials).await?;
    Ok(web::Json(session))
}
