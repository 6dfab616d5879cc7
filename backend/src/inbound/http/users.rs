//! Profile and directory handlers.
//!
//! ```text
//! GET /api/users/profile
//! PUT /api/users/profile {"bio":"...","company":"..."}
//! GET /api/users/alumni
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::domain::services::ProfileUpdate;
use crate::domain::user::PublicUser;
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// Partial profile update body for `PUT /api/users/profile`.
///
/// Omitted fields are preserved. Fields tied to a role the actor does not
/// hold are ignored rather than rejected.
#[derive(Deserialize, Serialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub profile_picture: Option<String>,
    pub graduation_year: Option<i32>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub major: Option<String>,
    pub expected_graduation_year: Option<i32>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(value: UpdateProfileRequest) -> Self {
        Self {
            name: value.name,
            headline: value.headline,
            bio: value.bio,
            location: value.location,
            profile_picture: value.profile_picture,
            graduation_year: value.graduation_year,
            company: value.company,
            job_title: value.job_title,
            major: value.major,
            expected_graduation_year: value.expected_graduation_year,
        }
    }
}

/// The authenticated actor's own record.
#[utoipa::path(
    get,
    path = "/api/users/profile",
    responses(
        (status = 200, description = "Current profile", body = PublicUser),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getProfile"
)]
#[get("/users/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<PublicUser>> {
    let profile = state.users.profile(identity.user()).await?;
    Ok(web::Json(profile))
}

/// Partially update the authenticated actor's own record.
#[utoipa::path(
    put,
    path = "/api/users/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = PublicUser),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[put("/users/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<PublicUser>> {
    let updated = state
        .users
        .update_profile(identity.user(), payload.into_inner().into())
        .await?;
    Ok(web::Json(updated))
}

/// The directory of verified alumni.
#[utoipa::path(
    get,
    path = "/api/users/alumni",
    responses(
        (status = 200, description = "Verified alumni", body = [PublicUser]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Account pending verification", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "alumniDirectory"
)]
#[get("/users/alumni")]
pub async fn alumni_directory(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<Vec<PublicUser>>> {
    let directory = state.users.alumni_directory(identity.user()).await?;
    Ok(web::Json(directory))
}
