//! Mentorship handlers: student requests and alumni responses.
//!
//! ```text
//! POST /api/mentorship/request {"alumniId":"...","message":"..."}
//! GET /api/mentorship/requests
//! PUT /api/mentorship/respond/{id} {"status":"Accepted"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::domain::mentorship::{MentorshipStatus, RequestId};
use crate::domain::services::MentorshipView;
use crate::domain::user::UserId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/mentorship/request`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendRequestBody {
    pub alumni_id: UserId,
    pub message: String,
}

/// Body for `PUT /api/mentorship/respond/{id}`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RespondBody {
    pub status: MentorshipStatus,
}

/// Send a pending mentorship request to an alumni.
#[utoipa::path(
    post,
    path = "/api/mentorship/request",
    request_body = SendRequestBody,
    responses(
        (status = 201, description = "Request sent", body = MentorshipView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Account pending verification", body = Error),
        (status = 404, description = "Alumni not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["mentorship"],
    operation_id = "sendMentorshipRequest"
)]
#[post("/mentorship/request")]
pub async fn send_request(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<SendRequestBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let view = state
        .mentorship
        .send_request(identity.user(), payload.alumni_id, &payload.message)
        .await?;
    Ok(HttpResponse::Created().json(view))
}

/// The actor's side of the mentorship ledger: alumni see their inbox,
/// students their sent requests.
#[utoipa::path(
    get,
    path = "/api/mentorship/requests",
    responses(
        (status = 200, description = "Requests", body = [MentorshipView]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["mentorship"],
    operation_id = "listMentorshipRequests"
)]
#[get("/mentorship/requests")]
pub async fn list_requests(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<Vec<MentorshipView>>> {
    let requests = state.mentorship.list_requests(identity.user()).await?;
    Ok(web::Json(requests))
}

/// Accept or reject a pending request addressed to the actor.
#[utoipa::path(
    put,
    path = "/api/mentorship/respond/{id}",
    params(("id" = RequestId, Path, description = "Request id")),
    request_body = RespondBody,
    responses(
        (status = 200, description = "Resolved request", body = MentorshipView),
        (status = 400, description = "Invalid status", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Account pending verification", body = Error),
        (status = 404, description = "Request not found", body = Error),
        (status = 409, description = "Request already resolved", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["mentorship"],
    operation_id = "respondToMentorshipRequest"
)]
#[put("/mentorship/respond/{id}")]
pub async fn respond(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<RequestId>,
    payload: web::Json<RespondBody>,
) -> ApiResult<web::Json<MentorshipView>> {
    let view = state
        .mentorship
        .respond(identity.user(), path.into_inner(), payload.status)
        .await?;
    Ok(web::Json(view))
}
