//! Job board handlers.
//!
//! ```text
//! POST /api/jobs {"title":"Engineer","company":"Acme","jobType":"Full-time",...}
//! GET /api/jobs
//! DELETE /api/jobs/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::domain::job::{JobDraft, JobId, JobType};
use crate::domain::services::JobView;
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/jobs`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub job_type: JobType,
    pub apply_link: String,
}

impl From<CreateJobRequest> for JobDraft {
    fn from(value: CreateJobRequest) -> Self {
        Self {
            title: value.title,
            company: value.company,
            location: value.location,
            description: value.description,
            job_type: value.job_type,
            apply_link: value.apply_link,
        }
    }
}

/// Publish a job posting. Verified alumni only.
#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job posted", body = JobView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "createJob"
)]
#[post("/jobs")]
pub async fn create_job(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<CreateJobRequest>,
) -> ApiResult<HttpResponse> {
    let view = state
        .jobs
        .create(identity.user(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(view))
}

/// All postings, newest first.
#[utoipa::path(
    get,
    path = "/api/jobs",
    responses(
        (status = 200, description = "Job board", body = [JobView]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Account pending verification", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "listJobs"
)]
#[get("/jobs")]
pub async fn list_jobs(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<Vec<JobView>>> {
    let board = state.jobs.list(identity.user()).await?;
    Ok(web::Json(board))
}

/// Remove a posting. Only the posting alumni may delete.
#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(("id" = JobId, Path, description = "Job id")),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Job not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "deleteJob"
)]
#[delete("/jobs/{id}")]
pub async fn delete_job(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<JobId>,
) -> ApiResult<HttpResponse> {
    state
        .jobs
        .delete(identity.user(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::user::Role;
    use crate::inbound::http::test_utils::{TestBackend, authed, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    fn job_body(title: &str) -> Value {
        json!({
            "title": title,
            "company": "Acme",
            "location": "Remote",
            "description": "Build things",
            "jobType": "Full-time",
            "applyLink": "https://acme.example/jobs/1"
        })
    }

    async fn create(backend: &TestBackend, token: &str, title: &str) -> (StatusCode, Value) {
        let app = test::init_service(test_app(backend.state.clone())).await;
        let request = authed(
            test::TestRequest::post()
                .uri("/api/jobs")
                .set_json(&job_body(title)),
            token,
        );
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let bytes = test::read_body(response).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[actix_web::test]
    async fn alumni_post_jobs_with_the_wire_job_type() {
        let backend = TestBackend::new();
        let (_, alumni) = backend.seed_user("Ada", Role::Alumni, true).await;

        let (status, value) = create(&backend, &alumni, "Engineer").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(value["title"], "Engineer");
        assert_eq!(value["jobType"], "Full-time");
        assert_eq!(value["postedByName"], "Ada");
    }

    #[actix_web::test]
    async fn students_cannot_post_jobs() {
        let backend = TestBackend::new();
        let (_, student) = backend.seed_user("Sam", Role::Student, true).await;
        let (status, value) = create(&backend, &student, "Engineer").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(value["message"], "Not authorized as an Alumni");
    }

    #[actix_web::test]
    async fn blank_titles_are_rejected() {
        let backend = TestBackend::new();
        let (_, alumni) = backend.seed_user("Ada", Role::Alumni, true).await;
        let (status, value) = create(&backend, &alumni, "   ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["message"], "Job title is required");
    }

    #[actix_web::test]
    async fn the_board_lists_postings_for_verified_users() {
        let backend = TestBackend::new();
        let (_, alumni) = backend.seed_user("Ada", Role::Alumni, true).await;
        let (_, student) = backend.seed_user("Sam", Role::Student, true).await;
        create(&backend, &alumni, "Engineer").await;
        let app = test::init_service(test_app(backend.state.clone())).await;

        let request = authed(test::TestRequest::get().uri("/api/jobs"), &student);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value.as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn delete_is_poster_only_with_no_admin_override() {
        let backend = TestBackend::new();
        let (_, poster) = backend.seed_user("Ada", Role::Alumni, true).await;
        let (_, other) = backend.seed_user("Eve", Role::Alumni, true).await;
        let (_, admin) = backend.seed_user("Root", Role::InstituteAdmin, true).await;
        let (_, value) = create(&backend, &poster, "Engineer").await;
        let id = value["id"].as_str().expect("job id").to_owned();
        let app = test::init_service(test_app(backend.state.clone())).await;

        let uri = format!("/api/jobs/{id}");
        let request = authed(test::TestRequest::delete().uri(&uri), &other);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value["message"], "Not authorized to delete this job");

        let request = authed(test::TestRequest::delete().uri(&uri), &admin);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let request = authed(test::TestRequest::delete().uri(&uri), &poster);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn deleting_a_missing_job_returns_not_found() {
        let backend = TestBackend::new();
        let (_, alumni) = backend.seed_user("Ada", Role::Alumni, true).await;
        let app = test::init_service(test_app(backend.state.clone())).await;

        let uri = format!("/api/jobs/{}", JobId::random());
        let request = authed(test::TestRequest::delete().uri(&uri), &alumni);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value["message"], "Job not found");
    }
}
