//! Admin verification handlers.
//!
//! ```text
//! GET /api/admin/verify
//! PUT /api/admin/verify/{id}
//! ```

use actix_web::{get, put, web};

use crate::domain::Error;
use crate::domain::user::{PublicUser, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// The verification queue: unverified students and alumni.
#[utoipa::path(
    get,
    path = "/api/admin/verify",
    responses(
        (status = 200, description = "Verification queue", body = [PublicUser]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listUnverified"
)]
#[get("/admin/verify")]
pub async fn list_unverified(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<Vec<PublicUser>>> {
    let queue = state.admin.list_unverified(identity.user()).await?;
    Ok(web::Json(queue))
}

/// Mark an account verified.
#[utoipa::path(
    put,
    path = "/api/admin/verify/{id}",
    params(("id" = UserId, Path, description = "User id")),
    responses(
        (status = 200, description = "Verified user", body = PublicUser),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "verifyUser"
)]
#[put("/admin/verify/{id}")]
pub async fn verify_user(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<UserId>,
) -> ApiResult<web::Json<PublicUser>> {
    let verified = state
        .admin
        .verify(identity.user(), path.into_inner())
        .await?;
    Ok(web::Json(verified))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::user::Role;
    use crate::inbound::http::test_utils::{TestBackend, authed, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::Value;

    #[actix_web::test]
    async fn the_queue_is_admin_only() {
        let backend = TestBackend::new();
        let (_, alumni) = backend.seed_user("Ada", Role::Alumni, true).await;
        let app = test::init_service(test_app(backend.state.clone())).await;

        let request = authed(test::TestRequest::get().uri("/api/admin/verify"), &alumni);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value["message"], "Not authorized as an Institute Admin");
    }

    #[actix_web::test]
    async fn the_queue_lists_unverified_students_and_alumni() {
        let backend = TestBackend::new();
        let (_, admin) = backend.seed_user("Root", Role::InstituteAdmin, true).await;
        backend.seed_user("Sam", Role::Student, false).await;
        backend.seed_user("Ada", Role::Alumni, false).await;
        backend.seed_user("Prof", Role::Faculty, false).await;
        backend.seed_user("Vera", Role::Alumni, true).await;
        let app = test::init_service(test_app(backend.state.clone())).await;

        let request = authed(test::TestRequest::get().uri("/api/admin/verify"), &admin);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = test::read_body_json(response).await;
        let queue = value.as_array().expect("array");
        assert_eq!(queue.len(), 2);
        assert!(queue
            .iter()
            .all(|user| matches!(user["role"].as_str(), Some("Student" | "Alumni"))));
    }

    #[actix_web::test]
    async fn verify_flips_the_flag_and_reports_missing_users() {
        let backend = TestBackend::new();
        let (_, admin) = backend.seed_user("Root", Role::InstituteAdmin, true).await;
        let (pending, _) = backend.seed_user("Sam", Role::Student, false).await;
        let app = test::init_service(test_app(backend.state.clone())).await;

        let uri = format!("/api/admin/verify/{}", pending.id);
        let request = authed(test::TestRequest::put().uri(&uri), &admin);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value["isVerified"], true);

        let uri = format!("/api/admin/verify/{}", UserId::random());
        let request = authed(test::TestRequest::put().uri(&uri), &admin);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value["message"], "User not found");
    }
}
