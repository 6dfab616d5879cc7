//! End-to-end flows for mentorship requests and the verification queue.

// Shared harness has extra helpers used by other integration suites.
#[allow(dead_code)]
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use backend::domain::user::Role;
use serde_json::json;
use support::{Backend, PASSWORD, app, authed, send};

#[actix_web::test]
async fn a_request_travels_from_pending_to_accepted() {
    let backend = Backend::new();
    let (_, student) = backend.seed_user("Sam", Role::Student, true).await;
    let (ada, alumni) = backend.seed_user("Ada", Role::Alumni, true).await;
    let (_, other_alumni) = backend.seed_user("Eve", Role::Alumni, true).await;
    let app = test::init_service(app(backend.state.clone())).await;

    let (status, request) = send(
        &app,
        authed(
            test::TestRequest::post().uri("/api/mentorship/request"),
            &student,
        )
        .set_json(json!({ "alumniId": ada.id, "message": "Please mentor me" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request["status"], "Pending");
    assert_eq!(request["studentName"], "Sam");
    assert_eq!(request["alumniName"], "Ada");
    let respond_uri = format!(
        "/api/mentorship/respond/{}",
        request["id"].as_str().expect("request id")
    );

    let (status, inbox) = send(
        &app,
        authed(
            test::TestRequest::get().uri("/api/mentorship/requests"),
            &alumni,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inbox.as_array().expect("inbox").len(), 1);

    let (status, sent) = send(
        &app,
        authed(
            test::TestRequest::get().uri("/api/mentorship/requests"),
            &student,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sent.as_array().expect("sent").len(), 1);

    // A request addressed to somebody else reads as missing.
    let (status, error) = send(
        &app,
        authed(test::TestRequest::put().uri(&respond_uri), &other_alumni)
            .set_json(json!({ "status": "Accepted" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["message"], "Request not found or not authorized");

    let (status, resolved) = send(
        &app,
        authed(test::TestRequest::put().uri(&respond_uri), &alumni)
            .set_json(json!({ "status": "Accepted" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["status"], "Accepted");

    let (status, error) = send(
        &app,
        authed(test::TestRequest::put().uri(&respond_uri), &alumni)
            .set_json(json!({ "status": "Rejected" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["message"], "Request already resolved");
}

#[actix_web::test]
async fn request_targets_must_hold_the_alumni_role() {
    let backend = Backend::new();
    let (_, student) = backend.seed_user("Sam", Role::Student, true).await;
    let (kim, _) = backend.seed_user("Kim", Role::Student, true).await;
    let app = test::init_service(app(backend.state.clone())).await;

    let (status, error) = send(
        &app,
        authed(
            test::TestRequest::post().uri("/api/mentorship/request"),
            &student,
        )
        .set_json(json!({ "alumniId": kim.id, "message": "Please mentor me" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["message"], "Alumni not found");
}

#[actix_web::test]
async fn faculty_have_no_side_of_the_ledger() {
    let backend = Backend::new();
    let (_, faculty) = backend.seed_user("Prof", Role::Faculty, true).await;
    let app = test::init_service(app(backend.state.clone())).await;

    let (status, error) = send(
        &app,
        authed(
            test::TestRequest::get().uri("/api/mentorship/requests"),
            &faculty,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["message"], "Not authorized");
}

#[actix_web::test]
async fn verification_unlocks_the_dashboard() {
    let backend = Backend::new();
    let (_, admin) = backend.seed_user("Root", Role::InstituteAdmin, true).await;
    let app = test::init_service(app(backend.state.clone())).await;

    // Fresh registrations join the queue unverified.
    let (status, session) = send(
        &app,
        test::TestRequest::post().uri("/api/auth/register").set_json(json!({
            "name": "Sam",
            "email": "sam@example.edu",
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let student_id = session["user"]["id"].as_str().expect("user id").to_owned();
    let student_token = session["token"].as_str().expect("token").to_owned();

    let (status, error) = send(
        &app,
        authed(test::TestRequest::get().uri("/api/posts"), &student_token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["message"], "Account pending verification");

    let (status, queue) = send(
        &app,
        authed(test::TestRequest::get().uri("/api/admin/verify"), &admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(queue.as_array().expect("queue").len(), 1);
    assert_eq!(queue[0]["name"], "Sam");

    let (status, verified) = send(
        &app,
        authed(
            test::TestRequest::put().uri(&format!("/api/admin/verify/{student_id}")),
            &admin,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["isVerified"], true);

    let (status, queue) = send(
        &app,
        authed(test::TestRequest::get().uri("/api/admin/verify"), &admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(queue.as_array().expect("queue").len(), 0);

    let (status, _) = send(
        &app,
        authed(test::TestRequest::get().uri("/api/posts"), &student_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn the_queue_is_admin_only_and_misses_are_not_found() {
    let backend = Backend::new();
    let (_, admin) = backend.seed_user("Root", Role::InstituteAdmin, true).await;
    let (sam, student) = backend.seed_user("Sam", Role::Student, true).await;
    let app = test::init_service(app(backend.state.clone())).await;

    let (status, error) = send(
        &app,
        authed(test::TestRequest::get().uri("/api/admin/verify"), &student),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["message"], "Not authorized as an Institute Admin");

    let (status, error) = send(
        &app,
        authed(
            test::TestRequest::put().uri(&format!("/api/admin/verify/{}", sam.id)),
            &student,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["message"], "Not authorized as an Institute Admin");

    let missing = uuid::Uuid::new_v4();
    let (status, error) = send(
        &app,
        authed(
            test::TestRequest::put().uri(&format!("/api/admin/verify/{missing}")),
            &admin,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["message"], "User not found");
}
