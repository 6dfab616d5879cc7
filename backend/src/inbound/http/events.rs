//! Event handlers: admin-managed records plus attendance.
//!
//! ```text
//! POST /api/events {"title":"Homecoming","date":"2026-09-01T18:00:00Z",...}
//! GET /api/events
//! PUT /api/events/{id}
//! DELETE /api/events/{id}
//! PUT /api/events/{id}/register
//! PUT /api/events/{id}/unregister
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::domain::event::{EventDraft, EventId, EventPatch, Visibility};
use crate::domain::services::EventView;
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/events`.
///
/// `visibility` defaults to `Alumni_Only` when omitted.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub image: Option<String>,
    pub visibility: Option<Visibility>,
}

impl From<CreateEventRequest> for EventDraft {
    fn from(value: CreateEventRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            date: value.date,
            location: value.location,
            image: value.image,
            visibility: value.visibility,
        }
    }
}

/// Partial update body for `PUT /api/events/{id}`.
#[derive(Deserialize, Serialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub visibility: Option<Visibility>,
}

impl From<UpdateEventRequest> for EventPatch {
    fn from(value: UpdateEventRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            date: value.date,
            location: value.location,
            image: value.image,
            visibility: value.visibility,
        }
    }
}

/// Create an event. Institute Admin only.
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["events"],
    operation_id = "createEvent"
)]
#[post("/events")]
pub async fn create_event(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<CreateEventRequest>,
) -> ApiResult<HttpResponse> {
    let view = state
        .events
        .create(identity.user(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(view))
}

/// Events visible to the actor, date ascending.
#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "Visible events", body = [EventView]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Account pending verification", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["events"],
    operation_id = "listEvents"
)]
#[get("/events")]
pub async fn list_events(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<Vec<EventView>>> {
    let events = state.events.list(identity.user()).await?;
    Ok(web::Json(events))
}

/// Partially update an event. Only the creating admin may update.
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(("id" = EventId, Path, description = "Event id")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Updated event", body = EventView),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Account pending verification", body = Error),
        (status = 404, description = "Event not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["events"],
    operation_id = "updateEvent"
)]
#[put("/events/{id}")]
pub async fn update_event(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<EventId>,
    payload: web::Json<UpdateEventRequest>,
) -> ApiResult<web::Json<EventView>> {
    let view = state
        .events
        .update(identity.user(), path.into_inner(), payload.into_inner().into())
        .await?;
    Ok(web::Json(view))
}

/// Delete an event. Only the creating admin may delete.
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = EventId, Path, description = "Event id")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Account pending verification", body = Error),
        (status = 404, description = "Event not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["events"],
    operation_id = "deleteEvent"
)]
#[delete("/events/{id}")]
pub async fn delete_event(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<EventId>,
) -> ApiResult<HttpResponse> {
    state
        .events
        .delete(identity.user(), path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register the actor for an event.
#[utoipa::path(
    put,
    path = "/api/events/{id}/register",
    params(("id" = EventId, Path, description = "Event id")),
    responses(
        (status = 200, description = "Updated event", body = EventView),
        (status = 400, description = "Already registered", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Account pending verification", body = Error),
        (status = 404, description = "Event not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["events"],
    operation_id = "registerForEvent"
)]
#[put("/events/{id}/register")]
pub async fn register_for_event(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<EventId>,
) -> ApiResult<web::Json<EventView>> {
    let view = state
        .events
        .register(identity.user(), path.into_inner())
        .await?;
    Ok(web::Json(view))
}

/// Withdraw the actor's registration.
#[utoipa::path(
    put,
    path = "/api/events/{id}/unregister",
    params(("id" = EventId, Path, description = "Event id")),
    responses(
        (status = 200, description = "Updated event", body = EventView),
        (status = 400, description = "Not registered", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Account pending verification", body = Error),
        (status = 404, description = "Event not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["events"],
    operation_id = "unregisterFromEvent"
)]
#[put("/events/{id}/unregister")]
pub async fn unregister_from_event(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<EventId>,
) -> ApiResult<web::Json<EventView>> {
    let view = state
        .events
        .unregister(identity.user(), path.into_inner())
        .await?;
    Ok(web::Json(view))
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

    fn event_body(title: &str, visibility: Option<&str>) -> Value {
        let mut body = json!({
            "title": title,
            "description": "Annual reunion",
            "date": "2026-09-01T18:00:00Z",
            "location": "Main hall"
        });
        if let Some(visibility) = visibility {
            body["visibility"] = json!(visibility);
        }
        body
    }

    async fn create(
        backend: &TestBackend,
        token: &str,
        title: &str,
        visibility: Option<&str>,
    ) -> (StatusCode, Value) {
        let app = test::init_service(test_app(backend.state.clone())).await;
        let request = authed(
            test::TestRequest::post()
                .uri("/api/events")
                .set_json(&event_body(title, visibility)),
            token,
        );
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let bytes = test::read_body(response).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[actix_web::test]
    async fn creation_is_admin_only_and_defaults_to_alumni_only() {
        let backend = TestBackend::new();
        let (_, admin) = backend.seed_user("Root", Role::InstituteAdmin, true).await;
        let (_, alumni) = backend.seed_user("Ada", Role::Alumni, true).await;

        let (status, value) = create(&backend, &alumni, "Homecoming", None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(value["message"], "Not authorized as an Institute Admin");

        let (status, value) = create(&backend, &admin, "Homecoming", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(value["visibility"], "Alumni_Only");
        assert_eq!(value["createdByName"], "Root");
        assert_eq!(value["attendees"], json!([]));
    }

    #[actix_web::test]
    async fn students_only_see_events_open_to_all() {
        let backend = TestBackend::new();
        let (_, admin) = backend.seed_user("Root", Role::InstituteAdmin, true).await;
        let (_, student) = backend.seed_user("Sam", Role::Student, true).await;
        create(&backend, &admin, "Reunion", Some("Alumni_Only")).await;
        create(&backend, &admin, "Open day", Some("All")).await;
        let app = test::init_service(test_app(backend.state.clone())).await;

        let request = authed(test::TestRequest::get().uri("/api/events"), &student);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = test::read_body_json(response).await;
        let titles: Vec<&str> = value
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|event| event["title"].as_str())
            .collect();
        assert_eq!(titles, vec!["Open day"]);
    }

    #[actix_web::test]
    async fn update_and_delete_are_creator_only() {
        let backend = TestBackend::new();
        let (_, creator) = backend.seed_user("Root", Role::InstituteAdmin, true).await;
        let (_, other) = backend.seed_user("Boss", Role::InstituteAdmin, true).await;
        let (_, value) = create(&backend, &creator, "Homecoming", None).await;
        let id = value["id"].as_str().expect("event id").to_owned();
        let app = test::init_service(test_app(backend.state.clone())).await;

        let uri = format!("/api/events/{id}");
        let request = authed(
            test::TestRequest::put()
                .uri(&uri)
                .set_json(&json!({ "location": "Auditorium" })),
            &other,
        );
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = authed(
            test::TestRequest::put()
                .uri(&uri)
                .set_json(&json!({ "location": "Auditorium" })),
            &creator,
        );
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value["location"], "Auditorium");
        assert_eq!(value["title"], "Homecoming");

        let request = authed(test::TestRequest::delete().uri(&uri), &other);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = authed(test::TestRequest::delete().uri(&uri), &creator);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn attendance_round_trips_with_precondition_errors() {
        let backend = TestBackend::new();
        let (_, admin) = backend.seed_user("Root", Role::InstituteAdmin, true).await;
        let (ada, alumni) = backend.seed_user("Ada", Role::Alumni, true).await;
        let (_, value) = create(&backend, &admin, "Homecoming", None).await;
        let id = value["id"].as_str().expect("event id").to_owned();
        let app = test::init_service(test_app(backend.state.clone())).await;

        let unregister = format!("/api/events/{id}/unregister");
        let request = authed(test::TestRequest::put().uri(&unregister), &alumni);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value["message"], "You are not registered for this event");

        let register = format!("/api/events/{id}/register");
        let request = authed(test::TestRequest::put().uri(&register), &alumni);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value["attendees"], json!([ada.id.to_string()]));

        let request = authed(test::TestRequest::put().uri(&register), &alumni);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value["message"], "Already registered for this event");

        let request = authed(test::TestRequest::put().uri(&unregister), &alumni);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value["attendees"], json!([]));
    }

    #[actix_web::test]
    async fn missing_events_return_not_found() {
        let backend = TestBackend::new();
        let (_, alumni) = backend.seed_user("Ada", Role::Alumni, true).await;
        let app = test::init_service(test_app(backend.state.clone())).await;

        let uri = format!("/api/events/{}/register", EventId::random());
        let request = authed(test::TestRequest::put().uri(&uri), &alumni);
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value["message"], "Event not found");
    }
}
