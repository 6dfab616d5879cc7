//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (auth, users,
//!   posts, jobs, events, mentorship, admin, health)
//! - **Schemas**: Domain types and service views that appear on the wire
//! - **Security**: The bearer token authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds only).

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Bearer token issued by POST /api/auth/register or POST /api/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Alumni network backend API",
        description = "HTTP interface for the alumni network: accounts, posts, jobs, \
                       events, mentorship, and administration.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::users::get_profile,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::alumni_directory,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::list_posts_by_user,
        crate::inbound::http::posts::toggle_like,
        crate::inbound::http::posts::add_comment,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::jobs::create_job,
        crate::inbound::http::jobs::list_jobs,
        crate::inbound::http::jobs::delete_job,
        crate::inbound::http::events::create_event,
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::update_event,
        crate::inbound::http::events::delete_event,
        crate::inbound::http::events::register_for_event,
        crate::inbound::http::events::unregister_from_event,
        crate::inbound::http::mentorship::send_request,
        crate::inbound::http::mentorship::list_requests,
        crate::inbound::http::mentorship::respond,
        crate::inbound::http::admin::list_unverified,
        crate::inbound::http::admin::verify_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::domain::Role,
        crate::domain::Profile,
        crate::domain::PublicUser,
        crate::domain::post::Comment,
        crate::domain::job::JobType,
        crate::domain::event::Visibility,
        crate::domain::mentorship::MentorshipStatus,
        crate::domain::services::AuthSession,
        crate::domain::services::PostView,
        crate::domain::services::JobView,
        crate::domain::services::EventView,
        crate::domain::services::MentorshipView,
    )),
    tags(
        (name = "auth", description = "Account registration and login"),
        (name = "users", description = "Profiles and the alumni directory"),
        (name = "posts", description = "Community feed posts, likes, and comments"),
        (name = "jobs", description = "Job board postings"),
        (name = "events", description = "Events and attendance"),
        (name = "mentorship", description = "Mentorship requests between students and alumni"),
        (name = "admin", description = "Account verification administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
