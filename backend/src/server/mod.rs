//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::warn;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{
    InMemoryEventRepository, InMemoryJobRepository, InMemoryMentorshipRepository,
    InMemoryPostRepository, InMemoryUserRepository,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::{admin, auth, events, jobs, mentorship, posts, users};
use crate::middleware::trace::Trace;
use crate::outbound::identity::{Argon2PasswordHasher, JwtTokenService};
use crate::outbound::persistence::{
    MongoEventRepository, MongoJobRepository, MongoMentorshipRepository, MongoPostRepository,
    MongoUserRepository,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

/// Assemble the HTTP service graph from the configured ports.
///
/// Uses MongoDB-backed repositories when a database handle is configured,
/// otherwise in-memory stores. The in-memory fallback keeps local
/// development and smoke tests working without a running database, so it is
/// logged loudly rather than hidden.
fn build_http_state(config: &ServerConfig) -> HttpState {
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let tokens = Arc::new(JwtTokenService::new(
        &config.token_secret,
        config.token_ttl_secs,
    ));

    let ports = match &config.database {
        Some(database) => HttpStatePorts {
            users: Arc::new(MongoUserRepository::new(database)),
            posts: Arc::new(MongoPostRepository::new(database)),
            jobs: Arc::new(MongoJobRepository::new(database)),
            events: Arc::new(MongoEventRepository::new(database)),
            mentorship: Arc::new(MongoMentorshipRepository::new(database)),
            hasher,
            tokens,
        },
        None => {
            warn!("no database configured; using in-memory stores (dev only)");
            HttpStatePorts {
                users: Arc::new(InMemoryUserRepository::new()),
                posts: Arc::new(InMemoryPostRepository::new()),
                jobs: Arc::new(InMemoryJobRepository::new()),
                events: Arc::new(InMemoryEventRepository::new()),
                mentorship: Arc::new(InMemoryMentorshipRepository::new()),
                hasher,
                tokens,
            }
        }
    };

    HttpState::new(ports)
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api")
        .service(auth::register)
        .service(auth::login)
        .service(users::get_profile)
        .service(users::update_profile)
        .service(users::alumni_directory)
        .service(posts::create_post)
        .service(posts::list_posts)
        .service(posts::list_posts_by_user)
        .service(posts::toggle_like)
        .service(posts::add_comment)
        .service(posts::delete_post)
        .service(jobs::create_job)
        .service(jobs::list_jobs)
        .service(jobs::delete_job)
        .service(events::create_event)
        .service(events::list_events)
        .service(events::update_event)
        .service(events::delete_event)
        .service(events::register_for_event)
        .service(events::unregister_from_event)
        .service(mentorship::send_request)
        .service(mentorship::list_requests)
        .service(mentorship::respond)
        .service(admin::list_unverified)
        .service(admin::verify_user);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing binding, token, and database settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
