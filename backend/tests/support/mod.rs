//! Shared fixtures for the HTTP integration suites.
//!
//! Unlike the handler unit tests, these suites run the full identity stack:
//! real Argon2 hashing and real HS256 bearer tokens over the in-memory
//! repositories. Integration tests compile as separate crates under
//! `backend/tests/`, so the harness lives here rather than in the library.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::Value;

use backend::domain::ports::{
    InMemoryEventRepository, InMemoryJobRepository, InMemoryMentorshipRepository,
    InMemoryPostRepository, InMemoryUserRepository, PasswordHasher, TokenService, UserRepository,
};
use backend::domain::user::{Profile, Role, User};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::inbound::http::{admin, auth, events, jobs, mentorship, posts, users};
use backend::outbound::identity::{Argon2PasswordHasher, JwtTokenService};

/// Password shared by every seeded account.
pub const PASSWORD: &str = "correct horse battery staple";

/// In-memory backend with real crypto adapters and the assembled HTTP state.
pub struct Backend {
    pub users: Arc<InMemoryUserRepository>,
    hasher: Arc<Argon2PasswordHasher>,
    tokens: Arc<JwtTokenService>,
    pub state: web::Data<HttpState>,
}

impl Backend {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(Argon2PasswordHasher::new());
        let tokens = Arc::new(JwtTokenService::new(b"integration-test-secret", 3600));
        let state = HttpState::new(HttpStatePorts {
            users: users.clone(),
            posts: Arc::new(InMemoryPostRepository::new()),
            jobs: Arc::new(InMemoryJobRepository::new()),
            events: Arc::new(InMemoryEventRepository::new()),
            mentorship: Arc::new(InMemoryMentorshipRepository::new()),
            hasher: hasher.clone(),
            tokens: tokens.clone(),
        });
        Self {
            users,
            hasher,
            tokens,
            state: web::Data::new(state),
        }
    }

    /// Insert a user directly and mint a token the server will accept.
    ///
    /// The email is derived from the name, so seeded names must be unique
    /// within a test.
    pub async fn seed_user(&self, name: &str, role: Role, verified: bool) -> (User, String) {
        let password_hash = self.hasher.hash(PASSWORD).await.expect("hash password");
        let mut user = User::register(
            name,
            format!("{}@example.edu", name.to_lowercase()),
            password_hash,
            role,
            Profile::default(),
        );
        user.is_verified = verified;
        self.users.insert(&user).await.expect("seed user");
        let token = self.tokens.issue(user.id).await.expect("issue token");
        (user, token)
    }
}

/// An application with every API route mounted, mirroring the server
/// assembly.
pub fn app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).service(
        web::scope("/api")
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
            .service(admin::verify_user),
    )
}

/// Attach a bearer token to a test request.
pub fn authed(request: test::TestRequest, token: &str) -> test::TestRequest {
    request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
}

/// Drive a request through `app` and decode the JSON response, if any.
pub async fn send<S, B>(app: &S, request: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
