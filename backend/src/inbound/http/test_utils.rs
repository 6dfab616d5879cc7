//! Shared fixtures for HTTP handler tests.
//!
//! Handler tests run over the in-memory repositories with deterministic
//! stand-ins for hashing and token issuance, so a seeded user's token is
//! predictable without touching real crypto.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test, web};
use async_trait::async_trait;

use crate::domain::ports::{
    InMemoryEventRepository, InMemoryJobRepository, InMemoryMentorshipRepository,
    InMemoryPostRepository, InMemoryUserRepository, PasswordHashError, PasswordHasher, TokenError,
    TokenService, UserRepository,
};
use crate::domain::user::{Profile, Role, User, UserId};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::{admin, auth, events, jobs, mentorship, posts, users};

/// Hasher whose output is the password with a recognisable prefix.
pub(crate) struct StubHasher;

#[async_trait]
impl PasswordHasher for StubHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("hashed:{password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        Ok(hash == format!("hashed:{password}"))
    }
}

/// Token service that encodes the user id directly in the token text.
pub(crate) struct StubTokens;

#[async_trait]
impl TokenService for StubTokens {
    async fn issue(&self, user: UserId) -> Result<String, TokenError> {
        Ok(format!("token-{user}"))
    }

    async fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        token
            .strip_prefix("token-")
            .and_then(|id| id.parse().ok())
            .ok_or_else(|| TokenError::verify("unknown token"))
    }
}

/// In-memory backend plus the assembled HTTP state.
pub(crate) struct TestBackend {
    pub users: Arc<InMemoryUserRepository>,
    pub state: web::Data<HttpState>,
}

impl TestBackend {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let state = HttpState::new(HttpStatePorts {
            users: users.clone(),
            posts: Arc::new(InMemoryPostRepository::new()),
            jobs: Arc::new(InMemoryJobRepository::new()),
            events: Arc::new(InMemoryEventRepository::new()),
            mentorship: Arc::new(InMemoryMentorshipRepository::new()),
            hasher: Arc::new(StubHasher),
            tokens: Arc::new(StubTokens),
        });
        Self {
            users,
            state: web::Data::new(state),
        }
    }

    /// Insert a user and return it with a token [`StubTokens`] will accept.
    pub async fn seed_user(&self, name: &str, role: Role, verified: bool) -> (User, String) {
        let mut user = User::register(
            name,
            format!("{}@example.edu", name.to_lowercase()),
            "hashed:secret",
            role,
            Profile::default(),
        );
        user.is_verified = verified;
        self.users.insert(&user).await.expect("seed user");
        let token = format!("token-{}", user.id);
        (user, token)
    }
}

/// An application with every API route mounted, mirroring the server
/// assembly.
pub(crate) fn test_app(
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
pub(crate) fn authed(request: test::TestRequest, token: &str) -> test::TestRequest {
    request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
}
