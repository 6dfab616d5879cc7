//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services (and through them, the ports) and remain
//! testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    EventRepository, JobRepository, MentorshipRepository, PasswordHasher, PostRepository,
    TokenService, UserRepository,
};
use crate::domain::services::{
    AdminService, AuthService, EventService, JobService, MentorshipService, PostService,
    UserService,
};

/// Parameter object bundling the port implementations the HTTP layer is
/// assembled from.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub events: Arc<dyn EventRepository>,
    pub mentorship: Arc<dyn MentorshipRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenService>,
}

/// Dependency bundle for HTTP handlers: one service per route group.
#[derive(Clone)]
pub struct HttpState {
    pub auth: AuthService,
    pub users: UserService,
    pub posts: PostService,
    pub jobs: JobService,
    pub events: EventService,
    pub mentorship: MentorshipService,
    pub admin: AdminService,
}

impl HttpState {
    /// Construct the service graph from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{
    ///     InMemoryEventRepository, InMemoryJobRepository, InMemoryMentorshipRepository,
    ///     InMemoryPostRepository, InMemoryUserRepository,
    /// };
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use backend::outbound::identity::{Argon2PasswordHasher, JwtTokenService};
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     users: Arc::new(InMemoryUserRepository::new()),
    ///     posts: Arc::new(InMemoryPostRepository::new()),
    ///     jobs: Arc::new(InMemoryJobRepository::new()),
    ///     events: Arc::new(InMemoryEventRepository::new()),
    ///     mentorship: Arc::new(InMemoryMentorshipRepository::new()),
    ///     hasher: Arc::new(Argon2PasswordHasher::default()),
    ///     tokens: Arc::new(JwtTokenService::new(b"dev-secret", 3600)),
    /// });
    /// let _auth = state.auth.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            posts,
            jobs,
            events,
            mentorship,
            hasher,
            tokens,
        } = ports;
        Self {
            auth: AuthService::new(users.clone(), hasher, tokens),
            users: UserService::new(users.clone()),
            posts: PostService::new(posts, users.clone()),
            jobs: JobService::new(jobs, users.clone()),
            events: EventService::new(events, users.clone()),
            mentorship: MentorshipService::new(mentorship, users.clone()),
            admin: AdminService::new(users),
        }
    }
}
