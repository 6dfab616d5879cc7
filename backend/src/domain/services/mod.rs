//! Entity lifecycle services.
//!
//! Each service evaluates the authorization guard first, then drives the
//! relevant repository ports, translating port errors into domain errors.
//! Referenced users (post authors, job posters, event creators, mentorship
//! students) are resolved here so responses carry display names without the
//! adapters knowing about cross-entity joins.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::error::Error;
use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::user::{User, UserId};

mod admin_service;
mod auth_service;
mod event_service;
mod job_service;
mod mentorship_service;
mod post_service;
mod user_service;

pub use admin_service::AdminService;
pub use auth_service::{AuthService, AuthSession, Registration};
pub use event_service::{EventService, EventView};
pub use job_service::{JobService, JobView};
pub use mentorship_service::{MentorshipService, MentorshipView};
pub use post_service::{PostService, PostView};
pub use user_service::{ProfileUpdate, UserService};

/// Fallback display name for references whose user record no longer
/// resolves.
pub(crate) const UNKNOWN_USER: &str = "Unknown";

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict("User already exists"),
    }
}

/// Load each distinct referenced user once. Ids that no longer resolve are
/// simply absent from the map; callers fall back to [`UNKNOWN_USER`].
pub(crate) async fn resolve_users<I>(
    users: &Arc<dyn UserRepository>,
    ids: I,
) -> Result<HashMap<UserId, User>, Error>
where
    I: IntoIterator<Item = UserId>,
{
    let mut resolved = HashMap::new();
    for id in ids {
        if resolved.contains_key(&id) {
            continue;
        }
        if let Some(user) = users.find_by_id(id).await.map_err(map_user_error)? {
            resolved.insert(id, user);
        }
    }
    Ok(resolved)
}

pub(crate) fn display_name(resolved: &HashMap<UserId, User>, id: UserId) -> String {
    resolved
        .get(&id)
        .map(|user| user.name.clone())
        .unwrap_or_else(|| UNKNOWN_USER.to_owned())
}
