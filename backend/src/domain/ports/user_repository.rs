//! Port abstraction for user persistence adapters, with an in-memory
//! implementation backing tests and dev mode.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::user::{Role, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "user repository query failed: {message}",
        /// The email address is already registered.
        DuplicateEmail => "email already registered: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, enforcing email uniqueness.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError>;

    /// Replace the stored record for an existing user.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Flip `is_verified` to true. Returns `false` when the user is absent.
    async fn set_verified(&self, id: UserId) -> Result<bool, UserPersistenceError>;

    /// Unverified users holding the Student or Alumni role.
    async fn list_unverified(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Verified users holding the Alumni role.
    async fn list_verified_alumni(&self) -> Result<Vec<User>, UserPersistenceError>;
}

/// In-memory user repository for tests and dev mode.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, Vec<User>>, UserPersistenceError> {
        self.users
            .lock()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.guard()?;
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(UserPersistenceError::duplicate_email(user.email.clone()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.guard()?.iter().find(|user| user.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.guard()?.iter().find(|user| user.email == email).cloned())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.guard()?;
        match users.iter_mut().find(|existing| existing.id == user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(UserPersistenceError::query(format!(
                "user {} not found for update",
                user.id
            ))),
        }
    }

    async fn set_verified(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut users = self.guard()?;
        match users.iter_mut().find(|user| user.id == id) {
            Some(user) => {
                user.is_verified = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_unverified(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self
            .guard()?
            .iter()
            .filter(|user| {
                !user.is_verified && matches!(user.role, Role::Student | Role::Alumni)
            })
            .cloned()
            .collect())
    }

    async fn list_verified_alumni(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self
            .guard()?
            .iter()
            .filter(|user| user.is_verified && user.role == Role::Alumni)
            .cloned()
            .collect())
    }
}
