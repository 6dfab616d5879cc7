//! Port abstraction for mentorship request persistence adapters, with an
//! in-memory implementation backing tests and dev mode.
//!
//! Status changes are expressed as targeted set operations so adapters can
//! implement them atomically at the store.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::mentorship::{MentorshipRequest, MentorshipStatus, RequestId};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by mentorship repository adapters.
    pub enum MentorshipPersistenceError {
        /// Repository connection could not be established.
        Connection => "mentorship repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "mentorship repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MentorshipRepository: Send + Sync {
    /// Insert a new mentorship request.
    async fn insert(&self, request: &MentorshipRequest) -> Result<(), MentorshipPersistenceError>;

    /// Fetch a request by identifier.
    async fn find_by_id(
        &self,
        id: RequestId,
    ) -> Result<Option<MentorshipRequest>, MentorshipPersistenceError>;

    /// Requests addressed to `alumni`, newest first.
    async fn list_by_alumni(
        &self,
        alumni: UserId,
    ) -> Result<Vec<MentorshipRequest>, MentorshipPersistenceError>;

    /// Requests sent by `student`, newest first.
    async fn list_by_student(
        &self,
        student: UserId,
    ) -> Result<Vec<MentorshipRequest>, MentorshipPersistenceError>;

    /// Atomically set the status of a request. Returns `false` when the
    /// request is absent.
    async fn set_status(
        &self,
        id: RequestId,
        status: MentorshipStatus,
    ) -> Result<bool, MentorshipPersistenceError>;
}

/// In-memory mentorship repository for tests and dev mode.
#[derive(Debug, Default)]
pub struct InMemoryMentorshipRepository {
    requests: Mutex<Vec<MentorshipRequest>>,
}

impl InMemoryMentorshipRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, Vec<MentorshipRequest>>, MentorshipPersistenceError>
    {
        self.requests
            .lock()
            .map_err(|_| MentorshipPersistenceError::query("mentorship store lock poisoned"))
    }
}

#[async_trait]
impl MentorshipRepository for InMemoryMentorshipRepository {
    async fn insert(&self, request: &MentorshipRequest) -> Result<(), MentorshipPersistenceError> {
        self.guard()?.push(request.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: RequestId,
    ) -> Result<Option<MentorshipRequest>, MentorshipPersistenceError> {
        Ok(self
            .guard()?
            .iter()
            .find(|request| request.id == id)
            .cloned())
    }

    async fn list_by_alumni(
        &self,
        alumni: UserId,
    ) -> Result<Vec<MentorshipRequest>, MentorshipPersistenceError> {
        let mut requests: Vec<_> = self
            .guard()?
            .iter()
            .filter(|request| request.alumni == alumni)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn list_by_student(
        &self,
        student: UserId,
    ) -> Result<Vec<MentorshipRequest>, MentorshipPersistenceError> {
        let mut requests: Vec<_> = self
            .guard()?
            .iter()
            .filter(|request| request.student == student)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn set_status(
        &self,
        id: RequestId,
        status: MentorshipStatus,
    ) -> Result<bool, MentorshipPersistenceError> {
        let mut requests = self.guard()?;
        match requests.iter_mut().find(|request| request.id == id) {
            Some(request) => {
                request.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
