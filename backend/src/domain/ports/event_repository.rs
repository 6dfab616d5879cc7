//! Port abstraction for event persistence adapters, with an in-memory
//! implementation backing tests and dev mode.
//!
//! Attendance mutations are expressed as single-document set operations so
//! adapters can implement them atomically at the store.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::event::{Event, EventId};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by event repository adapters.
    pub enum EventPersistenceError {
        /// Repository connection could not be established.
        Connection => "event repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "event repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a new event.
    async fn insert(&self, event: &Event) -> Result<(), EventPersistenceError>;

    /// Fetch an event by identifier.
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventPersistenceError>;

    /// All events, date ascending.
    async fn list(&self) -> Result<Vec<Event>, EventPersistenceError>;

    /// Replace the stored record for an existing event.
    async fn update(&self, event: &Event) -> Result<(), EventPersistenceError>;

    /// Delete an event. Returns `false` when the event is absent.
    async fn delete(&self, id: EventId) -> Result<bool, EventPersistenceError>;

    /// Atomically add `user` to the attendance set. Returns `false` when the
    /// event is absent; adding an existing attendee is a no-op.
    async fn add_attendee(&self, id: EventId, user: UserId)
        -> Result<bool, EventPersistenceError>;

    /// Atomically remove `user` from the attendance set. Returns `false`
    /// when the event is absent.
    async fn remove_attendee(
        &self,
        id: EventId,
        user: UserId,
    ) -> Result<bool, EventPersistenceError>;
}

/// In-memory event repository for tests and dev mode.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    events: Mutex<Vec<Event>>,
}

impl InMemoryEventRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, Vec<Event>>, EventPersistenceError> {
        self.events
            .lock()
            .map_err(|_| EventPersistenceError::query("event store lock poisoned"))
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert(&self, event: &Event) -> Result<(), EventPersistenceError> {
        self.guard()?.push(event.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventPersistenceError> {
        Ok(self.guard()?.iter().find(|event| event.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Event>, EventPersistenceError> {
        let mut events = self.guard()?.clone();
        events.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(events)
    }

    async fn update(&self, event: &Event) -> Result<(), EventPersistenceError> {
        let mut events = self.guard()?;
        match events.iter_mut().find(|existing| existing.id == event.id) {
            Some(existing) => {
                *existing = event.clone();
                Ok(())
            }
            None => Err(EventPersistenceError::query(format!(
                "event {} not found for update",
                event.id
            ))),
        }
    }

    async fn delete(&self, id: EventId) -> Result<bool, EventPersistenceError> {
        let mut events = self.guard()?;
        let before = events.len();
        events.retain(|event| event.id != id);
        Ok(events.len() < before)
    }

    async fn add_attendee(
        &self,
        id: EventId,
        user: UserId,
    ) -> Result<bool, EventPersistenceError> {
        let mut events = self.guard()?;
        match events.iter_mut().find(|event| event.id == id) {
            Some(event) => {
                event.register(user);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_attendee(
        &self,
        id: EventId,
        user: UserId,
    ) -> Result<bool, EventPersistenceError> {
        let mut events = self.guard()?;
        match events.iter_mut().find(|event| event.id == id) {
            Some(event) => {
                event.unregister(user);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
