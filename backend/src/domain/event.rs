//! Event entity: admin-owned details plus a per-user attendance set.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::{Role, UserId};

/// Stable event identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct EventId(Uuid);

impl EventId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl From<Uuid> for EventId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Audience an event is visible to. Serialised names match the wire contract
/// consumed by existing clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Visibility {
    #[serde(rename = "Alumni_Only")]
    AlumniOnly,
    All,
}

impl Visibility {
    /// Whether an actor holding `role` may see an event with this
    /// visibility. Students are the only audience restricted to `All`.
    pub fn visible_to(self, role: Role) -> bool {
        match self {
            Visibility::All => true,
            Visibility::AlumniOnly => role != Role::Student,
        }
    }
}

/// Event aggregate.
///
/// ## Invariants
/// - `attendees` is duplicate-free.
/// - Only the creating Institute Admin updates or deletes the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub created_by: UserId,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub visibility: Visibility,
    pub attendees: Vec<UserId>,
}

/// Field bundle for creating an event. `visibility` defaults to
/// [`Visibility::AlumniOnly`] when omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub image: Option<String>,
    pub visibility: Option<Visibility>,
}

/// Partial update for an event; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub visibility: Option<Visibility>,
}

impl Event {
    /// Build a new event owned by `created_by`.
    pub fn new(created_by: UserId, draft: EventDraft) -> Self {
        Self {
            id: EventId::random(),
            created_by,
            title: draft.title,
            description: draft.description,
            date: draft.date,
            location: draft.location,
            image: draft.image,
            visibility: draft.visibility.unwrap_or(Visibility::AlumniOnly),
            attendees: Vec::new(),
        }
    }

    /// Whether `user` is currently registered.
    pub fn is_attending(&self, user: UserId) -> bool {
        self.attendees.contains(&user)
    }

    /// Add `user` to the attendance set. Returns `false` when already
    /// registered.
    pub fn register(&mut self, user: UserId) -> bool {
        if self.is_attending(user) {
            false
        } else {
            self.attendees.push(user);
            true
        }
    }

    /// Remove `user` from the attendance set. Returns `false` when not
    /// registered.
    pub fn unregister(&mut self, user: UserId) -> bool {
        if self.is_attending(user) {
            self.attendees.retain(|id| *id != user);
            true
        } else {
            false
        }
    }

    /// Apply a partial update; absent fields are preserved.
    pub fn apply(&mut self, patch: EventPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(image) = patch.image {
            self.image = Some(image);
        }
        if let Some(visibility) = patch.visibility {
            self.visibility = visibility;
        }
    }
}
