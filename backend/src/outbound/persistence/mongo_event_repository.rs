//! MongoDB-backed `EventRepository` adapter.
//!
//! Attendance mutations use `$addToSet`/`$pull` so concurrent registrations
//! never lose updates to the same event.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::domain::event::{Event, EventId, Visibility};
use crate::domain::ports::{EventPersistenceError, EventRepository};
use crate::domain::user::UserId;

use super::is_connection_error;

const COLLECTION: &str = "events";

/// Stored form of the event aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDocument {
    #[serde(rename = "_id")]
    id: EventId,
    created_by: UserId,
    title: String,
    description: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    date: DateTime<Utc>,
    location: String,
    image: Option<String>,
    visibility: Visibility,
    attendees: Vec<UserId>,
}

impl From<&Event> for EventDocument {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            created_by: event.created_by,
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            location: event.location.clone(),
            image: event.image.clone(),
            visibility: event.visibility,
            attendees: event.attendees.clone(),
        }
    }
}

impl From<EventDocument> for Event {
    fn from(document: EventDocument) -> Self {
        Self {
            id: document.id,
            created_by: document.created_by,
            title: document.title,
            description: document.description,
            date: document.date,
            location: document.location,
            image: document.image,
            visibility: document.visibility,
            attendees: document.attendees,
        }
    }
}

fn map_event_error(error: mongodb::error::Error) -> EventPersistenceError {
    if is_connection_error(&error) {
        EventPersistenceError::connection(error.to_string())
    } else {
        EventPersistenceError::query(error.to_string())
    }
}

/// MongoDB-backed event repository.
#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<EventDocument>,
}

impl MongoEventRepository {
    /// Create a repository over the `events` collection of `database`.
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    async fn insert(&self, event: &Event) -> Result<(), EventPersistenceError> {
        self.collection
            .insert_one(EventDocument::from(event))
            .await
            .map_err(map_event_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventPersistenceError> {
        let document = self
            .collection
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_event_error)?;
        Ok(document.map(Event::from))
    }

    async fn list(&self) -> Result<Vec<Event>, EventPersistenceError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "date": 1 })
            .await
            .map_err(map_event_error)?;
        let documents: Vec<EventDocument> =
            cursor.try_collect().await.map_err(map_event_error)?;
        Ok(documents.into_iter().map(Event::from).collect())
    }

    async fn update(&self, event: &Event) -> Result<(), EventPersistenceError> {
        let result = self
            .collection
            .replace_one(
                doc! { "_id": event.id.to_string() },
                EventDocument::from(event),
            )
            .await
            .map_err(map_event_error)?;
        if result.matched_count == 0 {
            return Err(EventPersistenceError::query(format!(
                "event {} not found for update",
                event.id
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: EventId) -> Result<bool, EventPersistenceError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_event_error)?;
        Ok(result.deleted_count > 0)
    }

    async fn add_attendee(
        &self,
        id: EventId,
        user: UserId,
    ) -> Result<bool, EventPersistenceError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$addToSet": { "attendees": user.to_string() } },
            )
            .await
            .map_err(map_event_error)?;
        Ok(result.matched_count > 0)
    }

    async fn remove_attendee(
        &self,
        id: EventId,
        user: UserId,
    ) -> Result<bool, EventPersistenceError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$pull": { "attendees": user.to_string() } },
            )
            .await
            .map_err(map_event_error)?;
        Ok(result.matched_count > 0)
    }
}
