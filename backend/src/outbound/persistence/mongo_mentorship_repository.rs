//! MongoDB-backed `MentorshipRepository` adapter.
//!
//! Status changes are targeted `$set` updates, so resolving a request never
//! rewrites the rest of the document.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::domain::mentorship::{MentorshipRequest, MentorshipStatus, RequestId};
use crate::domain::ports::{MentorshipPersistenceError, MentorshipRepository};
use crate::domain::user::UserId;

use super::is_connection_error;

const COLLECTION: &str = "mentorship_requests";

/// Stored form of a mentorship request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MentorshipDocument {
    #[serde(rename = "_id")]
    id: RequestId,
    student: UserId,
    alumni: UserId,
    message: String,
    status: MentorshipStatus,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
}

impl From<&MentorshipRequest> for MentorshipDocument {
    fn from(request: &MentorshipRequest) -> Self {
        Self {
            id: request.id,
            student: request.student,
            alumni: request.alumni,
            message: request.message.clone(),
            status: request.status,
            created_at: request.created_at,
        }
    }
}

impl From<MentorshipDocument> for MentorshipRequest {
    fn from(document: MentorshipDocument) -> Self {
        Self {
            id: document.id,
            student: document.student,
            alumni: document.alumni,
            message: document.message,
            status: document.status,
            created_at: document.created_at,
        }
    }
}

fn map_mentorship_error(error: mongodb::error::Error) -> MentorshipPersistenceError {
    if is_connection_error(&error) {
        MentorshipPersistenceError::connection(error.to_string())
    } else {
        MentorshipPersistenceError::query(error.to_string())
    }
}

/// MongoDB-backed mentorship repository.
#[derive(Clone)]
pub struct MongoMentorshipRepository {
    collection: Collection<MentorshipDocument>,
}

impl MongoMentorshipRepository {
    /// Create a repository over the `mentorship_requests` collection of
    /// `database`.
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }

    async fn collect_newest_first(
        &self,
        filter: mongodb::bson::Document,
    ) -> Result<Vec<MentorshipRequest>, MentorshipPersistenceError> {
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .await
            .map_err(map_mentorship_error)?;
        let documents: Vec<MentorshipDocument> = cursor
            .try_collect()
            .await
            .map_err(map_mentorship_error)?;
        Ok(documents.into_iter().map(MentorshipRequest::from).collect())
    }
}

#[async_trait]
impl MentorshipRepository for MongoMentorshipRepository {
    async fn insert(&self, request: &MentorshipRequest) -> Result<(), MentorshipPersistenceError> {
        self.collection
            .insert_one(MentorshipDocument::from(request))
            .await
            .map_err(map_mentorship_error)?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: RequestId,
    ) -> Result<Option<MentorshipRequest>, MentorshipPersistenceError> {
        let document = self
            .collection
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_mentorship_error)?;
        Ok(document.map(MentorshipRequest::from))
    }

    async fn list_by_alumni(
        &self,
        alumni: UserId,
    ) -> Result<Vec<MentorshipRequest>, MentorshipPersistenceError> {
        self.collect_newest_first(doc! { "alumni": alumni.to_string() })
            .await
    }

    async fn list_by_student(
        &self,
        student: UserId,
    ) -> Result<Vec<MentorshipRequest>, MentorshipPersistenceError> {
        self.collect_newest_first(doc! { "student": student.to_string() })
            .await
    }

    async fn set_status(
        &self,
        id: RequestId,
        status: MentorshipStatus,
    ) -> Result<bool, MentorshipPersistenceError> {
        let status = mongodb::bson::to_bson(&status)
            .map_err(|err| MentorshipPersistenceError::query(err.to_string()))?;
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$set": { "status": status } },
            )
            .await
            .map_err(map_mentorship_error)?;
        Ok(result.matched_count > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the document conversions.
    use super::*;
    use mongodb::bson::{Bson, to_bson, to_document};

    fn sample_request() -> MentorshipRequest {
        MentorshipRequest::new(UserId::random(), UserId::random(), "Please mentor me")
    }

    #[test]
    fn conversion_round_trips_the_request() {
        let request = sample_request();
        let restored = MentorshipRequest::from(MentorshipDocument::from(&request));
        assert_eq!(restored, request);
    }

    #[test]
    fn document_stores_status_and_parties_as_strings() {
        let request = sample_request();
        let document = to_document(&MentorshipDocument::from(&request))
            .expect("document serialises");

        assert_eq!(
            document.get("status"),
            Some(&Bson::String("Pending".into()))
        );
        assert_eq!(
            document.get("student"),
            Some(&Bson::String(request.student.to_string()))
        );
        assert_eq!(
            document.get("alumni"),
            Some(&Bson::String(request.alumni.to_string()))
        );
    }

    #[test]
    fn status_values_serialise_to_their_wire_names() {
        assert_eq!(
            to_bson(&MentorshipStatus::Accepted).expect("serialises"),
            Bson::String("Accepted".into())
        );
        assert_eq!(
            to_bson(&MentorshipStatus::Rejected).expect("serialises"),
            Bson::String("Rejected".into())
        );
    }
}
