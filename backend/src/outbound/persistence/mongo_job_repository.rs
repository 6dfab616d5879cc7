//! MongoDB-backed `JobRepository` adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::domain::job::{Job, JobId, JobType};
use crate::domain::ports::{JobPersistenceError, JobRepository};
use crate::domain::user::UserId;

use super::is_connection_error;

const COLLECTION: &str = "jobs";

/// Stored form of a job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobDocument {
    #[serde(rename = "_id")]
    id: JobId,
    title: String,
    company: String,
    location: String,
    description: String,
    job_type: JobType,
    apply_link: String,
    posted_by: UserId,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
}

impl From<&Job> for JobDocument {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            description: job.description.clone(),
            job_type: job.job_type,
            apply_link: job.apply_link.clone(),
            posted_by: job.posted_by,
            created_at: job.created_at,
        }
    }
}

impl From<JobDocument> for Job {
    fn from(document: JobDocument) -> Self {
        Self {
            id: document.id,
            title: document.title,
            company: document.company,
            location: document.location,
            description: document.description,
            job_type: document.job_type,
            apply_link: document.apply_link,
            posted_by: document.posted_by,
            created_at: document.created_at,
        }
    }
}

fn map_job_error(error: mongodb::error::Error) -> JobPersistenceError {
    if is_connection_error(&error) {
        JobPersistenceError::connection(error.to_string())
    } else {
        JobPersistenceError::query(error.to_string())
    }
}

/// MongoDB-backed job repository.
#[derive(Clone)]
pub struct MongoJobRepository {
    collection: Collection<JobDocument>,
}

impl MongoJobRepository {
    /// Create a repository over the `jobs` collection of `database`.
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }
}

#[async_trait]
impl JobRepository for MongoJobRepository {
    async fn insert(&self, job: &Job) -> Result<(), JobPersistenceError> {
        self.collection
            .insert_one(JobDocument::from(job))
            .await
            .map_err(map_job_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>, JobPersistenceError> {
        let document = self
            .collection
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_job_error)?;
        Ok(document.map(Job::from))
    }

    async fn list(&self) -> Result<Vec<Job>, JobPersistenceError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await
            .map_err(map_job_error)?;
        let documents: Vec<JobDocument> = cursor.try_collect().await.map_err(map_job_error)?;
        Ok(documents.into_iter().map(Job::from).collect())
    }

    async fn delete(&self, id: JobId) -> Result<bool, JobPersistenceError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_job_error)?;
        Ok(result.deleted_count > 0)
    }
}
