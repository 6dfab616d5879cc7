//! Job posting entity.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::UserId;

/// Stable job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl From<Uuid> for JobId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Employment category of a job posting. Serialised names match the wire
/// contract consumed by existing clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Internship,
    Contract,
}

/// Job posting.
///
/// Created by Alumni; deleted only by the posting Alumni.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub job_type: JobType,
    pub apply_link: String,
    pub posted_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Field bundle for creating a job posting.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub job_type: JobType,
    pub apply_link: String,
}

impl Job {
    /// Build a new job posting attributed to `posted_by`.
    pub fn new(posted_by: UserId, draft: JobDraft) -> Self {
        Self {
            id: JobId::random(),
            title: draft.title,
            company: draft.company,
            location: draft.location,
            description: draft.description,
            job_type: draft.job_type,
            apply_link: draft.apply_link,
            posted_by,
            created_at: Utc::now(),
        }
    }
}
