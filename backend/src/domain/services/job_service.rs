//! Job board lifecycle: alumni postings and their removal.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::error::Error;
use crate::domain::guard::{require_owner, require_role, require_verified};
use crate::domain::job::{Job, JobDraft, JobId, JobType};
use crate::domain::ports::{JobPersistenceError, JobRepository, UserRepository};
use crate::domain::user::{Role, User, UserId};

use super::{display_name, resolve_users};

fn map_job_error(error: JobPersistenceError) -> Error {
    match error {
        JobPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("job repository unavailable: {message}"))
        }
        JobPersistenceError::Query { message } => {
            Error::internal(format!("job repository error: {message}"))
        }
    }
}

/// Job posting enriched with the poster's display name.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub job_type: JobType,
    pub apply_link: String,
    pub posted_by: UserId,
    pub posted_by_name: String,
    pub created_at: DateTime<Utc>,
}

impl JobView {
    fn project(job: Job, resolved: &HashMap<UserId, User>) -> Self {
        let posted_by_name = display_name(resolved, job.posted_by);
        Self {
            id: job.id,
            title: job.title,
            company: job.company,
            location: job.location,
            description: job.description,
            job_type: job.job_type,
            apply_link: job.apply_link,
            posted_by: job.posted_by,
            posted_by_name,
            created_at: job.created_at,
        }
    }

    fn posted_by(job: Job, poster: &User) -> Self {
        Self {
            id: job.id,
            title: job.title,
            company: job.company,
            location: job.location,
            description: job.description,
            job_type: job.job_type,
            apply_link: job.apply_link,
            posted_by: job.posted_by,
            posted_by_name: poster.name.clone(),
            created_at: job.created_at,
        }
    }
}

/// Job board service backing `/api/jobs`.
#[derive(Clone)]
pub struct JobService {
    jobs: Arc<dyn JobRepository>,
    users: Arc<dyn UserRepository>,
}

impl JobService {
    /// Create the service over its collaborating ports.
    pub fn new(jobs: Arc<dyn JobRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { jobs, users }
    }

    /// Publish a job posting attributed to the actor. Alumni only.
    pub async fn create(&self, actor: &User, draft: JobDraft) -> Result<JobView, Error> {
        require_verified(actor)?;
        require_role(actor, Role::Alumni)?;
        if draft.title.trim().is_empty() {
            return Err(Error::invalid_request("Job title is required"));
        }

        let job = Job::new(actor.id, draft);
        self.jobs.insert(&job).await.map_err(map_job_error)?;
        Ok(JobView::posted_by(job, actor))
    }

    /// All postings, newest first, with poster names resolved.
    pub async fn list(&self, actor: &User) -> Result<Vec<JobView>, Error> {
        require_verified(actor)?;
        let jobs = self.jobs.list().await.map_err(map_job_error)?;
        let resolved = resolve_users(&self.users, jobs.iter().map(|job| job.posted_by)).await?;
        Ok(jobs
            .into_iter()
            .map(|job| JobView::project(job, &resolved))
            .collect())
    }

    /// Remove a posting. Only the posting Alumni may delete; there is no
    /// admin override.
    pub async fn delete(&self, actor: &User, id: JobId) -> Result<(), Error> {
        require_verified(actor)?;
        require_role(actor, Role::Alumni)?;
        let job = self
            .jobs
            .find_by_id(id)
            .await
            .map_err(map_job_error)?
            .ok_or_else(|| Error::not_found("Job not found"))?;
        require_owner(actor, job.posted_by, "Not authorized to delete this job")?;
        if !self.jobs.delete(id).await.map_err(map_job_error)? {
            return Err(Error::not_found("Job not found"));
        }
        Ok(())
    }
}
