//! Port abstraction for job posting persistence adapters, with an in-memory
//! implementation backing tests and dev mode.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::job::{Job, JobId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by job repository adapters.
    pub enum JobPersistenceError {
        /// Repository connection could not be established.
        Connection => "job repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "job repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert a new job posting.
    async fn insert(&self, job: &Job) -> Result<(), JobPersistenceError>;

    /// Fetch a job by identifier.
    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>, JobPersistenceError>;

    /// All job postings, newest first.
    async fn list(&self) -> Result<Vec<Job>, JobPersistenceError>;

    /// Delete a job posting. Returns `false` when the job is absent.
    async fn delete(&self, id: JobId) -> Result<bool, JobPersistenceError>;
}

/// In-memory job repository for tests and dev mode.
#[derive(Debug, Default)]
pub struct InMemoryJobRepository {
    jobs: Mutex<Vec<Job>>,
}

impl InMemoryJobRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, Vec<Job>>, JobPersistenceError> {
        self.jobs
            .lock()
            .map_err(|_| JobPersistenceError::query("job store lock poisoned"))
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn insert(&self, job: &Job) -> Result<(), JobPersistenceError> {
        self.guard()?.push(job.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>, JobPersistenceError> {
        Ok(self.guard()?.iter().find(|job| job.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Job>, JobPersistenceError> {
        let mut jobs = self.guard()?.clone();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn delete(&self, id: JobId) -> Result<bool, JobPersistenceError> {
        let mut jobs = self.guard()?;
        let before = jobs.len();
        jobs.retain(|job| job.id != id);
        Ok(jobs.len() < before)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::job::{JobDraft, JobType};
    use crate::domain::user::UserId;

    fn job(title: &str) -> Job {
        Job::new(
            UserId::random(),
            JobDraft {
                title: title.into(),
                company: "Acme".into(),
                location: "Remote".into(),
                description: "Build things".into(),
                job_type: JobType::Contract,
                apply_link: "https://acme.example/jobs".into(),
            },
        )
    }

    #[tokio::test]
    async fn delete_removes_and_reports_absence() {
        let repo = InMemoryJobRepository::new();
        let stored = job("Engineer");
        repo.insert(&stored).await.expect("insert succeeds");

        assert!(repo.delete(stored.id).await.expect("delete succeeds"));
        assert!(!repo.delete(stored.id).await.expect("second delete reports absence"));
        assert!(repo.list().await.expect("listing succeeds").is_empty());
    }
}
