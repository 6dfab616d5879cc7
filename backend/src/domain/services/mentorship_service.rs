//! Mentorship lifecycle: student requests and alumni responses.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::error::Error;
use crate::domain::guard::require_verified;
use crate::domain::mentorship::{MentorshipRequest, MentorshipStatus, RequestId};
use crate::domain::ports::{MentorshipPersistenceError, MentorshipRepository, UserRepository};
use crate::domain::user::{Profile, Role, User, UserId};

use super::{display_name, map_user_error, resolve_users};

fn map_mentorship_error(error: MentorshipPersistenceError) -> Error {
    match error {
        MentorshipPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("mentorship repository unavailable: {message}"))
        }
        MentorshipPersistenceError::Query { message } => {
            Error::internal(format!("mentorship repository error: {message}"))
        }
    }
}

/// Mentorship request enriched with both parties' display names and the
/// student's profile, so the alumni inbox can render without extra lookups.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MentorshipView {
    pub id: RequestId,
    pub student: UserId,
    pub student_name: String,
    pub student_profile: Profile,
    pub alumni: UserId,
    pub alumni_name: String,
    pub message: String,
    pub status: MentorshipStatus,
    pub created_at: DateTime<Utc>,
}

impl MentorshipView {
    fn project(request: MentorshipRequest, resolved: &HashMap<UserId, User>) -> Self {
        let student_name = display_name(resolved, request.student);
        let student_profile = resolved
            .get(&request.student)
            .map(|user| user.profile.clone())
            .unwrap_or_default();
        let alumni_name = display_name(resolved, request.alumni);
        Self {
            id: request.id,
            student: request.student,
            student_name,
            student_profile,
            alumni: request.alumni,
            alumni_name,
            message: request.message,
            status: request.status,
            created_at: request.created_at,
        }
    }
}

/// Mentorship service backing `/api/mentorship`.
#[derive(Clone)]
pub struct MentorshipService {
    requests: Arc<dyn MentorshipRepository>,
    users: Arc<dyn UserRepository>,
}

impl MentorshipService {
    /// Create the service over its collaborating ports.
    pub fn new(requests: Arc<dyn MentorshipRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { requests, users }
    }

    /// Send a pending request from the actor to an alumni.
    ///
    /// The target must resolve to a user currently holding the Alumni role;
    /// anything else answers `Alumni not found` without distinguishing
    /// absent from wrongly-roled targets.
    pub async fn send_request(
        &self,
        actor: &User,
        alumni: UserId,
        message: &str,
    ) -> Result<MentorshipView, Error> {
        require_verified(actor)?;
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::invalid_request("Message is required"));
        }

        let target = self
            .users
            .find_by_id(alumni)
            .await
            .map_err(map_user_error)?
            .filter(|user| user.role == Role::Alumni)
            .ok_or_else(|| Error::not_found("Alumni not found"))?;

        let request = MentorshipRequest::new(actor.id, alumni, message);
        self.requests
            .insert(&request)
            .await
            .map_err(map_mentorship_error)?;

        Ok(MentorshipView {
            id: request.id,
            student: request.student,
            student_name: actor.name.clone(),
            student_profile: actor.profile.clone(),
            alumni: request.alumni,
            alumni_name: target.name,
            message: request.message,
            status: request.status,
            created_at: request.created_at,
        })
    }

    /// The actor's side of the mentorship ledger, newest first.
    ///
    /// Alumni see their inbox, students their sent requests; no other role
    /// participates in mentorship.
    pub async fn list_requests(&self, actor: &User) -> Result<Vec<MentorshipView>, Error> {
        require_verified(actor)?;
        let requests = match actor.role {
            Role::Alumni => self.requests.list_by_alumni(actor.id).await,
            Role::Student => self.requests.list_by_student(actor.id).await,
            _ => return Err(Error::forbidden("Not authorized")),
        }
        .map_err(map_mentorship_error)?;

        let resolved = resolve_users(
            &self.users,
            requests
                .iter()
                .flat_map(|request| [request.student, request.alumni]),
        )
        .await?;
        Ok(requests
            .into_iter()
            .map(|request| MentorshipView::project(request, &resolved))
            .collect())
    }

    /// Accept or reject a pending request addressed to the actor.
    ///
    /// A request addressed to somebody else is indistinguishable from a
    /// missing one; a request already resolved answers `Conflict`.
    pub async fn respond(
        &self,
        actor: &User,
        id: RequestId,
        status: MentorshipStatus,
    ) -> Result<MentorshipView, Error> {
        require_verified(actor)?;
        if !status.is_terminal() {
            return Err(Error::invalid_request("Status must be Accepted or Rejected"));
        }

        let mut request = self
            .requests
            .find_by_id(id)
            .await
            .map_err(map_mentorship_error)?
            .filter(|request| request.alumni == actor.id)
            .ok_or_else(|| Error::not_found("Request not found or not authorized"))?;

        request
            .respond(status)
            .map_err(|_| Error::conflict("Request already resolved"))?;
        if !self
            .requests
            .set_status(id, status)
            .await
            .map_err(map_mentorship_error)?
        {
            return Err(Error::not_found("Request not found or not authorized"));
        }

        let resolved = resolve_users(&self.users, [request.student, request.alumni]).await?;
        Ok(MentorshipView::project(request, &resolved))
    }
}
