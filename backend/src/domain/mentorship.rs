//! Mentorship request entity and its status machine.
//!
//! The status machine is deliberately small: `Pending` may move to
//! `Accepted` or `Rejected`, both terminal. A terminal request never
//! transitions again.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::UserId;

/// Stable mentorship request identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl From<Uuid> for RequestId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Lifecycle state of a mentorship request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MentorshipStatus {
    Pending,
    Accepted,
    Rejected,
}

impl MentorshipStatus {
    /// Whether this state admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, MentorshipStatus::Accepted | MentorshipStatus::Rejected)
    }
}

/// Error raised when responding to a request that is already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyResolved;

impl fmt::Display for AlreadyResolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request already resolved")
    }
}

impl std::error::Error for AlreadyResolved {}

/// Mentorship request from a student to an alumni.
///
/// ## Invariants
/// - `alumni` resolves to a user holding the Alumni role at creation time.
/// - `status` only leaves `Pending` once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorshipRequest {
    pub id: RequestId,
    pub student: UserId,
    pub alumni: UserId,
    pub message: String,
    pub status: MentorshipStatus,
    pub created_at: DateTime<Utc>,
}

impl MentorshipRequest {
    /// Build a new pending request.
    pub fn new(student: UserId, alumni: UserId, message: impl Into<String>) -> Self {
        Self {
            id: RequestId::random(),
            student,
            alumni,
            message: message.into(),
            status: MentorshipStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Transition the request to `status`, refusing if already resolved.
    pub fn respond(&mut self, status: MentorshipStatus) -> Result<(), AlreadyResolved> {
        if self.status.is_terminal() {
            return Err(AlreadyResolved);
        }
        self.status = status;
        Ok(())
    }
}
