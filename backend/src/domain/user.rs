//! User data model: roles, profile attributes, and the user aggregate.
//!
//! Serialisation contract: the stored password hash is never written to any
//! serialised form. Handlers return [`PublicUser`] views; the [`User`]
//! aggregate itself skips the hash when serialised as a defence in depth.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Closed set of account roles.
///
/// Authorization decisions match on this enum exhaustively; there is no
/// string comparison anywhere in the guard logic. The serialised names match
/// the wire contract consumed by existing clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Student,
    Alumni,
    Faculty,
    #[serde(rename = "Institute_Admin")]
    InstituteAdmin,
    Employer,
    #[serde(rename = "Super_Admin")]
    SuperAdmin,
}

impl Role {
    /// Human-readable label used in denial messages, with its article.
    pub fn denied_label(self) -> &'static str {
        match self {
            Role::Student => "a Student",
            Role::Alumni => "an Alumni",
            Role::Faculty => "a Faculty member",
            Role::InstituteAdmin => "an Institute Admin",
            Role::Employer => "an Employer",
            Role::SuperAdmin => "a Super Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Student => "Student",
            Role::Alumni => "Alumni",
            Role::Faculty => "Faculty",
            Role::InstituteAdmin => "Institute_Admin",
            Role::Employer => "Employer",
            Role::SuperAdmin => "Super_Admin",
        };
        f.write_str(name)
    }
}

/// Role-dependent profile attribute bag.
///
/// Common fields apply to every role; the alumni and student groups only
/// carry meaning for actors holding the matching role and are ignored on
/// update otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    /// Alumni: year of graduation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
    /// Alumni: current employer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Alumni: current job title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// Student: field of study.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    /// Student: expected graduation year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_graduation_year: Option<i32>,
}

/// Application user aggregate.
///
/// ## Invariants
/// - `email` is globally unique (enforced by the persistence adapter).
/// - `password_hash` never appears in serialised output.
/// - Accounts are created unverified and never hard-deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_verified: bool,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a freshly registered, unverified user.
    pub fn register(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
        profile: Profile,
    ) -> Self {
        Self {
            id: UserId::random(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            is_verified: false,
            profile,
            created_at: Utc::now(),
        }
    }
}

/// Serialisable user view with the credential material stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.edu")]
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            is_verified: user.is_verified,
            profile: user.profile.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_verified: user.is_verified,
            profile: user.profile,
            created_at: user.created_at,
        }
    }
}
