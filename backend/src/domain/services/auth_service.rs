//! Registration, login, and bearer-token authentication.

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::auth::Credentials;
use crate::domain::error::Error;
use crate::domain::ports::{
    PasswordHashError, PasswordHasher, TokenError, TokenService, UserRepository,
};
use crate::domain::user::{Profile, PublicUser, Role, User};

use super::map_user_error;

fn map_hash_error(error: PasswordHashError) -> Error {
    match error {
        PasswordHashError::Hash { message } => {
            Error::internal(format!("password hashing failed: {message}"))
        }
        PasswordHashError::InvalidHash { message } => {
            Error::internal(format!("stored password hash is invalid: {message}"))
        }
    }
}

fn map_issue_error(error: TokenError) -> Error {
    Error::internal(format!("token issuance failed: {error}"))
}

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub credentials: Credentials,
    pub role: Role,
    pub profile: Profile,
}

/// Authenticated session payload: the public user plus a signed bearer
/// token.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: PublicUser,
    pub token: String,
}

/// Identity service backing `/api/auth` and the bearer-token extractor.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    /// Create the service over its collaborating ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a new account and issue its first token.
    ///
    /// Duplicate emails are rejected with `Conflict`; the pre-insert lookup
    /// gives the common case a clean error and the adapter's uniqueness
    /// constraint closes the race.
    pub async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let name = registration.name.trim();
        if name.is_empty() {
            return Err(Error::invalid_request("Name is required"));
        }

        let credentials = registration.credentials;
        if self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(Error::conflict("User already exists"));
        }

        let password_hash = self
            .hasher
            .hash(credentials.password())
            .await
            .map_err(map_hash_error)?;
        let user = User::register(
            name,
            credentials.email(),
            password_hash,
            registration.role,
            registration.profile,
        );
        self.users.insert(&user).await.map_err(map_user_error)?;

        let token = self.tokens.issue(user.id).await.map_err(map_issue_error)?;
        Ok(AuthSession {
            user: PublicUser::from(user),
            token,
        })
    }

    /// Authenticate credentials and issue a token.
    ///
    /// Unknown emails and wrong passwords share one message so the response
    /// does not reveal which half failed.
    pub async fn login(&self, credentials: Credentials) -> Result<AuthSession, Error> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            return Err(Error::unauthorized("Invalid email or password"));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .await
            .map_err(map_hash_error)?;
        if !matches {
            return Err(Error::unauthorized("Invalid email or password"));
        }

        let token = self.tokens.issue(user.id).await.map_err(map_issue_error)?;
        Ok(AuthSession {
            user: PublicUser::from(user),
            token,
        })
    }

    /// Resolve a bearer token to its stored user.
    ///
    /// Malformed, expired, or foreign tokens and subjects that no longer
    /// resolve all collapse into one `Unauthorized` answer.
    pub async fn authenticate(&self, token: &str) -> Result<User, Error> {
        let user_id = self
            .tokens
            .verify(token)
            .await
            .map_err(|_| Error::unauthorized("Not authorized, token failed"))?;
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("Not authorized, token failed"))
    }
}
