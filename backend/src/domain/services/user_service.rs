//! Profile access and the alumni directory.

use std::sync::Arc;

use crate::domain::error::Error;
use crate::domain::guard::require_verified;
use crate::domain::ports::UserRepository;
use crate::domain::user::{PublicUser, Role, User};

use super::map_user_error;

/// Partial profile update; `None` fields are preserved.
///
/// The alumni and student field groups only take effect for actors holding
/// the matching role; updates to the other group are silently ignored.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub profile_picture: Option<String>,
    pub graduation_year: Option<i32>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub major: Option<String>,
    pub expected_graduation_year: Option<i32>,
}

/// Profile service backing `/api/users`.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create the service over the user repository port.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// The actor's own record, read fresh so a verification flip performed
    /// after token issuance is visible immediately.
    ///
    /// Available to unverified accounts: the pending state must be
    /// observable.
    pub async fn profile(&self, actor: &User) -> Result<PublicUser, Error> {
        self.users
            .find_by_id(actor.id)
            .await
            .map_err(map_user_error)?
            .map(PublicUser::from)
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// Partially update the actor's own record. Also open to unverified
    /// accounts.
    pub async fn update_profile(
        &self,
        actor: &User,
        update: ProfileUpdate,
    ) -> Result<PublicUser, Error> {
        let mut user = self
            .users
            .find_by_id(actor.id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;

        if let Some(name) = update.name {
            let name = name.trim().to_owned();
            if name.is_empty() {
                return Err(Error::invalid_request("Name is required"));
            }
            user.name = name;
        }
        if let Some(headline) = update.headline {
            user.profile.headline = Some(headline);
        }
        if let Some(bio) = update.bio {
            user.profile.bio = Some(bio);
        }
        if let Some(location) = update.location {
            user.profile.location = Some(location);
        }
        if let Some(picture) = update.profile_picture {
            user.profile.profile_picture = Some(picture);
        }
        if user.role == Role::Alumni {
            if let Some(year) = update.graduation_year {
                user.profile.graduation_year = Some(year);
            }
            if let Some(company) = update.company {
                user.profile.company = Some(company);
            }
            if let Some(title) = update.job_title {
                user.profile.job_title = Some(title);
            }
        }
        if user.role == Role::Student {
            if let Some(major) = update.major {
                user.profile.major = Some(major);
            }
            if let Some(year) = update.expected_graduation_year {
                user.profile.expected_graduation_year = Some(year);
            }
        }

        self.users.update(&user).await.map_err(map_user_error)?;
        Ok(PublicUser::from(user))
    }

    /// The directory of verified alumni.
    pub async fn alumni_directory(&self, actor: &User) -> Result<Vec<PublicUser>, Error> {
        require_verified(actor)?;
        let alumni = self
            .users
            .list_verified_alumni()
            .await
            .map_err(map_user_error)?;
        Ok(alumni.into_iter().map(PublicUser::from).collect())
    }
}
