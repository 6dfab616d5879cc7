//! Admin verification queue over user accounts.

use std::sync::Arc;

use crate::domain::error::Error;
use crate::domain::guard::require_role;
use crate::domain::ports::UserRepository;
use crate::domain::user::{PublicUser, Role, User, UserId};

use super::map_user_error;

/// Verification service backing `/api/admin`.
#[derive(Clone)]
pub struct AdminService {
    users: Arc<dyn UserRepository>,
}

impl AdminService {
    /// Create the service over the user repository port.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// The verification queue: unverified Students and Alumni.
    pub async fn list_unverified(&self, actor: &User) -> Result<Vec<PublicUser>, Error> {
        require_role(actor, Role::InstituteAdmin)?;
        let users = self
            .users
            .list_unverified()
            .await
            .map_err(map_user_error)?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    /// Mark an account verified and return its updated public view.
    ///
    /// The flip is unconditional; verifying an already-verified account is a
    /// no-op rather than an error.
    pub async fn verify(&self, actor: &User, user: UserId) -> Result<PublicUser, Error> {
        require_role(actor, Role::InstituteAdmin)?;
        if !self
            .users
            .set_verified(user)
            .await
            .map_err(map_user_error)?
        {
            return Err(Error::not_found("User not found"));
        }
        self.users
            .find_by_id(user)
            .await
            .map_err(map_user_error)?
            .map(PublicUser::from)
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::InMemoryUserRepository;
    use crate::domain::user::Profile;

    fn harness() -> (AdminService, Arc<InMemoryUserRepository>) {
        let users = Arc::new(InMemoryUserRepository::new());
        let service = AdminService::new(users.clone());
        (service, users)
    }

    async fn seeded(users: &InMemoryUserRepository, name: &str, role: Role, verified: bool) -> User {
        let mut user = User::register(
            name,
            format!("{}@example.edu", name.to_lowercase()),
            "$argon2id$fake",
            role,
            Profile::default(),
        );
        user.is_verified = verified;
        users.insert(&user).await.expect("seed user");
        user
    }

    #[tokio::test]
    async fn queue_access_is_admin_only() {
        let (service, users) = harness();
        let alumni = seeded(&users, "Ada", Role::Alumni, true).await;
        let admin = seeded(&users, "Root", Role::InstituteAdmin, true).await;

        let err = service
            .list_unverified(&alumni)
            .await
            .expect_err("alumni denied");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), "Not authorized as an Institute Admin");

        service
            .list_unverified(&admin)
            .await
            .expect("admin may read the queue");
    }

    #[tokio::test]
    async fn queue_lists_only_unverified_students_and_alumni() {
        let (service, users) = harness();
        let admin = seeded(&users, "Root", Role::InstituteAdmin, true).await;
        seeded(&users, "Sam", Role::Student, false).await;
        seeded(&users, "Ada", Role::Alumni, false).await;
        seeded(&users, "Prof", Role::Faculty, false).await;
        seeded(&users, "Vera", Role::Alumni, true).await;

        let queue = service.list_unverified(&admin).await.expect("queue");
        assert_eq!(queue.len(), 2);
        assert!(queue
            .iter()
            .all(|user| matches!(user.role, Role::Student | Role::Alumni)));
    }

    #[tokio::test]
    async fn verify_flips_the_flag_and_reports_missing_users() {
        let (service, users) = harness();
        let admin = seeded(&users, "Root", Role::InstituteAdmin, true).await;
        let pending = seeded(&users, "Sam", Role::Student, false).await;

        let verified = service
            .verify(&admin, pending.id)
            .await
            .expect("verification succeeds");
        assert!(verified.is_verified);

        // Re-verifying is a no-op, not an error.
        service
            .verify(&admin, pending.id)
            .await
            .expect("idempotent verify");

        let err = service
            .verify(&admin, UserId::random())
            .await
            .expect_err("missing user reported");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "User not found");
    }
}
