//! MongoDB-backed `UserRepository` adapter.
//!
//! Email uniqueness is enforced by a unique index created through
//! [`MongoUserRepository::ensure_indexes`]; a duplicate-key write error maps
//! to [`UserPersistenceError::DuplicateEmail`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::user::{Profile, Role, User, UserId};

use super::{is_connection_error, is_duplicate_key};

const COLLECTION: &str = "users";

/// Stored form of the user aggregate.
///
/// Unlike the domain type this serialises the password hash, which never
/// leaves the adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    #[serde(rename = "_id")]
    id: UserId,
    name: String,
    email: String,
    password_hash: String,
    role: Role,
    is_verified: bool,
    profile: Profile,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            is_verified: user.is_verified,
            profile: user.profile.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<UserDocument> for User {
    fn from(document: UserDocument) -> Self {
        Self {
            id: document.id,
            name: document.name,
            email: document.email,
            password_hash: document.password_hash,
            role: document.role,
            is_verified: document.is_verified,
            profile: document.profile,
            created_at: document.created_at,
        }
    }
}

fn map_user_error(error: mongodb::error::Error) -> UserPersistenceError {
    if is_connection_error(&error) {
        UserPersistenceError::connection(error.to_string())
    } else {
        UserPersistenceError::query(error.to_string())
    }
}

/// MongoDB-backed user repository.
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Create a repository over the `users` collection of `database`.
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }

    /// Create the unique email index. Called once at startup; creating an
    /// index that already exists is a no-op at the server.
    pub async fn ensure_indexes(&self) -> Result<(), UserPersistenceError> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection
            .create_index(index)
            .await
            .map_err(map_user_error)?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.collection
            .insert_one(UserDocument::from(user))
            .await
            .map_err(|error| {
                if is_duplicate_key(&error) {
                    UserPersistenceError::duplicate_email(user.email.clone())
                } else {
                    map_user_error(error)
                }
            })?;
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let document = self
            .collection
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_user_error)?;
        Ok(document.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let document = self
            .collection
            .find_one(doc! { "email": email })
            .await
            .map_err(map_user_error)?;
        Ok(document.map(User::from))
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let result = self
            .collection
            .replace_one(doc! { "_id": user.id.to_string() }, UserDocument::from(user))
            .await
            .map_err(map_user_error)?;
        if result.matched_count == 0 {
            return Err(UserPersistenceError::query(format!(
                "user {} not found for update",
                user.id
            )));
        }
        Ok(())
    }

    async fn set_verified(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$set": { "isVerified": true } },
            )
            .await
            .map_err(map_user_error)?;
        Ok(result.matched_count > 0)
    }

    async fn list_unverified(&self) -> Result<Vec<User>, UserPersistenceError> {
        let cursor = self
            .collection
            .find(doc! {
                "isVerified": false,
                "role": { "$in": ["Student", "Alumni"] },
            })
            .await
            .map_err(map_user_error)?;
        let documents: Vec<UserDocument> =
            cursor.try_collect().await.map_err(map_user_error)?;
        Ok(documents.into_iter().map(User::from).collect())
    }

    async fn list_verified_alumni(&self) -> Result<Vec<User>, UserPersistenceError> {
        let cursor = self
            .collection
            .find(doc! { "isVerified": true, "role": "Alumni" })
            .await
            .map_err(map_user_error)?;
        let documents: Vec<UserDocument> =
            cursor.try_collect().await.map_err(map_user_error)?;
        Ok(documents.into_iter().map(User::from).collect())
    }
}
