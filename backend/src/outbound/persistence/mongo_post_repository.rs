//! MongoDB-backed `PostRepository` adapter.
//!
//! Like mutations use `$addToSet`/`$pull` and comment prepends use `$push`
//! with `$position: 0`, so concurrent writers never lose updates to the
//! same post.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::post::{Comment, Post, PostId};
use crate::domain::user::UserId;

use super::is_connection_error;

const COLLECTION: &str = "posts";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentDocument {
    author: UserId,
    name: String,
    text: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    date: DateTime<Utc>,
}

impl From<&Comment> for CommentDocument {
    fn from(comment: &Comment) -> Self {
        Self {
            author: comment.author,
            name: comment.name.clone(),
            text: comment.text.clone(),
            date: comment.date,
        }
    }
}

impl From<CommentDocument> for Comment {
    fn from(document: CommentDocument) -> Self {
        Self {
            author: document.author,
            name: document.name,
            text: document.text,
            date: document.date,
        }
    }
}

/// Stored form of the post aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostDocument {
    #[serde(rename = "_id")]
    id: PostId,
    author: UserId,
    text: String,
    likes: Vec<UserId>,
    comments: Vec<CommentDocument>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
}

impl From<&Post> for PostDocument {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            author: post.author,
            text: post.text.clone(),
            likes: post.likes.clone(),
            comments: post.comments.iter().map(CommentDocument::from).collect(),
            created_at: post.created_at,
        }
    }
}

impl From<PostDocument> for Post {
    fn from(document: PostDocument) -> Self {
        Self {
            id: document.id,
            author: document.author,
            text: document.text,
            likes: document.likes,
            comments: document.comments.into_iter().map(Comment::from).collect(),
            created_at: document.created_at,
        }
    }
}

fn map_post_error(error: mongodb::error::Error) -> PostPersistenceError {
    if is_connection_error(&error) {
        PostPersistenceError::connection(error.to_string())
    } else {
        PostPersistenceError::query(error.to_string())
    }
}

/// MongoDB-backed post repository.
#[derive(Clone)]
pub struct MongoPostRepository {
    collection: Collection<PostDocument>,
}

impl MongoPostRepository {
    /// Create a repository over the `posts` collection of `database`.
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }

    async fn collect_newest_first(
        &self,
        filter: mongodb::bson::Document,
    ) -> Result<Vec<Post>, PostPersistenceError> {
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .await
            .map_err(map_post_error)?;
        let documents: Vec<PostDocument> =
            cursor.try_collect().await.map_err(map_post_error)?;
        Ok(documents.into_iter().map(Post::from).collect())
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError> {
        self.collection
            .insert_one(PostDocument::from(post))
            .await
            .map_err(map_post_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        let document = self
            .collection
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_post_error)?;
        Ok(document.map(Post::from))
    }

    async fn list(&self) -> Result<Vec<Post>, PostPersistenceError> {
        self.collect_newest_first(doc! {}).await
    }

    async fn list_by_author(&self, author: UserId) -> Result<Vec<Post>, PostPersistenceError> {
        self.collect_newest_first(doc! { "author": author.to_string() })
            .await
    }

    async fn add_like(&self, id: PostId, user: UserId) -> Result<bool, PostPersistenceError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$addToSet": { "likes": user.to_string() } },
            )
            .await
            .map_err(map_post_error)?;
        Ok(result.matched_count > 0)
    }

    async fn remove_like(&self, id: PostId, user: UserId) -> Result<bool, PostPersistenceError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$pull": { "likes": user.to_string() } },
            )
            .await
            .map_err(map_post_error)?;
        Ok(result.matched_count > 0)
    }

    async fn add_comment(
        &self,
        id: PostId,
        comment: &Comment,
    ) -> Result<bool, PostPersistenceError> {
        let comment = mongodb::bson::to_bson(&CommentDocument::from(comment))
            .map_err(|err| PostPersistenceError::query(err.to_string()))?;
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$push": { "comments": { "$each": [comment], "$position": 0 } } },
            )
            .await
            .map_err(map_post_error)?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: PostId) -> Result<bool, PostPersistenceError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_post_error)?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the document conversions.
    use super::*;
    use mongodb::bson::{Bson, to_document};

    fn sample_post() -> Post {
        let mut post = Post::new(UserId::random(), "hello network");
        post.toggle_like(UserId::random());
        post.add_comment(UserId::random(), "Grace", "welcome");
        post.add_comment(UserId::random(), "Ada", "hello back");
        post
    }

    #[test]
    fn conversion_round_trips_likes_and_comment_order() {
        let post = sample_post();
        let restored = Post::from(PostDocument::from(&post));
        assert_eq!(restored, post);
        assert_eq!(restored.comments[0].name, "Ada");
        assert_eq!(restored.comments[1].name, "Grace");
    }

    #[test]
    fn document_stores_ids_as_strings() {
        let post = sample_post();
        let document = to_document(&PostDocument::from(&post)).expect("document serialises");

        assert_eq!(
            document.get("_id"),
            Some(&Bson::String(post.id.to_string()))
        );
        assert_eq!(
            document.get("author"),
            Some(&Bson::String(post.author.to_string()))
        );
        let likes = document.get_array("likes").expect("likes array");
        assert_eq!(likes.len(), 1);
        assert!(matches!(likes[0], Bson::String(_)));
    }

    #[test]
    fn comment_documents_carry_bson_dates() {
        let post = sample_post();
        let document = to_document(&PostDocument::from(&post)).expect("document serialises");
        let comments = document.get_array("comments").expect("comments array");
        let first = comments[0].as_document().expect("comment document");
        assert!(matches!(first.get("date"), Some(Bson::DateTime(_))));
    }
}
