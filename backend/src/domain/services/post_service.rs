//! Post lifecycle: creation, feeds, like toggling, comments, and deletion.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::error::Error;
use crate::domain::guard::{require_owner_or_admin, require_role, require_verified};
use crate::domain::ports::{PostPersistenceError, PostRepository, UserRepository};
use crate::domain::post::{Comment, Post, PostId};
use crate::domain::user::{Profile, Role, User, UserId};

use super::{display_name, resolve_users};

fn map_post_error(error: PostPersistenceError) -> Error {
    match error {
        PostPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostPersistenceError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
    }
}

/// Post enriched with its author's display name and profile.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: PostId,
    pub author: UserId,
    pub author_name: String,
    pub author_profile: Profile,
    pub text: String,
    pub likes: Vec<UserId>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

impl PostView {
    fn project(post: Post, resolved: &HashMap<UserId, User>) -> Self {
        let author_name = display_name(resolved, post.author);
        let author_profile = resolved
            .get(&post.author)
            .map(|user| user.profile.clone())
            .unwrap_or_default();
        Self {
            id: post.id,
            author: post.author,
            author_name,
            author_profile,
            text: post.text,
            likes: post.likes,
            comments: post.comments,
            created_at: post.created_at,
        }
    }

    fn authored_by(post: Post, author: &User) -> Self {
        Self {
            id: post.id,
            author: post.author,
            author_name: author.name.clone(),
            author_profile: author.profile.clone(),
            text: post.text,
            likes: post.likes,
            comments: post.comments,
            created_at: post.created_at,
        }
    }
}

/// Feed service backing `/api/posts`.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    /// Create the service over its collaborating ports.
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    /// Publish a new post authored by the actor. Alumni only.
    pub async fn create(&self, actor: &User, text: &str) -> Result<PostView, Error> {
        require_verified(actor)?;
        require_role(actor, Role::Alumni)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::invalid_request("Post text is required"));
        }

        let post = Post::new(actor.id, text);
        self.posts.insert(&post).await.map_err(map_post_error)?;
        Ok(PostView::authored_by(post, actor))
    }

    /// The full feed, newest first, with author names resolved.
    pub async fn list(&self, actor: &User) -> Result<Vec<PostView>, Error> {
        require_verified(actor)?;
        let posts = self.posts.list().await.map_err(map_post_error)?;
        self.project_all(posts).await
    }

    /// One author's posts, newest first.
    pub async fn list_by_user(&self, actor: &User, author: UserId) -> Result<Vec<PostView>, Error> {
        require_verified(actor)?;
        let posts = self
            .posts
            .list_by_author(author)
            .await
            .map_err(map_post_error)?;
        self.project_all(posts).await
    }

    /// Toggle the actor's like and return the updated post.
    ///
    /// The branch is decided on a read, but the mutation itself is an atomic
    /// set add or remove at the store, so two racing toggles cannot lose
    /// each other's writes.
    pub async fn toggle_like(&self, actor: &User, id: PostId) -> Result<PostView, Error> {
        require_verified(actor)?;
        let mut post = self.find(id).await?;

        let applied = if post.is_liked_by(actor.id) {
            self.posts.remove_like(id, actor.id).await
        } else {
            self.posts.add_like(id, actor.id).await
        }
        .map_err(map_post_error)?;
        if !applied {
            return Err(Error::not_found("Post not found"));
        }

        post.toggle_like(actor.id);
        let resolved = resolve_users(&self.users, [post.author]).await?;
        Ok(PostView::project(post, &resolved))
    }

    /// Prepend a comment snapshotting the actor's display name.
    pub async fn add_comment(
        &self,
        actor: &User,
        id: PostId,
        text: &str,
    ) -> Result<PostView, Error> {
        require_verified(actor)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::invalid_request("Comment text is required"));
        }

        let mut post = self.find(id).await?;
        let comment = Comment {
            author: actor.id,
            name: actor.name.clone(),
            text: text.to_owned(),
            date: Utc::now(),
        };
        let applied = self
            .posts
            .add_comment(id, &comment)
            .await
            .map_err(map_post_error)?;
        if !applied {
            return Err(Error::not_found("Post not found"));
        }

        post.comments.insert(0, comment);
        let resolved = resolve_users(&self.users, [post.author]).await?;
        Ok(PostView::project(post, &resolved))
    }

    /// Delete a post. The author may always delete; an Institute Admin may
    /// delete any post.
    pub async fn delete(&self, actor: &User, id: PostId) -> Result<(), Error> {
        require_verified(actor)?;
        let post = self.find(id).await?;
        require_owner_or_admin(actor, post.author, "Not authorized")?;
        if !self.posts.delete(id).await.map_err(map_post_error)? {
            return Err(Error::not_found("Post not found"));
        }
        Ok(())
    }

    async fn find(&self, id: PostId) -> Result<Post, Error> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found("Post not found"))
    }

    async fn project_all(&self, posts: Vec<Post>) -> Result<Vec<PostView>, Error> {
        let resolved = resolve_users(&self.users, posts.iter().map(|post| post.author)).await?;
        Ok(posts
            .into_iter()
            .map(|post| PostView::project(post, &resolved))
            .collect())
    }
}
