//! Port abstraction for post persistence adapters, with an in-memory
//! implementation backing tests and dev mode.
//!
//! Like mutations and comment prepends are expressed as single-document set
//! operations so adapters can implement them atomically at the store.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::post::{Comment, Post, PostId};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established.
        Connection => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "post repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new post.
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError>;

    /// Fetch a post by identifier.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// All posts, newest first.
    async fn list(&self) -> Result<Vec<Post>, PostPersistenceError>;

    /// Posts authored by `author`, newest first.
    async fn list_by_author(&self, author: UserId) -> Result<Vec<Post>, PostPersistenceError>;

    /// Atomically add `user` to the like set. Returns `false` when the post
    /// is absent; adding an existing like is a no-op.
    async fn add_like(&self, id: PostId, user: UserId) -> Result<bool, PostPersistenceError>;

    /// Atomically remove `user` from the like set. Returns `false` when the
    /// post is absent.
    async fn remove_like(&self, id: PostId, user: UserId) -> Result<bool, PostPersistenceError>;

    /// Atomically prepend a comment. Returns `false` when the post is
    /// absent.
    async fn add_comment(
        &self,
        id: PostId,
        comment: &Comment,
    ) -> Result<bool, PostPersistenceError>;

    /// Delete a post. Returns `false` when the post is absent.
    async fn delete(&self, id: PostId) -> Result<bool, PostPersistenceError>;
}

/// In-memory post repository for tests and dev mode.
#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    posts: Mutex<Vec<Post>>,
}

impl InMemoryPostRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, Vec<Post>>, PostPersistenceError> {
        self.posts
            .lock()
            .map_err(|_| PostPersistenceError::query("post store lock poisoned"))
    }

    fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError> {
        self.guard()?.push(post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        Ok(self.guard()?.iter().find(|post| post.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Post>, PostPersistenceError> {
        Ok(Self::newest_first(self.guard()?.clone()))
    }

    async fn list_by_author(&self, author: UserId) -> Result<Vec<Post>, PostPersistenceError> {
        let posts = self
            .guard()?
            .iter()
            .filter(|post| post.author == author)
            .cloned()
            .collect();
        Ok(Self::newest_first(posts))
    }

    async fn add_like(&self, id: PostId, user: UserId) -> Result<bool, PostPersistenceError> {
        let mut posts = self.guard()?;
        match posts.iter_mut().find(|post| post.id == id) {
            Some(post) => {
                if !post.is_liked_by(user) {
                    post.likes.push(user);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_like(&self, id: PostId, user: UserId) -> Result<bool, PostPersistenceError> {
        let mut posts = self.guard()?;
        match posts.iter_mut().find(|post| post.id == id) {
            Some(post) => {
                post.likes.retain(|liker| *liker != user);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn add_comment(
        &self,
        id: PostId,
        comment: &Comment,
    ) -> Result<bool, PostPersistenceError> {
        let mut posts = self.guard()?;
        match posts.iter_mut().find(|post| post.id == id) {
            Some(post) => {
                post.comments.insert(0, comment.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: PostId) -> Result<bool, PostPersistenceError> {
        let mut posts = self.guard()?;
        let before = posts.len();
        posts.retain(|post| post.id != id);
        Ok(posts.len() < before)
    }
}
