//! Post aggregate: text, like set, and most-recent-first comments.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::UserId;

/// Stable post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct PostId(Uuid);

impl PostId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PostId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl From<Uuid> for PostId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Comment embedded in a post.
///
/// `name` is a snapshot of the author's display name at comment time, so
/// comment rendering does not require a user lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub author: UserId,
    pub name: String,
    pub text: String,
    pub date: DateTime<Utc>,
}

/// Post aggregate.
///
/// ## Invariants
/// - `likes` is duplicate-free; [`Post::toggle_like`] preserves set
///   semantics.
/// - `comments` is ordered most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub author: UserId,
    pub text: String,
    pub likes: Vec<UserId>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Build a new post with empty like and comment collections.
    pub fn new(author: UserId, text: impl Into<String>) -> Self {
        Self {
            id: PostId::random(),
            author,
            text: text.into(),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether `user` currently likes this post.
    pub fn is_liked_by(&self, user: UserId) -> bool {
        self.likes.contains(&user)
    }

    /// Toggle `user`'s like. Returns `true` when the post is now liked by
    /// `user`, `false` when the like was removed.
    pub fn toggle_like(&mut self, user: UserId) -> bool {
        if self.is_liked_by(user) {
            self.likes.retain(|id| *id != user);
            false
        } else {
            self.likes.push(user);
            true
        }
    }

    /// Prepend a comment so the newest appears first.
    pub fn add_comment(&mut self, author: UserId, name: impl Into<String>, text: impl Into<String>) {
        self.comments.insert(
            0,
            Comment {
                author,
                name: name.into(),
                text: text.into(),
                date: Utc::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn double_toggle_is_an_involution() {
        let mut post = Post::new(UserId::random(), "hello");
        let liker = UserId::random();

        assert!(post.toggle_like(liker));
        assert_eq!(post.likes, vec![liker]);

        assert!(!post.toggle_like(liker));
        assert!(post.likes.is_empty());
    }

    #[test]
    fn toggle_never_duplicates_a_like() {
        let mut post = Post::new(UserId::random(), "hello");
        let a = UserId::random();
        let b = UserId::random();

        post.toggle_like(a);
        post.toggle_like(b);
        post.toggle_like(a);
        post.toggle_like(a);

        assert_eq!(post.likes.iter().filter(|id| **id == a).count(), 1);
        assert_eq!(post.likes.iter().filter(|id| **id == b).count(), 1);
    }

    #[test]
    fn comments_are_most_recent_first() {
        let mut post = Post::new(UserId::random(), "hello");
        let commenter = UserId::random();

        post.add_comment(commenter, "Ada", "first");
        post.add_comment(commenter, "Ada", "second");

        assert_eq!(post.comments.len(), 2);
        assert_eq!(post.comments[0].text, "second");
        assert_eq!(post.comments[1].text, "first");
    }

    #[test]
    fn comment_snapshots_author_name() {
        let mut post = Post::new(UserId::random(), "hello");
        let commenter = UserId::random();
        post.add_comment(commenter, "Grace", "nice");
        assert_eq!(post.comments[0].name, "Grace");
        assert_eq!(post.comments[0].author, commenter);
    }
}
