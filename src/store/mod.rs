//! Data access for posts and comments.
//!
//! Handlers only see the [`PostStore`] and [`CommentStore`] traits; the
//! backing implementation is picked at startup from the database URL.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Comment, NewComment, Post};

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: Uuid },

    #[error("duplicate {resource} id '{id}'")]
    Duplicate { resource: &'static str, id: Uuid },
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create(&self, id: Uuid, title: &str, content: &str) -> Result<Post, StoreError>;

    async fn read_by_id(&self, id: Uuid) -> Result<Post, StoreError>;

    /// All posts, oldest first.
    async fn read_all(&self) -> Result<Vec<Post>, StoreError>;

    /// Full title/content replace. Succeeds even if no row matches.
    async fn update(&self, id: Uuid, title: &str, content: &str) -> Result<(), StoreError>;

    /// Succeeds even if no row matches. Comments of the post are left in place.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn create(&self, comment: NewComment) -> Result<Comment, StoreError>;

    async fn read_by_id(&self, id: Uuid) -> Result<Comment, StoreError>;

    /// Comments of `post_id` that have no parent.
    async fn read_parent_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, StoreError>;

    /// Direct replies to `parent_id`, whatever post they belong to.
    async fn read_replies(&self, parent_id: Uuid) -> Result<Vec<Comment>, StoreError>;
}
