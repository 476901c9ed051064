use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CommentStore, PostStore, StoreError};
use crate::models::{Comment, NewComment, Post};

/// In-process store with the same semantics as the MySQL tables: no foreign
/// keys, silent update/delete, and primary key uniqueness.
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: RwLock<HashMap<Uuid, Post>>,
    comments: RwLock<HashMap<Uuid, Comment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn oldest_first<T>(mut items: Vec<T>, key: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    items.sort_by_key(|item| key(item));
    items
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create(&self, id: Uuid, title: &str, content: &str) -> Result<Post, StoreError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&id) {
            return Err(StoreError::Duplicate { resource: "post", id });
        }

        let post = Post {
            id,
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            comments: None,
        };
        posts.insert(id, post.clone());
        Ok(post)
    }

    async fn read_by_id(&self, id: Uuid) -> Result<Post, StoreError> {
        self.posts
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { resource: "post", id })
    }

    async fn read_all(&self) -> Result<Vec<Post>, StoreError> {
        let posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        Ok(oldest_first(posts, |p| p.created_at))
    }

    async fn update(&self, id: Uuid, title: &str, content: &str) -> Result<(), StoreError> {
        if let Some(post) = self.posts.write().await.get_mut(&id) {
            post.title = title.to_string();
            post.content = content.to_string();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.posts.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn create(&self, new: NewComment) -> Result<Comment, StoreError> {
        let mut comments = self.comments.write().await;
        if comments.contains_key(&new.id) {
            return Err(StoreError::Duplicate {
                resource: "comment",
                id: new.id,
            });
        }

        let comment = Comment {
            id: new.id,
            parent_id: new.parent_id,
            post_id: new.post_id,
            text: new.text,
            created_at: Utc::now(),
        };
        comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn read_by_id(&self, id: Uuid) -> Result<Comment, StoreError> {
        self.comments
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                resource: "comment",
                id,
            })
    }

    async fn read_parent_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        let matching: Vec<Comment> = self
            .comments
            .read()
            .await
            .values()
            .filter(|c| c.post_id == post_id && c.is_top_level())
            .cloned()
            .collect();
        Ok(oldest_first(matching, |c| c.created_at))
    }

    async fn read_replies(&self, parent_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        let matching: Vec<Comment> = self
            .comments
            .read()
            .await
            .values()
            .filter(|c| c.parent_id == Some(parent_id))
            .cloned()
            .collect();
        Ok(oldest_first(matching, |c| c.created_at))
    }
}
