use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySqlPool};
use uuid::{Uuid, fmt::Hyphenated};

use super::{CommentStore, PostStore, StoreError};
use crate::models::{Comment, NewComment, Post};

// Ids are stored as CHAR(36), so rows decode through the hyphenated form.
#[derive(Debug, FromRow)]
struct PostRow {
    id: Hyphenated,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id.into_uuid(),
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            comments: None,
        }
    }
}

#[derive(Debug, FromRow)]
struct CommentRow {
    id: Hyphenated,
    parent_id: Option<Hyphenated>,
    post_id: Hyphenated,
    text: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id.into_uuid(),
            parent_id: row.parent_id.map(Hyphenated::into_uuid),
            post_id: row.post_id.into_uuid(),
            text: row.text,
            created_at: row.created_at,
        }
    }
}

/// Post and comment store backed by a MySQL pool.
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn insert_error(resource: &'static str, id: Uuid, error: sqlx::Error) -> StoreError {
    match &error {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            StoreError::Duplicate { resource, id }
        }
        _ => StoreError::Database(error),
    }
}

#[async_trait]
impl PostStore for MySqlStore {
    async fn create(&self, id: Uuid, title: &str, content: &str) -> Result<Post, StoreError> {
        sqlx::query("INSERT INTO posts (id, title, content) VALUES (?, ?, ?)")
            .bind(id.hyphenated())
            .bind(title)
            .bind(content)
            .execute(&self.pool)
            .await
            .map_err(|e| insert_error("post", id, e))?;

        PostStore::read_by_id(self, id).await
    }

    async fn read_by_id(&self, id: Uuid) -> Result<Post, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, title, content, created_at FROM posts WHERE id = ?",
        )
        .bind(id.hyphenated())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound { resource: "post", id })?;

        Ok(row.into())
    }

    async fn read_all(&self) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT id, title, content, created_at FROM posts ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn update(&self, id: Uuid, title: &str, content: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE posts SET title = ?, content = ? WHERE id = ?")
            .bind(title)
            .bind(content)
            .bind(id.hyphenated())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id.hyphenated())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl CommentStore for MySqlStore {
    async fn create(&self, comment: NewComment) -> Result<Comment, StoreError> {
        sqlx::query("INSERT INTO comments (id, parent_id, post_id, text) VALUES (?, ?, ?, ?)")
            .bind(comment.id.hyphenated())
            .bind(comment.parent_id.map(Uuid::hyphenated))
            .bind(comment.post_id.hyphenated())
            .bind(&comment.text)
            .execute(&self.pool)
            .await
            .map_err(|e| insert_error("comment", comment.id, e))?;

        CommentStore::read_by_id(self, comment.id).await
    }

    async fn read_by_id(&self, id: Uuid) -> Result<Comment, StoreError> {
        let row = sqlx::query_as::<_, CommentRow>(
            "SELECT id, parent_id, post_id, text, created_at FROM comments WHERE id = ?",
        )
        .bind(id.hyphenated())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound {
            resource: "comment",
            id,
        })?;

        Ok(row.into())
    }

    async fn read_parent_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, parent_id, post_id, text, created_at
            FROM comments
            WHERE post_id = ? AND parent_id IS NULL
            ORDER BY created_at ASC
            "#,
        )
        .bind(post_id.hyphenated())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn read_replies(&self, parent_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, parent_id, post_id, text, created_at
            FROM comments
            WHERE parent_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(parent_id.hyphenated())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db;

    // Run with: DATABASE_URL=mysql://... cargo test -- --ignored
    async fn connect() -> MySqlStore {
        let config = Config::from_env().expect("config");
        let pool = db::connect(&config).await.expect("database connection");
        MySqlStore::new(pool)
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn post_round_trip_and_silent_update() {
        let store = connect().await;
        let id = Uuid::new_v4();

        let created = PostStore::create(&store, id, "title", "content").await.unwrap();
        assert_eq!(created.id, id);

        let fetched = PostStore::read_by_id(&store, id).await.unwrap();
        assert_eq!(fetched.title, "title");
        assert_eq!(fetched.content, "content");

        PostStore::update(&store, Uuid::new_v4(), "x", "y").await.unwrap();

        let duplicate = PostStore::create(&store, id, "again", "again").await;
        assert!(matches!(duplicate, Err(StoreError::Duplicate { .. })));

        PostStore::delete(&store, id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn replies_are_not_parent_comments() {
        let store = connect().await;
        let post_id = Uuid::new_v4();
        PostStore::create(&store, post_id, "t", "c").await.unwrap();

        let parent = CommentStore::create(
            &store,
            NewComment {
                id: Uuid::new_v4(),
                parent_id: None,
                post_id,
                text: "parent".into(),
            },
        )
        .await
        .unwrap();
        let reply = CommentStore::create(
            &store,
            NewComment {
                id: Uuid::new_v4(),
                parent_id: Some(parent.id),
                post_id,
                text: "reply".into(),
            },
        )
        .await
        .unwrap();

        let parents = store.read_parent_comments(post_id).await.unwrap();
        assert_eq!(parents.iter().map(|c| c.id).collect::<Vec<_>>(), vec![parent.id]);

        let replies = store.read_replies(parent.id).await.unwrap();
        assert_eq!(replies.iter().map(|c| c.id).collect::<Vec<_>>(), vec![reply.id]);

        PostStore::delete(&store, post_id).await.unwrap();
        let orphan = CommentStore::read_by_id(&store, reply.id).await.unwrap();
        assert_eq!(orphan.post_id, post_id);
    }
}
