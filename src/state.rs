use std::sync::Arc;

use crate::store::{CommentStore, PostStore};

/// Shared handler state: the two stores, usually backed by the same pool.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub comments: Arc<dyn CommentStore>,
}

impl AppState {
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: PostStore + CommentStore + 'static,
    {
        Self {
            posts: store.clone(),
            comments: store,
        }
    }
}
