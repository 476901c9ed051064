use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    /// `None` for a top-level comment, the parent's id for a reply.
    pub parent_id: Option<Uuid>,
    pub post_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub post_id: Uuid,
    pub text: String,
}

/// Body of the comment creation endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentInput {
    #[serde(default)]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_comment_serializes_null_parent() {
        let comment = Comment {
            id: Uuid::new_v4(),
            parent_id: None,
            post_id: Uuid::new_v4(),
            text: "first".into(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&comment).unwrap();
        assert!(value["parent_id"].is_null());
        assert_eq!(value["text"], "first");
        assert!(comment.is_top_level());
    }

    #[test]
    fn comment_input_tolerates_missing_text() {
        let input: CommentInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.text, "");
    }
}
