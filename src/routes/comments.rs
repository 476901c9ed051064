use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{JsonBody, ParentCommentPath, PostId};
use crate::models::{Comment, CommentInput, NewComment};
use crate::state::AppState;

pub fn comments_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/comments",
            get(list_parent_comments).post(create_comment),
        )
        .route(
            "/{id}/comments/{parent_comment_id}",
            get(list_replies).post(create_reply),
        )
}

async fn create_comment(
    State(state): State<AppState>,
    PostId(post_id): PostId,
    JsonBody(input): JsonBody<CommentInput>,
) -> Result<impl IntoResponse, ApiError> {
    insert_comment(&state, post_id, None, input).await
}

// Replies are not checked against the parent's depth or post.
async fn create_reply(
    State(state): State<AppState>,
    path: ParentCommentPath,
    JsonBody(input): JsonBody<CommentInput>,
) -> Result<impl IntoResponse, ApiError> {
    insert_comment(&state, path.post_id, Some(path.parent_comment_id), input).await
}

async fn insert_comment(
    state: &AppState,
    post_id: Uuid,
    parent_id: Option<Uuid>,
    input: CommentInput,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state
        .comments
        .create(NewComment {
            id: Uuid::new_v4(),
            parent_id,
            post_id,
            text: input.text,
        })
        .await
        .map_err(ApiError::store("Failed to create comment"))?;

    tracing::debug!(comment_id = %comment.id, %post_id, ?parent_id, "comment created");
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn list_parent_comments(
    State(state): State<AppState>,
    PostId(post_id): PostId,
) -> Result<impl IntoResponse, ApiError> {
    let comments = state
        .comments
        .read_parent_comments(post_id)
        .await
        .map_err(ApiError::store("Failed to get parent comments"))?;

    Ok(Json(comments))
}

async fn list_replies(
    State(state): State<AppState>,
    path: ParentCommentPath,
) -> Result<impl IntoResponse, ApiError> {
    let replies = state
        .comments
        .read_replies(path.parent_comment_id)
        .await
        .map_err(ApiError::store("Failed to get replies for parent comment"))?;

    Ok(Json(replies))
}
