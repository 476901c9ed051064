use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{JsonBody, PostId};
use crate::models::PostInput;
use crate::state::AppState;

pub fn posts_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route(
            "/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
}

async fn create_post(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<PostInput>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .posts
        .create(Uuid::new_v4(), &input.title, &input.content)
        .await
        .map_err(ApiError::store("Failed to create post"))?;

    tracing::debug!(post_id = %post.id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state
        .posts
        .read_all()
        .await
        .map_err(ApiError::store("Failed to get posts"))?;

    Ok(Json(posts))
}

async fn get_post(
    State(state): State<AppState>,
    PostId(post_id): PostId,
) -> Result<impl IntoResponse, ApiError> {
    let mut post = state
        .posts
        .read_by_id(post_id)
        .await
        .map_err(ApiError::store("Failed to get post"))?;

    let comments = state
        .comments
        .read_parent_comments(post.id)
        .await
        .map_err(ApiError::store("Failed to get comments"))?;
    post.comments = Some(comments);

    Ok(Json(post))
}

// A missing id is not an error here: the update simply touches no rows.
async fn update_post(
    State(state): State<AppState>,
    PostId(post_id): PostId,
    JsonBody(input): JsonBody<PostInput>,
) -> Result<StatusCode, ApiError> {
    state
        .posts
        .update(post_id, &input.title, &input.content)
        .await
        .map_err(ApiError::store("Failed to update post"))?;

    Ok(StatusCode::OK)
}

async fn delete_post(
    State(state): State<AppState>,
    PostId(post_id): PostId,
) -> Result<StatusCode, ApiError> {
    state
        .posts
        .delete(post_id)
        .await
        .map_err(ApiError::store("Failed to delete post"))?;

    Ok(StatusCode::OK)
}
