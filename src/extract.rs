//! Request extractors that reject with [`ApiError`] instead of axum's
//! default plain-text rejections.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::{Deserialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::error::ApiError;

/// JSON body decoded regardless of `Content-Type`.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::InvalidBody)?;

        let value = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::debug!(error = %e, "rejecting request body");
            ApiError::InvalidBody
        })?;

        Ok(Self(value))
    }
}

#[derive(Deserialize)]
struct RawPostPath {
    id: String,
}

#[derive(Deserialize)]
struct RawCommentPath {
    id: String,
    parent_comment_id: String,
}

fn parse_id(raw: &str, field: &'static str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidId { field })
}

/// The `{id}` segment of `/api/posts/{id}/...`.
pub struct PostId(pub Uuid);

impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<RawPostPath> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InvalidId { field: "post" })?;

        Ok(Self(parse_id(&raw.id, "post")?))
    }
}

/// Both segments of `/api/posts/{id}/comments/{parent_comment_id}`.
pub struct ParentCommentPath {
    pub post_id: Uuid,
    pub parent_comment_id: Uuid,
}

impl<S> FromRequestParts<S> for ParentCommentPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<RawCommentPath> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InvalidId { field: "post" })?;

        Ok(Self {
            post_id: parse_id(&raw.id, "post")?,
            parent_comment_id: parse_id(&raw.parent_comment_id, "parent comment")?,
        })
    }
}
