use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::store::StoreError;

/// Errors a handler can answer with.
///
/// Client mistakes map to 400. Every store failure, including a missing post,
/// maps to 500 with only a short message; the detail goes to the log.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request body")]
    InvalidBody,

    #[error("invalid {field} id")]
    InvalidId { field: &'static str },

    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// Wraps a store failure with the message the client will see.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { context, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            Self::InvalidBody => (StatusCode::BAD_REQUEST, "Invalid request body".to_string()),
            Self::InvalidId { field } => {
                (StatusCode::BAD_REQUEST, format!("Invalid {field} ID"))
            }
            Self::Store { context, source } => {
                tracing::error!(error = %source, "{context}");
                (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
