//! Error types for bucket operations
//!
//! Every bucket implementation reports failures through `BucketError`. The
//! caching layer passes these through untouched.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Bucket Error Enum ==
/// Unified error type for bucket operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BucketError {
    /// Object (or requested generation) does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Generation precondition did not hold
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// Request was malformed (empty name, bad token)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network, authorization or quota failure in the backing store
    #[error("Transport error: {0}")]
    Transport(String),
}

impl BucketError {
    /// Returns true for `NotFound`, the error idempotent-safe callers
    /// usually tolerate on delete.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BucketError::NotFound(_))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for BucketError {
    fn into_response(self) -> Response {
        let status = match &self {
            BucketError::NotFound(_) => StatusCode::NOT_FOUND,
            BucketError::PreconditionFailed(_) => StatusCode::PRECONDITION_FAILED,
            BucketError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            BucketError::Transport(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for bucket operations.
pub type Result<T> = std::result::Result<T, BucketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (BucketError::NotFound("a".into()), StatusCode::NOT_FOUND),
            (
                BucketError::PreconditionFailed("a".into()),
                StatusCode::PRECONDITION_FAILED,
            ),
            (BucketError::InvalidRequest("a".into()), StatusCode::BAD_REQUEST),
            (BucketError::Transport("a".into()), StatusCode::BAD_GATEWAY),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_is_not_found() {
        assert!(BucketError::NotFound("x".into()).is_not_found());
        assert!(!BucketError::Transport("x".into()).is_not_found());
    }
}
