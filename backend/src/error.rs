//! Errors returned by the API handlers and their HTTP mapping.
//!
//! Every error, extractor rejections included, is answered with a JSON body
//! of the form `{"error": "..."}`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Lookup by id missed. Carries the resource name, e.g. `"Event"`.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A query filter that cannot be read as the type it filters on.
    #[error("invalid {name} filter: {value:?}")]
    InvalidFilter { name: &'static str, value: String },

    /// Stored data that a read path cannot interpret.
    #[error("malformed {field} on event {id}: {reason}")]
    MalformedRecord {
        id: u64,
        field: &'static str,
        reason: String,
    },

    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),

    #[error("{}", .0.body_text())]
    Path(#[from] PathRejection),
}

impl ApiError {
    pub fn malformed(id: u64, field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            id,
            field,
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidFilter { .. } | Self::MalformedRecord { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Body(rejection) => rejection.status(),
            Self::Path(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
