//! HTTP-facing errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("cannot decode json: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("cannot read {0}")]
    MissingParam(&'static str),

    #[error("cannot parse {name}: {value:?}")]
    InvalidParam { name: &'static str, value: String },
}

impl ApiError {
    /// Every handler error is the caller's fault.
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
