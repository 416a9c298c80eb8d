use crate::relay::RelayError;
use crate::store::StoreError;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Body sent for an oversized store request
pub const BODY_TOO_LONG: &str = "request body too long";

/// Body sent for an unknown store key
pub const NOT_FOUND_BODY: &str = "404 page not found";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Request body ran past the store limit while being read
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Request body could not be read to the end
    #[error("failed to read request body: {0}")]
    BodyRead(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Oversized payloads stay on 500 to match existing clients.
        let (status, message) = match self {
            ApiError::Relay(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error:\n{e}"),
            ),
            ApiError::Store(StoreError::PayloadTooLarge { .. }) | ApiError::BodyTooLarge { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, BODY_TOO_LONG.to_string())
            }
            ApiError::Store(StoreError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, NOT_FOUND_BODY.to_string())
            }
            ApiError::BodyRead(detail) => (
                StatusCode::BAD_REQUEST,
                format!("failed to read request body: {detail}"),
            ),
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
