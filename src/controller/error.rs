// API error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::counter::TallyError;
use crate::db::DbError;

/// Errors surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid label: {0:?}")]
    InvalidLabel(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("persistence failed: {0}")]
    Persistence(#[from] DbError),
}

impl From<TallyError> for ApiError {
    fn from(e: TallyError) -> Self {
        match e {
            TallyError::InvalidLabel(label) => ApiError::InvalidLabel(label),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidLabel { .. } | ApiError::InvalidParameter { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "success": false,
            "error": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}
