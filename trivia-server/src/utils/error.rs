use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("the resource is not found")]
    NotFound,

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

/// Error body shape expected by the frontend:
/// `{"success": false, "error": <status>, "message": "..."}`.
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal details
        match &self {
            ApiError::Database(e) => error!(error = ?e, "Database error"),
            other => error!(error = ?other, "Request failed"),
        }

        // Only expose high-level message to the client
        let message = match &self {
            ApiError::Database(_) => "internal server error".to_string(),
            other => other.to_string(),
        };

        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_missing_input_is_a_bad_request() {
        let err = ApiError::Validation("searchTerm must not be empty".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn a_missing_resource_is_not_found_rather_than_a_server_error() {
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::NotFound.to_string(), "the resource is not found");
    }

    #[test]
    fn storage_failures_surface_as_internal_errors() {
        let err = ApiError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
