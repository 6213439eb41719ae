// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::database::DatabaseError;
use crate::middleware::response::Envelope;
use crate::validation::Violation;

/// Every failure a request can produce. Handlers, services and repositories
/// all return `Result<_, ApiError>` and bubble failures up with `?`; the only
/// places that inspect the variant are the transaction guard (to roll back)
/// and the `IntoResponse` impl below (to pick the status code).
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("validation failed: {}", summarize(.0))]
    Validation(Vec<Violation>),

    // 401 Unauthorized
    #[error("missing or invalid API key")]
    Unauthorized,

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 405 Method Not Allowed
    #[error("method not allowed")]
    MethodNotAllowed,

    // 500 Internal Server Error
    #[error("transaction failed: {0}")]
    Transaction(#[from] sqlx::Error),

    // 500 Internal Server Error (malformed request body, unserializable response)
    #[error("encoding failed: {0}")]
    Encoding(String),

    // 503 Service Unavailable
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Transaction(_) | ApiError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// True for faults the client could not have caused or fixed.
    pub fn is_unhandled(&self) -> bool {
        self.status_code().is_server_error()
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        ApiError::Encoding(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Encoding(err.to_string())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Connection(_) => ApiError::service_unavailable("database unavailable"),
            DatabaseError::Schema(e) | DatabaseError::Sqlx(e) => ApiError::Transaction(e),
        }
    }
}

// Boundary translation: the one place a failure becomes a response
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        // Log the real cause, the client only ever sees code + status
        if self.is_unhandled() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else if matches!(self, ApiError::Unauthorized) {
            tracing::warn!(status = status.as_u16(), "request rejected: {}", self);
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        Envelope::failure(status).into_response()
    }
}
