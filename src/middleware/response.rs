use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Uniform wire format for every response: `{code, status, data?}`.
/// `data` is only written on success; failures carry code and status alone.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub code: u16,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(status: StatusCode, data: T) -> Self {
        Self {
            code: status.as_u16(),
            status: status_phrase(status),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    pub fn failure(status: StatusCode) -> Self {
        Self {
            code: status.as_u16(),
            status: status_phrase(status),
            data: None,
        }
    }
}

/// Upper-cased canonical reason: 404 -> "NOT FOUND", 500 -> "INTERNAL SERVER ERROR"
pub fn status_phrase(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("UNKNOWN")
        .to_ascii_uppercase()
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match serde_json::to_vec(&self) {
            Ok(body) => (
                status,
                [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
                body,
            )
                .into_response(),
            Err(e) => {
                // Nothing has been written yet, so the failure can still be reported whole
                tracing::error!("Failed to serialize response envelope: {}", e);
                crate::error::ApiError::encoding(e.to_string()).into_response()
            }
        }
    }
}

/// Handler success value; always answered with 200 and the data wrapped in
/// the envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Envelope::success(StatusCode::OK, self.data).into_response()
    }
}

// Convenience type aliases
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
