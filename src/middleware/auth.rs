use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "X-API-Key";

/// The secret every protected request must present
#[derive(Clone)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(secret: &str) -> Self {
        Self(Arc::from(secret))
    }

    /// Exact, case-sensitive comparison. An empty secret matches nothing.
    pub fn matches(&self, candidate: &str) -> bool {
        !self.0.is_empty() && *self.0 == *candidate
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// API key gate. Runs before any handler, so a rejected request never
/// touches the service layer or opens a transaction.
pub async fn api_key_middleware(
    State(expected): State<ApiKey>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|key| expected.matches(key));

    if !authorized {
        tracing::debug!(method = %request.method(), uri = %request.uri(), "rejecting request without valid API key");
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}
