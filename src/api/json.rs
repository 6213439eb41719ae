use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON request body extractor. Unlike `axum::Json` it rejects with
/// [`ApiError`], so malformed bodies come back in the usual envelope.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::encoding(rejection.body_text()))?;

        decode(&bytes).map(JsonBody)
    }
}

/// Decode a JSON document into `T`
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Parse a numeric path id. Anything that is not an integer cannot name a row.
pub fn parse_id(raw: &str, not_found: impl FnOnce() -> ApiError) -> Result<i64, ApiError> {
    raw.trim().parse::<i64>().map_err(|_| not_found())
}
