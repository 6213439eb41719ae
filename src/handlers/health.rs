use axum::extract::State;
use serde::Serialize;

use crate::app::AppState;
use crate::database::manager::health_check;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// GET /health - Liveness plus a store ping. Not behind the API key gate.
pub async fn health(State(state): State<AppState>) -> ApiResult<Health> {
    health_check(&state.db).await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable("database unavailable")
    })?;

    Ok(ApiResponse::success(Health {
        status: "ok",
        database: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now(),
    }))
}

/// Fallback for paths no route matches
pub async fn not_found() -> ApiError {
    ApiError::not_found("route not found")
}

/// Fallback for a known path hit with a method it does not serve
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
