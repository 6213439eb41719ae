use axum::extract::State;

use crate::api::{CategoryCreateRequest, CategoryId, CategoryResponse, CategoryUpdateRequest, JsonBody};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/categories - List all categories
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<CategoryResponse>> {
    let categories = state.categories.find_all().await?;
    Ok(ApiResponse::success(categories))
}

/// GET /api/categories/:id - Show a single category
pub async fn show(State(state): State<AppState>, CategoryId(id): CategoryId) -> ApiResult<CategoryResponse> {
    let category = state.categories.find_by_id(id).await?;
    Ok(ApiResponse::success(category))
}

/// POST /api/categories - Create a category
pub async fn create(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CategoryCreateRequest>,
) -> ApiResult<CategoryResponse> {
    let category = state.categories.create(request).await?;
    Ok(ApiResponse::success(category))
}

/// PUT /api/categories/:id - Rename a category
pub async fn update(
    State(state): State<AppState>,
    CategoryId(id): CategoryId,
    JsonBody(request): JsonBody<CategoryUpdateRequest>,
) -> ApiResult<CategoryResponse> {
    let category = state.categories.update(request.with_id(id)).await?;
    Ok(ApiResponse::success(category))
}

/// DELETE /api/categories/:id - Delete a category; `data` is null on success
pub async fn delete(State(state): State<AppState>, CategoryId(id): CategoryId) -> ApiResult<()> {
    state.categories.delete(id).await?;
    Ok(ApiResponse::success(()))
}
