use std::sync::Arc;

use sqlx::SqlitePool;

use crate::api::{CategoryCreateRequest, CategoryResponse, CategoryUpdateRequest};
use crate::database::{transactional, CategoryRepository, SqlCategoryRepository};
use crate::error::ApiError;
use crate::validation::Validate;

/// Message returned for every lookup of an absent category
pub const CATEGORY_NOT_FOUND: &str = "category is not found";

pub fn category_not_found() -> ApiError {
    ApiError::not_found(CATEGORY_NOT_FOUND)
}

/// Category use cases. Each operation validates first, then does all of its
/// store work inside a single transaction. A missing row is raised as
/// `NotFound` from inside that transaction so it rolls back like any other
/// failure.
#[derive(Clone)]
pub struct CategoryService {
    pool: SqlitePool,
    repository: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_repository(pool, Arc::new(SqlCategoryRepository))
    }

    pub fn with_repository(pool: SqlitePool, repository: Arc<dyn CategoryRepository>) -> Self {
        Self { pool, repository }
    }

    pub async fn create(&self, request: CategoryCreateRequest) -> Result<CategoryResponse, ApiError> {
        request.validate()?;

        let repository = Arc::clone(&self.repository);
        let category = transactional(&self.pool, move |conn| {
            Box::pin(async move { Ok(repository.save(conn, &request.name).await?) })
        })
        .await?;

        Ok(category.into())
    }

    pub async fn update(&self, request: CategoryUpdateRequest) -> Result<CategoryResponse, ApiError> {
        request.validate()?;

        let repository = Arc::clone(&self.repository);
        let category = transactional(&self.pool, move |conn| {
            Box::pin(async move {
                let mut category = repository
                    .find_by_id(&mut *conn, request.id)
                    .await?
                    .ok_or_else(category_not_found)?;

                category.name = request.name;
                Ok(repository.update(&mut *conn, category).await?)
            })
        })
        .await?;

        Ok(category.into())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let repository = Arc::clone(&self.repository);
        transactional(&self.pool, move |conn| {
            Box::pin(async move {
                let category = repository
                    .find_by_id(&mut *conn, id)
                    .await?
                    .ok_or_else(category_not_found)?;

                Ok(repository.delete(&mut *conn, &category).await?)
            })
        })
        .await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<CategoryResponse, ApiError> {
        let repository = Arc::clone(&self.repository);
        let category = transactional(&self.pool, move |conn| {
            Box::pin(async move {
                repository
                    .find_by_id(conn, id)
                    .await?
                    .ok_or_else(category_not_found)
            })
        })
        .await?;

        Ok(category.into())
    }

    pub async fn find_all(&self) -> Result<Vec<CategoryResponse>, ApiError> {
        let repository = Arc::clone(&self.repository);
        let categories = transactional(&self.pool, move |conn| {
            Box::pin(async move { Ok(repository.find_all(conn).await?) })
        })
        .await?;

        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }
}
