use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::{Deserialize, Serialize};

use crate::api::json::parse_id;
use crate::database::models::Category;
use crate::error::ApiError;
use crate::services::category_not_found;
use crate::validation::{check_length, Validate, Violation};

pub const NAME_MIN_LENGTH: usize = 1;
pub const NAME_MAX_LENGTH: usize = 200;

/// Body of `POST /api/categories`. A missing `name` decodes as empty and is
/// then reported by validation, not by the decoder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryCreateRequest {
    #[serde(default)]
    pub name: String,
}

/// Body of `PUT /api/categories/:id`; `id` always comes from the path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdateRequest {
    #[serde(skip_deserializing)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl CategoryUpdateRequest {
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}

/// The `:id` path segment. A segment that does not decode, or is not an
/// integer, cannot name a row and is rejected as a missing category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for CategoryId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!("undecodable category id: {}", rejection.body_text());
                category_not_found()
            })?;

        parse_id(&raw, category_not_found).map(CategoryId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

impl Validate for CategoryCreateRequest {
    fn violations(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        check_length("name", &self.name, NAME_MIN_LENGTH, NAME_MAX_LENGTH, &mut out);
        out
    }
}

impl Validate for CategoryUpdateRequest {
    fn violations(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        check_length("name", &self.name, NAME_MIN_LENGTH, NAME_MAX_LENGTH, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::validation::Rule;

    #[test]
    fn missing_name_is_a_validation_failure() {
        let request: CategoryCreateRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.violations(), vec![Violation::new("name", Rule::Required)]);
        assert!(matches!(request.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn update_ignores_body_id() {
        let request: CategoryUpdateRequest =
            serde_json::from_str(r#"{"id": 99, "name": "T SHIRT"}"#).unwrap();
        let request = request.with_id(1);
        assert_eq!(request.id, 1);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn update_enforces_max_length() {
        let request = CategoryUpdateRequest {
            id: 1,
            name: "x".repeat(NAME_MAX_LENGTH + 1),
        };
        assert_eq!(
            request.violations(),
            vec![Violation::new("name", Rule::MaxLength(NAME_MAX_LENGTH))]
        );
    }

    #[test]
    fn response_serializes_id_and_name() {
        let response = CategoryResponse::from(Category { id: 1, name: "Gadget".into() });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"id": 1, "name": "Gadget"})
        );
    }
}
