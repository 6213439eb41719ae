pub mod category;
pub mod json;

pub use category::{CategoryCreateRequest, CategoryId, CategoryResponse, CategoryUpdateRequest};
pub use json::{decode, parse_id, JsonBody};
