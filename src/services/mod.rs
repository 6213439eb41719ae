pub mod category_service;

pub use category_service::{category_not_found, CategoryService, CATEGORY_NOT_FOUND};
