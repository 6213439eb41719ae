// handlers/mod.rs - HTTP handlers
//
// Handlers only decode the request, call the service and wrap the result.
// They never catch failures: every error is returned with `?` and turned
// into a response by `ApiError`'s `IntoResponse` impl.
pub mod categories;
pub mod health;

pub use health::{health, method_not_allowed, not_found};
