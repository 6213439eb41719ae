pub mod auth;
pub mod response;

pub use auth::{api_key_middleware, ApiKey, API_KEY_HEADER};
pub use response::{ApiResponse, ApiResult, Envelope};
