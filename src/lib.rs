pub mod api;
pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod validation;

pub use app::{app, AppState};
pub use error::ApiError;
