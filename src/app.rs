use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers;
use crate::middleware::{api_key_middleware, ApiKey};
use crate::services::CategoryService;

/// Per-process dependencies shared (by clone) with every request
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub categories: CategoryService,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        let categories = CategoryService::new(db.clone());
        Self { db, categories }
    }

    pub fn with_service(db: SqlitePool, categories: CategoryService) -> Self {
        Self { db, categories }
    }
}

/// Build the full application router.
///
/// The API key gate wraps the category routes and the fallback, so unknown
/// paths are rejected before routing too. `/health` is added after the gate
/// and stays public.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let api_key = ApiKey::new(&config.security.api_key);

    let router = Router::new()
        .merge(category_routes())
        .fallback(handlers::not_found)
        .layer(from_fn_with_state(api_key, api_key_middleware))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config.security.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

fn category_routes() -> Router<AppState> {
    use handlers::categories;

    Router::new()
        .route(
            "/api/categories",
            get(categories::list)
                .post(categories::create)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/categories/:id",
            get(categories::show)
                .put(categories::update)
                .delete(categories::delete)
                .fallback(handlers::method_not_allowed),
        )
}
