#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use category_api::config::AppConfig;
use category_api::database::DatabaseManager;
use category_api::services::CategoryService;
use category_api::{app, AppState};

pub const API_KEY: &str = "RAHASIA";

pub fn test_config() -> AppConfig {
    AppConfig::in_memory(API_KEY)
}

/// Router over a fresh, private in-memory store
pub async fn test_app() -> Result<Router> {
    let config = test_config();
    let database = DatabaseManager::connect(&config.database).await?;
    Ok(app(AppState::new(database.pool().clone()), &config))
}

/// Router whose category service was built by the caller, e.g. with a
/// fault-injecting repository. Returns the pool so tests can inspect the store.
pub async fn test_app_with<F>(build: F) -> Result<(Router, sqlx::SqlitePool)>
where
    F: FnOnce(sqlx::SqlitePool) -> CategoryService,
{
    let config = test_config();
    let database = DatabaseManager::connect(&config.database).await?;
    let pool = database.pool().clone();
    let service = build(pool.clone());
    Ok((app(AppState::with_service(pool.clone(), service), &config), pool))
}

/// Drive one request through the router in-process
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    api_key: Option<&str>,
    body: Option<&str>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("X-API-Key", key);
    }
    let request = builder.body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))?;

    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let json = serde_json::from_slice(&bytes)
        .with_context(|| format!("response was not JSON: {}", String::from_utf8_lossy(&bytes)))?;
    Ok((status, json))
}

pub async fn get(router: &Router, uri: &str) -> Result<(StatusCode, Value)> {
    send(router, Method::GET, uri, Some(API_KEY), None).await
}

pub async fn post(router: &Router, uri: &str, body: &str) -> Result<(StatusCode, Value)> {
    send(router, Method::POST, uri, Some(API_KEY), Some(body)).await
}

pub async fn put(router: &Router, uri: &str, body: &str) -> Result<(StatusCode, Value)> {
    send(router, Method::PUT, uri, Some(API_KEY), Some(body)).await
}

pub async fn delete(router: &Router, uri: &str) -> Result<(StatusCode, Value)> {
    send(router, Method::DELETE, uri, Some(API_KEY), None).await
}

/// A real server on a loopback port, for tests that go over TCP
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let router = test_app().await?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self { port, base_url, handle };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
