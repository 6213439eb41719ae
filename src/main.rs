use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use category_api::config::{self, AppConfig};
use category_api::database::DatabaseManager;
use category_api::{app, AppState};

#[derive(Debug, Parser)]
#[command(name = "category-api")]
#[command(about = "Category CRUD API server")]
#[command(version)]
struct Args {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Database URL (overrides DATABASE_URL)")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, API_KEY, etc.
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config = apply_args(config::config().clone(), args);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.api.log_filter)),
        )
        .init();

    config.validate().context("invalid configuration")?;
    tracing::info!("Starting Category API in {:?} mode", config.environment);

    let database = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open database")?;

    let router = app(AppState::new(database.pool().clone()), &config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Category API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    database.close().await;
    Ok(())
}

fn apply_args(mut config: AppConfig, args: Args) -> AppConfig {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    config
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
