use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quill_api::config::Config;
use quill_api::{app, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!(
        environment = %config.environment(),
        "Starting Quill API server on port {}",
        config.port
    );

    tracing::info!("Connecting to store...");
    let store = Store::connect(config.database())
        .await
        .context("Failed to connect to store")?;
    tracing::info!(backend = store.backend_name(), "Store connection established");

    tracing::info!("Running database migrations...");
    store.migrate().await.context("Failed to run migrations")?;
    tracing::info!("Migrations completed successfully");

    let router = app(store, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    if config.graphql.playground {
        tracing::info!(
            "GraphQL Playground available at http://{}:{}/graphql",
            addr.ip(),
            addr.port()
        );
    }

    axum::serve(listener, router).await?;

    Ok(())
}
