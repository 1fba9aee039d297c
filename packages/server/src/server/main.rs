// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use server_core::common::auth::AdminPolicy;
use server_core::domains::auth::TokenService;
use server_core::kernel::{ElasticAdapter, GithubAdapter, ServerDeps};
use server_core::server::build_app;
use server_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pinboard API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Document store client
    let store = Arc::new(elastic::ElasticClient::new(
        config.elasticsearch_url.clone(),
        config.elasticsearch_index.clone(),
    ));
    tracing::info!(
        url = %config.elasticsearch_url,
        index = %config.elasticsearch_index,
        "Document store configured"
    );

    // Identity provider client
    let provider = Arc::new(github::GithubClient::new(
        config.github_client_id.clone(),
        config.github_client_secret.clone(),
    ));

    if config.admin_subjects.is_empty() {
        tracing::warn!("ADMIN_SUBJECTS is empty; update and delete operations will refuse everyone");
    }

    let deps = ServerDeps::new(
        Arc::new(ElasticAdapter::new(store)),
        Arc::new(GithubAdapter::new(provider)),
        Arc::new(TokenService::new(&config.jwt_secret)),
        AdminPolicy::new(config.admin_subjects.clone()),
    );

    // Build application
    let app = build_app(deps);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
