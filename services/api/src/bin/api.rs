//! services/api/src/bin/api.rs

use api_lib::{
    actions::Actions,
    adapters::GeminiAdapter,
    config::Config,
    error::ApiError,
    web::{create_router, AppState},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tutor_core::flows::usage_history::StaticUsageHistory;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let model = Arc::new(GeminiAdapter::new(
        config.gemini_api_key.clone(),
        config.gemini_api_base.clone(),
        config.request_timeout,
    )?);
    info!(
        api_base = %config.gemini_api_base,
        timeout_secs = config.request_timeout.as_secs(),
        "Gemini adapter ready."
    );
    let usage = Arc::new(StaticUsageHistory);

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        actions: Actions::new(model, usage),
        config: config.clone(),
    });

    // --- 4. Create the Web Router ---
    let app = create_router(app_state)?;

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

/// Resolves on Ctrl+C. If the handler cannot be installed the server runs until killed.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}
