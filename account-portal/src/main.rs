use account_core::observability::{init_tracing, install_prometheus_recorder, shutdown_tracing};
use account_portal::config::get_configuration;
use account_portal::services::AccountClient;
use account_portal::startup::build_router;
use account_portal::AppState;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "account-portal",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )?;

    let metrics_handle = install_prometheus_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))?;

    let account_client = AccountClient::new(configuration.account_api.clone())
        .map_err(|e| anyhow::anyhow!("Failed to build account API client: {}", e))?;
    info!(
        account_api = %account_client.base_url(),
        mode = ?configuration.signup.mode,
        "Account API client ready"
    );

    let state = AppState::new(Arc::new(account_client), &configuration.signup)
        .with_metrics(metrics_handle);
    let app = build_router(state);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting account-portal on {}", address);
    let served = axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    });

    shutdown_tracing();
    served
}
