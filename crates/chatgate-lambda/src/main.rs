use std::env;

use tracing_subscriber::EnvFilter;

use chatgate_lambda::config::ProxyConfig;
use chatgate_lambda::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ProxyConfig::from_env();
    let http = reqwest::Client::builder().build()?;
    let state = AppState::from_config(&config, http);
    let app = chatgate_lambda::router(state);

    if env::var_os("AWS_LAMBDA_RUNTIME_API").is_some() {
        return lambda_http::run(app).await.map_err(|e| eyre::eyre!(e));
    }

    let listener = tokio::net::TcpListener::bind(&config.local_addr).await?;
    tracing::info!(addr = %config.local_addr, "serving locally");
    axum::serve(listener, app).await?;

    Ok(())
}
