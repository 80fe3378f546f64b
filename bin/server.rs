// DCA Compare - Web Server
// Calculator pages + JSON API with Axum

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use dca_compare::api::{router, AppState};
use dca_compare::telemetry::init_tracing;
use dca_compare::{AppConfig, CsvProvider, PriceProvider, ProviderKind, YahooConfig, YahooProvider};

fn build_provider(config: &AppConfig) -> Arc<dyn PriceProvider> {
    match config.provider {
        ProviderKind::Yahoo => Arc::new(YahooProvider::new(YahooConfig {
            base_url: config.yahoo_base_url.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
            user_agent: config.user_agent.clone(),
        })),
        ProviderKind::Csv => Arc::new(CsvProvider::new(&config.csv_dir)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1);
    let config = AppConfig::load(config_path.as_deref())?;

    init_tracing(&config.log_level, config.log_json)?;

    let provider = build_provider(&config);
    info!(
        provider = provider.name(),
        web_dir = %config.web_dir.display(),
        "💵 DCA Compare - Web Server"
    );

    let app = router(AppState::new(provider), &config.web_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "🚀 Server running");
    info!("   UI:  http://{}/calculator", config.bind_addr);
    info!("   API: POST http://{}/api/submit-dates", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
}
