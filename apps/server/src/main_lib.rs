use std::sync::Arc;

use crate::config::Config;
use goldquote_core::quotes::QuoteCacheService;
use goldquote_market_data::{PriceSource, YahooChartProvider};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub quote_cache: Arc<QuoteCacheService>,
}

impl AppState {
    pub fn new(quote_cache: Arc<QuoteCacheService>) -> Arc<Self> {
        Arc::new(Self { quote_cache })
    }
}

pub fn init_tracing() {
    let fmt_layer = fmt::layer().json().with_current_span(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Build the shared state and populate the quote cache once.
///
/// Returns only after the initial refresh has finished, successful or not.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    tracing::info!(url = %config.upstream_url, "Using upstream price source");
    let source: Arc<dyn PriceSource> = Arc::new(YahooChartProvider::new(
        config.upstream_url.clone(),
        config.upstream_timeout,
    ));
    let quote_cache = Arc::new(QuoteCacheService::new(source, config.cache_config()));

    if quote_cache.initialize().await.is_none() {
        tracing::warn!("Initial quote fetch failed, serving 503 until the next refresh succeeds");
    }

    Ok(AppState::new(quote_cache))
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("SIGINT received, shutting down"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
