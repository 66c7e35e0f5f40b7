use goldquote_server::{
    api::app_router, build_state, config::Config, init_tracing, scheduler, shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    // Cache is warm (or has at least been tried) before the listener binds
    let state = build_state(&config).await?;

    scheduler::start_quote_refresh_scheduler(state.clone(), config.refresh_interval);

    let router = app_router(state, &config);
    tracing::info!(
        addr = %config.listen_addr,
        refresh_interval_secs = config.refresh_interval.as_secs(),
        "Gold price server listening"
    );
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}
