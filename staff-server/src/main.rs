use staff_server::{AppState, Config, build_app, logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _log_guard = logger::init_logger(
        &config.log_level,
        config.log_json,
        config.log_dir.as_deref(),
    )?;

    tracing::info!(
        environment = %config.environment,
        database = %config.database_url,
        period_start_day = config.leave_policy.period_start_day,
        max_days_per_period = config.leave_policy.max_days_per_period,
        "Starting staff-server"
    );

    let state = AppState::new(&config)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {}", e.code, e.message))?;
    let app = build_app(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("staff-server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("staff-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
