mod api;
mod middleware;

use std::sync::Arc;

use strikewatch_arcgis::LinesClient;
use strikewatch_lightning::{ScanOrchestrator, StrikeClient};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, ScanDefaults};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = strikewatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let stations = strikewatch_core::load_stations(&config.stations_path)?.stations;
    tracing::info!(
        env = %config.env,
        stations = stations.len(),
        path = %config.stations_path.display(),
        "stations loaded"
    );

    if config.provider_credentials.is_none() {
        tracing::warn!(
            "XWEATHER_CLIENT_ID / XWEATHER_CLIENT_SECRET not set; scans will fail with a configuration error"
        );
    }

    let strike_client = StrikeClient::with_base_url(
        config.provider_credentials.clone(),
        config.request_timeout_secs,
        &config.user_agent,
        &config.lightning_base_url,
    )?;
    let scanner = ScanOrchestrator::new(strike_client, config.max_concurrent_queries);

    let lines = config
        .lines_query_url
        .as_deref()
        .map(|url| LinesClient::new(url, config.request_timeout_secs, &config.user_agent))
        .transpose()?;
    if lines.is_none() {
        tracing::warn!("STRIKEWATCH_LINES_QUERY_URL not set; /api/lines is disabled");
    }

    let state = AppState {
        stations: Arc::new(stations),
        scanner,
        lines,
        defaults: ScanDefaults {
            minutes: config.default_minutes,
            radius_km: config.default_radius_km,
        },
    };
    let app = build_app(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
