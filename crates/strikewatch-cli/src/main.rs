use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use strikewatch_arcgis::{BoundingBox, LinesClient};
use strikewatch_core::AppConfig;
use strikewatch_lightning::{ScanOrchestrator, ScanRequest, StrikeClient};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "strikewatch")]
#[command(about = "Lightning proximity scans for configured stations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan recent strikes around every configured station.
    Scan {
        /// Lookback window in minutes (defaults to `STRIKEWATCH_DEFAULT_MINUTES`).
        #[arg(long)]
        minutes: Option<u32>,
        /// Search radius in kilometres (defaults to `STRIKEWATCH_DEFAULT_RADIUS_KM`).
        #[arg(long)]
        radius_km: Option<f64>,
        /// Include intra-cloud strikes.
        #[arg(long)]
        include_ic: bool,
    },
    /// Fetch transmission lines inside a WGS84 bounding box.
    Lines {
        #[arg(long, allow_negative_numbers = true)]
        xmin: f64,
        #[arg(long, allow_negative_numbers = true)]
        ymin: f64,
        #[arg(long, allow_negative_numbers = true)]
        xmax: f64,
        #[arg(long, allow_negative_numbers = true)]
        ymax: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = strikewatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = match cli.command {
        Commands::Scan {
            minutes,
            radius_km,
            include_ic,
        } => run_scan(&config, minutes, radius_km, include_ic).await?,
        Commands::Lines {
            xmin,
            ymin,
            xmax,
            ymax,
        } => run_lines(&config, xmin, ymin, xmax, ymax).await?,
    };

    println!("{output}");
    Ok(())
}

async fn run_scan(
    config: &AppConfig,
    minutes: Option<u32>,
    radius_km: Option<f64>,
    include_ic: bool,
) -> anyhow::Result<String> {
    let stations = strikewatch_core::load_stations(&config.stations_path)
        .with_context(|| format!("loading {}", config.stations_path.display()))?
        .stations;

    let request = ScanRequest::new(
        minutes.unwrap_or(config.default_minutes),
        radius_km.unwrap_or(config.default_radius_km),
        include_ic,
    )?;

    let client = StrikeClient::with_base_url(
        config.provider_credentials.clone(),
        config.request_timeout_secs,
        &config.user_agent,
        &config.lightning_base_url,
    )?;
    let scanner = ScanOrchestrator::new(client, config.max_concurrent_queries);

    let result = scanner.scan(&request, &stations).await?;
    let failed = result.results.iter().filter(|r| r.error.is_some()).count();
    tracing::info!(
        stations = result.results.len(),
        failed,
        points = result.points.len(),
        "scan finished"
    );

    Ok(serde_json::to_string_pretty(&result)?)
}

async fn run_lines(
    config: &AppConfig,
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
) -> anyhow::Result<String> {
    let Some(query_url) = config.lines_query_url.as_deref() else {
        bail!("STRIKEWATCH_LINES_QUERY_URL is not set");
    };

    let bbox = BoundingBox::from_parts(Some(xmin), Some(ymin), Some(xmax), Some(ymax))?;
    let client = LinesClient::new(query_url, config.request_timeout_secs, &config.user_agent)?;
    let lines = client.fetch_lines(&bbox).await?;
    tracing::info!(features = lines.feature_count(), "lines fetched");

    Ok(serde_json::to_string_pretty(&lines)?)
}
