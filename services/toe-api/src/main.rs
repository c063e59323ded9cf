//! GLM TOE tile service.
//!
//! Accepts batches of geolocated lightning-energy events, keeps a sliding
//! time window over them, and serves colorized Web-Mercator PNG tiles of
//! accumulated Total Optical Energy.

mod config;
mod server;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::Mutex;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use aggregator::ToeAggregator;
use config::ToeApiConfig;
use server::{IngestStats, ServerState};
use toe_common::ColorRamp;

#[derive(Parser, Debug)]
#[command(name = "toe-api")]
#[command(about = "GLM Total Optical Energy tile service")]
struct Args {
    /// HTTP listen port (overrides TOE_API_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Color ramp JSON file (overrides TOE_RAMP_FILE)
    #[arg(long)]
    ramp: Option<String>,

    /// Retention window in minutes (overrides TOE_WINDOW_MS)
    #[arg(long)]
    window_min: Option<u32>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting GLM TOE tile service");

    // Load configuration, CLI flags over environment
    let mut config = ToeApiConfig::from_env();
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(ramp) = &args.ramp {
        config.ramp_file = Some(ramp.into());
    }
    if let Some(minutes) = args.window_min {
        config.aggregator.window_ms = toe_common::time::minutes_to_ms(minutes);
    }
    config.validate()?;

    let ramp = match &config.ramp_file {
        Some(path) => {
            let ramp = ColorRamp::from_file(path)?;
            info!(path = %path.display(), stops = ramp.stops.len(), "Loaded color ramp");
            ramp
        }
        None => ColorRamp::default_toe(),
    };

    info!(
        window_ms = config.aggregator.window_ms,
        bin_meters = config.aggregator.bin_meters,
        "Loaded configuration"
    );

    let state = Arc::new(ServerState {
        aggregator: Mutex::new(ToeAggregator::new(config.aggregator.clone())),
        ramp,
        stats: IngestStats::default(),
    });

    server::start_server(state, config.port).await
}
