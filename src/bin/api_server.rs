//! REST API server for the fleet dashboard
//!
//! Usage:
//!   ./target/release/api_server [options]
//!
//! Options:
//!   --port PORT        Port to listen on (default: FLEET_API_PORT or 8080)
//!   --fleet PATH       JSON fleet definition (default: FLEET_CONFIG or built-in)
//!   --history PATH     Trip history loaded at startup (default: FLEET_HISTORY)
//!   --current PATH     Current-volume file loaded at startup (default: FLEET_CURRENT)
//!
//! REST endpoints:
//!   GET  /api/v1/health              - Health check
//!   GET  /api/v1/fleet               - Configured fleet
//!   POST /api/v1/allocate            - Allocate a weight over the fleet
//!   PUT  /api/v1/datasets/history    - Replace the trip history (CSV body)
//!   PUT  /api/v1/datasets/current    - Replace the current volume (CSV body)
//!   GET  /api/v1/summary             - Trip history headline numbers
//!   GET  /api/v1/stats/daily         - Per-day aggregates (?format=csv)
//!   GET  /api/v1/plates/monthly      - Distinct plates per month/type (?format=csv)
//!   GET  /api/v1/plates/types        - Distinct plates per type (?format=csv)
//!   GET  /api/v1/similar             - Similar days and vehicle estimate

use anyhow::{Context, Result};
use clap::Parser;
use fleet_sizing::api::{router, DashboardService, DatasetKind};
use fleet_sizing::config::AppConfig;
use fleet_sizing::trips::load_trips;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "api_server")]
struct Args {
    #[arg(long)]
    port: Option<u16>,

    #[arg(long)]
    fleet: Option<PathBuf>,

    #[arg(long)]
    history: Option<PathBuf>,

    #[arg(long)]
    current: Option<PathBuf>,
}

fn print_banner(port: u16, config: &AppConfig) {
    println!("============================================================");
    println!("              FLEET SIZING DASHBOARD API");
    println!("============================================================");
    println!();
    println!("  Port:       {}", port);
    println!("  REST:       http://localhost:{}/api/v1/", port);
    println!("  Tolerance:  {:.0}%", config.tolerance.fraction() * 100.0);
    println!();
    println!("REST Endpoints:");
    println!("  GET  /api/v1/health             Health check");
    println!("  GET  /api/v1/fleet              Configured fleet");
    println!("  POST /api/v1/allocate           Allocate weight");
    println!("  PUT  /api/v1/datasets/history   Upload trip history");
    println!("  PUT  /api/v1/datasets/current   Upload current volume");
    println!("  GET  /api/v1/summary            History summary");
    println!("  GET  /api/v1/stats/daily        Daily aggregates");
    println!("  GET  /api/v1/plates/monthly     Plates per month");
    println!("  GET  /api/v1/plates/types       Plates per type");
    println!("  GET  /api/v1/similar            Similar days");
    println!();
    println!("============================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let args = Args::parse();

    // Command line wins over environment
    let mut config = AppConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    config.fleet_path = args.fleet.or(config.fleet_path);
    config.history_path = args.history.or(config.history_path);
    config.current_path = args.current.or(config.current_path);

    let fleet = config.load_fleet().context("loading fleet definition")?;
    let service = Arc::new(DashboardService::new(fleet, config.tolerance));

    for (kind, path) in [
        (DatasetKind::History, &config.history_path),
        (DatasetKind::Current, &config.current_path),
    ] {
        if let Some(path) = path {
            let dataset = load_trips(path).with_context(|| format!("loading {:?}", path))?;
            service.set_dataset(kind, dataset).await;
        }
    }

    print_banner(config.port, &config);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let app = router(service);
    tracing::info!("Starting REST server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
