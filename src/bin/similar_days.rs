//! Similar-day lookup
//!
//! Finds historical days whose weight, delivery count and destination count
//! all sit within a tolerance of today's volume, then estimates the plates
//! needed per vehicle type from those days.
//!
//! Usage:
//!   cargo run --release --bin similar_days -- --history trips.xlsx --current today.csv
//!   cargo run --release --bin similar_days -- --history trips.csv \
//!       --weight 10000 --deliveries 50 --destinations 20 --tolerance 0.15

use anyhow::{bail, Context, Result};
use clap::Parser;
use fleet_sizing::estimate::estimate_from_matches;
use fleet_sizing::export::write_csv_file;
use fleet_sizing::similarity::{find_similar_days, SimilarityBounds, ToleranceBand, DEFAULT_TOLERANCE};
use fleet_sizing::stats::{daily_stats, DailyStat, ReferenceStat};
use fleet_sizing::trips::load_trips;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "similar_days")]
#[command(about = "Find historical days similar to the current volume")]
struct Args {
    /// Trip history spreadsheet
    #[arg(long)]
    history: PathBuf,

    /// Current-volume spreadsheet the reference is computed from
    #[arg(long, conflicts_with_all = ["weight", "deliveries", "destinations"])]
    current: Option<PathBuf>,

    /// Reference total weight (kg)
    #[arg(long, requires_all = ["deliveries", "destinations"])]
    weight: Option<f64>,

    /// Reference delivery count
    #[arg(long, requires_all = ["weight", "destinations"])]
    deliveries: Option<f64>,

    /// Reference distinct-destination count
    #[arg(long, requires_all = ["weight", "deliveries"])]
    destinations: Option<f64>,

    /// Fractional tolerance applied to each metric
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Export the matched days as CSV
    #[arg(long)]
    export: Option<PathBuf>,

    /// Export the vehicle estimate as CSV
    #[arg(long)]
    export_estimate: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let tolerance = ToleranceBand::new(args.tolerance)?;

    let reference = match (&args.current, args.weight, args.deliveries, args.destinations) {
        (Some(path), _, _, _) => {
            let current = load_trips(path).with_context(|| format!("loading {:?}", path))?;
            ReferenceStat::from_records(&current.records)
        }
        (None, Some(w), Some(d), Some(c)) => ReferenceStat::new(w, d, c),
        _ => bail!("give either --current or all of --weight, --deliveries and --destinations"),
    };

    let history = load_trips(&args.history).with_context(|| format!("loading {:?}", args.history))?;
    let days = daily_stats(&history.records);
    info!("History covers {} days", days.len());

    let matched = find_similar_days(&days, &reference, tolerance);
    let bounds = SimilarityBounds::new(&reference, tolerance);

    println!("\n{}", "=".repeat(60));
    println!("                 SIMILAR DAYS");
    println!("{}\n", "=".repeat(60));
    println!("  Tolerance:            {:>11.1}%", tolerance.fraction() * 100.0);
    println!("  {:14} {:>12} {:>14} {:>14}", "Metric", "Reference", "Min", "Max");
    println!("  {}", "-".repeat(56));
    println!("  {:14} {:>12.0} {:>14.1} {:>14.1}", "Weight (kg)", reference.weight, bounds.weight.min, bounds.weight.max);
    println!("  {:14} {:>12.0} {:>14.1} {:>14.1}", "Deliveries", reference.deliveries, bounds.deliveries.min, bounds.deliveries.max);
    println!("  {:14} {:>12.0} {:>14.1} {:>14.1}", "Destinations", reference.destinations, bounds.destinations.min, bounds.destinations.max);

    let matched_days: Vec<DailyStat> = days.into_iter().filter(|d| matched.contains(&d.date)).collect();
    println!("\n  Matched {} day(s)", matched_days.len());
    for d in &matched_days {
        println!("    {}  {:>10.0} kg {:>6} deliveries {:>5} destinations", d.date, d.weight, d.deliveries, d.destinations);
    }

    let estimate = estimate_from_matches(&history.records, &matched);
    match &estimate {
        Some(estimate) => {
            println!("\n  Estimated plates by vehicle type ({} trips on matched days)", estimate.matched_trips);
            println!("  {:20} {:>10} {:>10}", "Vehicle type", "Plates", "Share");
            println!("  {}", "-".repeat(42));
            for v in &estimate.vehicles {
                println!("  {:20} {:>10} {:>9.1}%", v.vehicle_type, v.plates, v.share * 100.0);
            }
            println!("  {:20} {:>10}", "Total", estimate.total_plates);
        }
        None => println!("\n  No similar days found - no estimate available"),
    }
    println!("\n{}", "=".repeat(60));

    if let Some(path) = &args.export {
        write_csv_file(path, &matched_days).with_context(|| format!("writing {:?}", path))?;
    }
    if let (Some(path), Some(estimate)) = (&args.export_estimate, &estimate) {
        write_csv_file(path, &estimate.vehicles).with_context(|| format!("writing {:?}", path))?;
    }

    Ok(())
}
