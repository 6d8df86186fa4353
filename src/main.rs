//! Fleet calculator
//!
//! Covers a day's cargo weight with the available fleet, filling vehicle
//! classes in the order they are listed.
//!
//! Usage:
//!   cargo run --release --bin fleet_sizing -- [OPTIONS]
//!
//! Options:
//!   --weight <KG>                 Volume of the day in kg (default: 30000, 20000 with --quick)
//!   --fleet <PATH>                JSON fleet definition
//!   --class <NAME:COUNT:CAPACITY> Add or replace a vehicle class (repeatable)
//!   --quick                       Use the fixed average fleet, ignoring overrides
//!   --json                        Print the result as JSON
//!   --export <PATH>               Write the per-class table as CSV

use anyhow::{Context, Result};
use clap::Parser;
use fleet_sizing::allocation::AllocationResult;
use fleet_sizing::export::write_csv_file;
use fleet_sizing::fleet::{Fleet, VehicleClass};
use std::path::PathBuf;
use tracing::info;

/// Fleet calculator
#[derive(Parser, Debug)]
#[command(name = "fleet_sizing")]
#[command(about = "Estimate how many vehicles of each class a day's volume needs")]
struct Args {
    /// Volume of the day in kg [default: 30000, or 20000 with --quick]
    #[arg(long)]
    weight: Option<f64>,

    /// JSON fleet definition (default: built-in standard fleet)
    #[arg(long)]
    fleet: Option<PathBuf>,

    /// Vehicle class override as NAME:COUNT:CAPACITY
    #[arg(long = "class", value_name = "NAME:COUNT:CAPACITY")]
    classes: Vec<VehicleClass>,

    /// Use the fixed average fleet and the quick-estimate default volume
    #[arg(long)]
    quick: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Export the per-class table as CSV
    #[arg(long)]
    export: Option<PathBuf>,
}

const DEFAULT_WEIGHT: f64 = 30000.0;
const QUICK_DEFAULT_WEIGHT: f64 = 20000.0;

impl Args {
    fn weight(&self) -> f64 {
        match (self.weight, self.quick) {
            (Some(weight), _) => weight,
            (None, true) => QUICK_DEFAULT_WEIGHT,
            (None, false) => DEFAULT_WEIGHT,
        }
    }
}

fn print_result(fleet: &Fleet, result: &AllocationResult) {
    println!("\n{}", "=".repeat(60));
    println!("                 FLEET ALLOCATION");
    println!("{}\n", "=".repeat(60));

    println!("  Volume of the day:    {:>12.0} kg", result.requested);
    println!("  Fleet capacity:       {:>12.0} kg ({} vehicles)", fleet.total_capacity(), fleet.total_vehicles());
    println!();
    println!("  {:16} {:>8} {:>10} {:>12} {:>14}", "Vehicle", "Used", "Available", "Capacity", "Left after");
    println!("  {}", "-".repeat(64));
    for class in &result.classes {
        println!(
            "  {:16} {:>8} {:>10} {:>9.0} kg {:>11.0} kg",
            class.name, class.used, class.available, class.capacity, class.remaining_after
        );
    }
    println!("  {}", "-".repeat(64));
    println!("  Vehicles used:        {:>12}", result.vehicles_used());
    println!("  Idle capacity:        {:>12.0} kg", result.idle_capacity());
    println!();

    match result.shortfall() {
        Some(remainder) => println!("  WARNING: {:.0} kg left without a vehicle", remainder),
        None => println!("  Volume fully allocated"),
    }
    println!("\n{}", "=".repeat(60));
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let fleet = if args.quick {
        Fleet::standard()
    } else {
        let base = match &args.fleet {
            Some(path) => Fleet::from_json_file(path)
                .with_context(|| format!("loading fleet definition {:?}", path))?,
            None => Fleet::standard(),
        };
        base.with_overrides(&args.classes)
    };
    let weight = args.weight();
    info!("Allocating {} kg over {} vehicle classes", weight, fleet.classes.len());

    let result = fleet.allocate(weight)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&fleet, &result);
    }

    if let Some(path) = &args.export {
        write_csv_file(path, &result.classes).with_context(|| format!("writing {:?}", path))?;
    }

    Ok(())
}
