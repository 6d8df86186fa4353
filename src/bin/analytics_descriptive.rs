//! Descriptive Analytics - What did the fleet do?
//! Trip volume, distinct plates per month and vehicle type, daily load
//!
//! Run: ./target/release/analytics_descriptive --history trips.xlsx [section]
//! Sections: all, summary, monthly, types, daily

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use fleet_sizing::export::write_csv_file;
use fleet_sizing::stats::{daily_stats, plates_by_month, plates_by_type, DatasetSummary};
use fleet_sizing::trips::{load_trips, TripFilter, TripRecord};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "analytics_descriptive")]
#[command(about = "Descriptive reports over a trip history spreadsheet")]
struct Args {
    /// Trip history spreadsheet (.csv, .xlsx)
    #[arg(long)]
    history: PathBuf,

    /// First date to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last date to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Only these vehicle types (repeatable)
    #[arg(long = "vehicle-type")]
    vehicle_types: Vec<String>,

    /// Write every table of the section as CSV into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Report section: all, summary, monthly, types, daily
    #[arg(default_value = "all")]
    section: String,
}

fn print_section_header(title: &str) {
    println!("\n{}", "═".repeat(80));
    println!("  {}", title);
    println!("{}\n", "═".repeat(80));
}

fn print_subsection(title: &str) {
    println!("\n{}", title);
    println!("{}", "─".repeat(70));
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args = Args::parse();

    let dataset = load_trips(&args.history).with_context(|| format!("loading {:?}", args.history))?;
    let filter = TripFilter {
        from: args.from,
        to: args.to,
        vehicle_types: args.vehicle_types.clone(),
    };
    let records = filter.apply(&dataset.records);

    println!("\n{}", "█".repeat(80));
    println!("{}  DESCRIPTIVE ANALYTICS - What did the fleet do?  {}", "█".repeat(13), "█".repeat(14));
    println!("{}\n", "█".repeat(80));
    println!(
        "  Source: {:?} ({} rows read, {} kept, {} dropped)",
        args.history, dataset.report.rows, dataset.report.kept, dataset.report.dropped
    );

    match args.section.as_str() {
        "all" => {
            run_summary_section(&records);
            run_monthly_section(&records, &args)?;
            run_types_section(&records, &args)?;
            run_daily_section(&records, &args)?;
        }
        "summary" => run_summary_section(&records),
        "monthly" => run_monthly_section(&records, &args)?,
        "types" => run_types_section(&records, &args)?,
        "daily" => run_daily_section(&records, &args)?,
        other => bail!("Unknown section: {} (available: all, summary, monthly, types, daily)", other),
    }

    println!("\n{}", "█".repeat(80));
    Ok(())
}

fn export<T: serde::Serialize>(args: &Args, name: &str, rows: &[T]) -> Result<()> {
    if let Some(dir) = &args.export_dir {
        let path = dir.join(name);
        write_csv_file(&path, rows).with_context(|| format!("writing {:?}", path))?;
        println!("  -> exported {}", path.display());
    }
    Ok(())
}

fn run_summary_section(records: &[TripRecord]) {
    print_section_header("1. OVERVIEW");

    let summary = DatasetSummary::from_records(records);
    let date_or_dash = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());

    println!("  Trips:                {:>12}", summary.trips);
    println!("  Distinct plates:      {:>12}", summary.plates);
    println!("  Vehicle types:        {:>12}", summary.vehicle_types);
    println!("  Destinations:         {:>12}", summary.destinations);
    println!("  Active days:          {:>12}", summary.days);
    println!("  Total weight:         {:>12.0} kg", summary.total_weight);
    if let Some(avg) = summary.avg_daily_weight() {
        println!("  Avg weight per day:   {:>12.0} kg", avg);
    }
    println!("  First date:           {:>12}", date_or_dash(summary.first_date));
    println!("  Last date:            {:>12}", date_or_dash(summary.last_date));
}

fn run_monthly_section(records: &[TripRecord], args: &Args) -> Result<()> {
    print_section_header("2. DISTINCT PLATES BY MONTH");

    let counts = plates_by_month(records);

    // Pivot: one row per month, one column per vehicle type
    let mut types: Vec<&str> = counts.iter().map(|c| c.vehicle_type.as_str()).collect();
    types.sort();
    types.dedup();

    let mut pivot: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for c in &counts {
        let month = c.month.as_deref().unwrap_or("-");
        pivot.entry(month).or_default().insert(c.vehicle_type.as_str(), c.plates);
    }

    print!("  {:10}", "Month");
    for t in &types {
        print!(" {:>12}", t);
    }
    println!();
    println!("  {}", "─".repeat(10 + 13 * types.len()));
    for (month, row) in &pivot {
        print!("  {:10}", month);
        for t in &types {
            print!(" {:>12}", row.get(t).copied().unwrap_or(0));
        }
        println!();
    }

    export(args, "plates_by_month.csv", &counts)
}

fn run_types_section(records: &[TripRecord], args: &Args) -> Result<()> {
    print_section_header("3. VEHICLE TYPES");

    let counts = plates_by_type(records);
    let total: usize = counts.iter().map(|c| c.plates).sum();

    print_subsection("Distinct plates per vehicle type");
    println!("  {:20} {:>10} {:>10} {:>10}", "Vehicle type", "Plates", "Share", "Trips");
    println!("  {}", "─".repeat(54));
    for c in &counts {
        let trips = records.iter().filter(|r| r.vehicle_type == c.vehicle_type).count();
        let share = if total > 0 { c.plates as f64 / total as f64 * 100.0 } else { 0.0 };
        println!("  {:20} {:>10} {:>9.1}% {:>10}", c.vehicle_type, c.plates, share, trips);
    }

    export(args, "plates_by_type.csv", &counts)
}

fn run_daily_section(records: &[TripRecord], args: &Args) -> Result<()> {
    print_section_header("4. DAILY LOAD");

    let days = daily_stats(records);
    if days.is_empty() {
        println!("  No trips in the selected range");
        return Ok(());
    }

    let n = days.len() as f64;
    let avg_weight = days.iter().map(|d| d.weight).sum::<f64>() / n;
    let avg_deliveries = days.iter().map(|d| d.deliveries as f64).sum::<f64>() / n;
    let avg_destinations = days.iter().map(|d| d.destinations as f64).sum::<f64>() / n;

    print_subsection("Daily averages");
    println!("  Weight:               {:>12.0} kg", avg_weight);
    println!("  Deliveries:           {:>12.1}", avg_deliveries);
    println!("  Destinations:         {:>12.1}", avg_destinations);

    print_subsection("Busiest days (by weight)");
    let mut busiest = days.clone();
    busiest.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    println!("  {:12} {:>12} {:>12} {:>14}", "Date", "Weight", "Deliveries", "Destinations");
    println!("  {}", "─".repeat(54));
    for d in busiest.iter().take(10) {
        println!("  {:12} {:>12.0} {:>12} {:>14}", d.date.to_string(), d.weight, d.deliveries, d.destinations);
    }

    export(args, "daily_stats.csv", &days)
}
