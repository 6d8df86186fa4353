//! Synthetic trip history generator
//!
//! Builds a plausible delivery history for the standard fleet: every vehicle
//! gets a fixed plate, each working day a random share of the fleet goes out
//! and every vehicle drops a few loads in cities around São Paulo.
//!
//! Usage:
//!   cargo run --release --bin generate_synthetic -- [OPTIONS]
//!
//! Options:
//!   --days <N>           Calendar days to cover (default: 90)
//!   --start <DATE>       First day, YYYY-MM-DD (default: 2024-01-01)
//!   --utilization <F>    Mean share of the fleet out on a weekday (default: 0.7)
//!   --seed <N>           Random seed for reproducibility (optional)
//!   --output <PATH>      Output CSV path (default: data/synthetic_trips.csv)

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use clap::Parser;
use csv::WriterBuilder;
use fleet_sizing::fleet::Fleet;
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

const CITIES: &[&str] = &[
    "São Paulo",
    "Guarulhos",
    "Osasco",
    "Barueri",
    "Santo André",
    "São Bernardo do Campo",
    "Diadema",
    "Mauá",
    "Jundiaí",
    "Campinas",
    "Sorocaba",
    "Santos",
    "Mogi das Cruzes",
    "Cotia",
];

/// Synthetic trip history generator
#[derive(Parser, Debug)]
#[command(name = "generate_synthetic")]
#[command(about = "Generate a synthetic trip history for the standard fleet")]
struct Args {
    /// Calendar days to cover
    #[arg(long, default_value = "90")]
    days: u32,

    /// First day of the history
    #[arg(long, default_value = "2024-01-01")]
    start: NaiveDate,

    /// Mean share of the fleet dispatched on a weekday (0.0 - 1.0)
    #[arg(long, default_value = "0.7")]
    utilization: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output CSV path
    #[arg(long, default_value = "data/synthetic_trips.csv")]
    output: PathBuf,
}

/// Row layout of the operational spreadsheet export
#[derive(Debug, Serialize)]
struct TripRow {
    #[serde(rename = "data")]
    date: String,
    #[serde(rename = "tipo veiculo")]
    vehicle_type: String,
    #[serde(rename = "placa")]
    plate: String,
    #[serde(rename = "peso")]
    weight: String,
    #[serde(rename = "cidade")]
    city: String,
}

struct Vehicle {
    vehicle_type: String,
    plate: String,
    capacity: f64,
}

/// Mercosul-style plate, e.g. `ABC1D23`
fn generate_plate(rng: &mut impl Rng) -> String {
    "LLLDLDD"
        .chars()
        .map(|slot| match slot {
            'L' => (b'A' + rng.gen_range(0..26u8)) as char,
            _ => (b'0' + rng.gen_range(0..10u8)) as char,
        })
        .collect()
}

fn build_vehicles(fleet: &Fleet, rng: &mut impl Rng) -> Vec<Vehicle> {
    let mut vehicles = Vec::new();
    for class in &fleet.classes {
        for _ in 0..class.count {
            vehicles.push(Vehicle {
                vehicle_type: class.name.clone(),
                plate: generate_plate(rng),
                capacity: class.capacity,
            });
        }
    }
    vehicles
}

/// Brazilian decimal comma, as the spreadsheets come in
fn format_weight(weight: f64) -> String {
    format!("{:.1}", weight).replace('.', ",")
}

fn generate_day(date: NaiveDate, vehicles: &[Vehicle], utilization: f64, rng: &mut impl Rng) -> Vec<TripRow> {
    let share = match date.weekday() {
        Weekday::Sun => return Vec::new(),
        Weekday::Sat => utilization * 0.4,
        _ => (utilization + rng.gen_range(-0.15..0.15)).clamp(0.05, 1.0),
    };
    let out = ((vehicles.len() as f64 * share).round() as usize).max(1);

    let mut rows = Vec::new();
    for vehicle in vehicles.choose_multiple(rng, out) {
        let stops = rng.gen_range(1..=4);
        let load = vehicle.capacity * rng.gen_range(0.55..1.0);
        for _ in 0..stops {
            let city = CITIES.choose(rng).copied().unwrap_or("São Paulo");
            rows.push(TripRow {
                date: date.format("%d/%m/%Y").to_string(),
                vehicle_type: vehicle.vehicle_type.clone(),
                plate: vehicle.plate.clone(),
                weight: format_weight(load / stops as f64),
                city: city.to_string(),
            });
        }
    }
    rows
}

fn write_history<W: Write>(writer: W, args: &Args, rng: &mut impl Rng) -> Result<usize> {
    let vehicles = build_vehicles(&Fleet::standard(), rng);
    let mut writer = WriterBuilder::new().delimiter(b';').from_writer(writer);

    let mut written = 0;
    for offset in 0..args.days {
        let date = args.start + Duration::days(offset as i64);
        for row in generate_day(date, &vehicles, args.utilization, rng) {
            writer.serialize(&row)?;
            written += 1;
        }
    }
    writer.flush()?;
    Ok(written)
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Synthetic Trip Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Output:           {}", args.output.display());
    println!("Days:             {} from {}", args.days, args.start);
    println!("Utilization:      {:.0}%", args.utilization * 100.0);
    if let Some(seed) = args.seed {
        println!("Random seed:      {}", seed);
    }
    println!();

    let mut rng: StdRng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    let file = std::fs::File::create(&args.output).with_context(|| format!("creating {:?}", args.output))?;
    let written = write_history(file, &args, &mut rng)?;

    println!("Wrote {} trips to {}", written, args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_sizing::trips::read_trips;

    fn args(days: u32) -> Args {
        Args {
            days,
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            utilization: 0.7,
            seed: Some(7),
            output: PathBuf::from("unused.csv"),
        }
    }

    #[test]
    fn test_plate_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let plate = generate_plate(&mut rng);
        assert_eq!(plate.len(), 7);
        let chars: Vec<char> = plate.chars().collect();
        assert!(chars[..3].iter().all(|c| c.is_ascii_uppercase()));
        assert!(chars[3].is_ascii_digit());
        assert!(chars[4].is_ascii_uppercase());
        assert!(chars[5..].iter().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_output_reads_back() {
        let mut buf = Vec::new();
        let written = write_history(&mut buf, &args(14), &mut StdRng::seed_from_u64(7)).unwrap();
        assert!(written > 0);

        let dataset = read_trips(buf.as_slice()).unwrap();
        assert_eq!(dataset.report.kept, written);
        assert_eq!(dataset.report.missing_weight, 0);
        assert!(dataset.records.iter().all(|r| r.date.weekday() != Weekday::Sun));
        assert!(dataset.records.iter().all(|r| r.destination.is_some()));
    }

    #[test]
    fn test_seed_is_reproducible() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        write_history(&mut a, &args(7), &mut StdRng::seed_from_u64(3)).unwrap();
        write_history(&mut b, &args(7), &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_loads_stay_within_capacity() {
        let mut buf = Vec::new();
        write_history(&mut buf, &args(30), &mut StdRng::seed_from_u64(11)).unwrap();
        let dataset = read_trips(buf.as_slice()).unwrap();
        let fleet = Fleet::standard();

        let mut per_vehicle_day = std::collections::HashMap::new();
        for r in &dataset.records {
            *per_vehicle_day.entry((r.date, r.plate.clone(), r.vehicle_type.clone())).or_insert(0.0) += r.weight.unwrap();
        }
        for ((_, _, vehicle_type), load) in per_vehicle_day {
            let class = fleet.classes.iter().find(|c| c.name == vehicle_type).unwrap();
            assert!(load <= class.capacity + 1.0, "{} carried {}", vehicle_type, load);
        }
    }
}
