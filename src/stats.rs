//! Descriptive statistics over trip records
//!
//! Per-day aggregates feed the similar-day matcher; distinct-plate counts and
//! the dataset summary back the monthly and vehicle-type reports.

use crate::trips::TripRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Aggregate of all trips on one date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub weight: f64,
    pub deliveries: usize,
    pub destinations: usize,
}

/// The day or period similar days are matched against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceStat {
    pub weight: f64,
    pub deliveries: f64,
    pub destinations: f64,
}

impl ReferenceStat {
    pub fn new(weight: f64, deliveries: f64, destinations: f64) -> Self {
        Self {
            weight,
            deliveries,
            destinations,
        }
    }

    /// Total weight, record count and distinct destinations of a dataset
    pub fn from_records(records: &[TripRecord]) -> Self {
        let weight = records.iter().filter_map(|r| r.weight).sum();
        let destinations = distinct_destinations(records.iter());
        Self::new(weight, records.len() as f64, destinations as f64)
    }
}

fn distinct_destinations<'a>(records: impl Iterator<Item = &'a TripRecord>) -> usize {
    records
        .filter_map(|r| r.destination.as_deref())
        .collect::<HashSet<_>>()
        .len()
}

/// Group records by date. One entry per distinct date, ascending.
pub fn daily_stats(records: &[TripRecord]) -> Vec<DailyStat> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&TripRecord>> = BTreeMap::new();
    for record in records {
        by_date.entry(record.date).or_default().push(record);
    }

    by_date
        .into_iter()
        .map(|(date, day)| DailyStat {
            date,
            weight: day.iter().filter_map(|r| r.weight).sum(),
            deliveries: day.len(),
            destinations: distinct_destinations(day.iter().copied()),
        })
        .collect()
}

/// Distinct plates for one vehicle type, optionally within one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlateCount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    pub vehicle_type: String,
    pub plates: usize,
}

fn count_plates<K: Ord>(records: &[TripRecord], key: impl Fn(&TripRecord) -> K) -> BTreeMap<K, HashSet<&str>> {
    let mut groups: BTreeMap<K, HashSet<&str>> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().insert(record.plate.as_str());
    }
    groups
}

/// Distinct plates per (`YYYY-MM`, vehicle type), ordered by month then type
pub fn plates_by_month(records: &[TripRecord]) -> Vec<PlateCount> {
    count_plates(records, |r| (r.date.format("%Y-%m").to_string(), r.vehicle_type.clone()))
        .into_iter()
        .map(|((month, vehicle_type), plates)| PlateCount {
            month: Some(month),
            vehicle_type,
            plates: plates.len(),
        })
        .collect()
}

/// Distinct plates per vehicle type over the whole record set, most plates first
pub fn plates_by_type(records: &[TripRecord]) -> Vec<PlateCount> {
    let mut counts: Vec<PlateCount> = count_plates(records, |r| r.vehicle_type.clone())
        .into_iter()
        .map(|(vehicle_type, plates)| PlateCount {
            month: None,
            vehicle_type,
            plates: plates.len(),
        })
        .collect();
    counts.sort_by(|a, b| b.plates.cmp(&a.plates).then_with(|| a.vehicle_type.cmp(&b.vehicle_type)));
    counts
}

/// Headline numbers for a record set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub trips: usize,
    pub plates: usize,
    pub vehicle_types: usize,
    pub destinations: usize,
    pub days: usize,
    pub total_weight: f64,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl DatasetSummary {
    pub fn from_records(records: &[TripRecord]) -> Self {
        let plates: HashSet<&str> = records.iter().map(|r| r.plate.as_str()).collect();
        let types: HashSet<&str> = records.iter().map(|r| r.vehicle_type.as_str()).collect();
        let days: HashSet<NaiveDate> = records.iter().map(|r| r.date).collect();

        Self {
            trips: records.len(),
            plates: plates.len(),
            vehicle_types: types.len(),
            destinations: distinct_destinations(records.iter()),
            days: days.len(),
            total_weight: records.iter().filter_map(|r| r.weight).sum(),
            first_date: days.iter().min().copied(),
            last_date: days.iter().max().copied(),
        }
    }

    /// Average weight moved per active day
    pub fn avg_daily_weight(&self) -> Option<f64> {
        (self.days > 0).then(|| self.total_weight / self.days as f64)
    }
}
