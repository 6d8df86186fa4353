//! Vehicle-type estimate from similar historical days
//!
//! For the days matched by [`crate::similarity`], count the distinct plates
//! each vehicle type used across all of those days (not per day) and express
//! each type as a share of the total.

use crate::similarity::records_on_dates;
use crate::stats::plates_by_type;
use crate::trips::TripRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleEstimate {
    pub vehicle_type: String,
    pub plates: usize,
    /// Fraction of all distinct plates, 0..=1
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetEstimate {
    pub matched_days: usize,
    pub matched_trips: usize,
    pub total_plates: usize,
    pub vehicles: Vec<VehicleEstimate>,
}

impl FleetEstimate {
    pub fn plates_for(&self, vehicle_type: &str) -> Option<usize> {
        self.vehicles
            .iter()
            .find(|v| v.vehicle_type == vehicle_type)
            .map(|v| v.plates)
    }
}

/// Estimated plates per vehicle type over the matched days.
///
/// Returns `None` when no day matched, or the matched days hold no trips;
/// callers report "no estimate available" in that case.
pub fn estimate_from_matches(records: &[TripRecord], dates: &BTreeSet<NaiveDate>) -> Option<FleetEstimate> {
    if dates.is_empty() {
        return None;
    }
    let matched = records_on_dates(records, dates);
    if matched.is_empty() {
        return None;
    }

    let counts = plates_by_type(&matched);
    let total_plates: usize = counts.iter().map(|c| c.plates).sum();
    let vehicles = counts
        .into_iter()
        .map(|c| VehicleEstimate {
            share: c.plates as f64 / total_plates as f64,
            vehicle_type: c.vehicle_type,
            plates: c.plates,
        })
        .collect();

    Some(FleetEstimate {
        matched_days: dates.len(),
        matched_trips: matched.len(),
        total_plates,
        vehicles,
    })
}
