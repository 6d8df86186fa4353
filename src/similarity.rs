//! Similar-day matching
//!
//! A historical day is "similar" to a reference when its total weight,
//! delivery count and distinct-destination count all fall inside a
//! multiplicative tolerance band around the reference. Membership is a hard
//! AND of the three range tests.

use crate::error::{FleetError, Result};
use crate::stats::{DailyStat, ReferenceStat};
use crate::trips::TripRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

pub const DEFAULT_TOLERANCE: f64 = 0.15;

/// Fractional tolerance, e.g. `0.15` for ±15%.
///
/// Zero gives an exact-match filter. Values of one or more are accepted and
/// produce a band whose lower bound is zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToleranceBand(f64);

impl ToleranceBand {
    pub fn new(fraction: f64) -> Result<Self> {
        if !fraction.is_finite() || fraction < 0.0 {
            return Err(FleetError::invalid(format!(
                "tolerance must be a non-negative fraction, got {}",
                fraction
            )));
        }
        Ok(Self(fraction))
    }

    pub fn fraction(&self) -> f64 {
        self.0
    }

    pub fn range(&self, value: f64) -> MetricRange {
        MetricRange {
            // value * (1 + t) rounds below the bound for t = 0.15
            min: value - value * self.0,
            max: value + value * self.0,
        }
    }
}

impl Default for ToleranceBand {
    fn default() -> Self {
        Self(DEFAULT_TOLERANCE)
    }
}

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// The three ranges derived from a reference and a tolerance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityBounds {
    pub weight: MetricRange,
    pub deliveries: MetricRange,
    pub destinations: MetricRange,
}

impl SimilarityBounds {
    pub fn new(reference: &ReferenceStat, tolerance: ToleranceBand) -> Self {
        Self {
            weight: tolerance.range(reference.weight),
            deliveries: tolerance.range(reference.deliveries),
            destinations: tolerance.range(reference.destinations),
        }
    }

    pub fn matches(&self, day: &DailyStat) -> bool {
        self.weight.contains(day.weight)
            && self.deliveries.contains(day.deliveries as f64)
            && self.destinations.contains(day.destinations as f64)
    }
}

/// Dates of every day whose three metrics lie within the tolerance band
pub fn find_similar_days(
    daily_stats: &[DailyStat],
    reference: &ReferenceStat,
    tolerance: ToleranceBand,
) -> BTreeSet<NaiveDate> {
    let bounds = SimilarityBounds::new(reference, tolerance);
    let matched: BTreeSet<NaiveDate> = daily_stats
        .iter()
        .filter(|day| bounds.matches(day))
        .map(|day| day.date)
        .collect();

    debug!(
        days = daily_stats.len(),
        matched = matched.len(),
        tolerance = tolerance.fraction(),
        "similar-day search"
    );
    matched
}

/// Raw records whose date is in `dates`
pub fn records_on_dates(records: &[TripRecord], dates: &BTreeSet<NaiveDate>) -> Vec<TripRecord> {
    records
        .iter()
        .filter(|r| dates.contains(&r.date))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::trip;

    fn day(date: &str, weight: f64, deliveries: usize, destinations: usize) -> DailyStat {
        DailyStat {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            weight,
            deliveries,
            destinations,
        }
    }

    fn reference() -> ReferenceStat {
        ReferenceStat::new(10000.0, 50.0, 20.0)
    }

    #[test]
    fn test_all_three_metrics_in_band() {
        let days = vec![day("2024-01-02", 9500.0, 48, 19), day("2024-01-03", 9500.0, 40, 19)];
        let matched = find_similar_days(&days, &reference(), ToleranceBand::new(0.15).unwrap());

        assert_eq!(matched.len(), 1);
        assert!(matched.contains(&days[0].date));
    }

    #[test]
    fn test_any_metric_out_of_band_excludes_day() {
        let tolerance = ToleranceBand::new(0.15).unwrap();
        let days = vec![
            day("2024-01-02", 12000.0, 50, 20),
            day("2024-01-03", 10000.0, 60, 20),
            day("2024-01-04", 10000.0, 50, 16),
        ];
        assert!(find_similar_days(&days, &reference(), tolerance).is_empty());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = SimilarityBounds::new(&ReferenceStat::new(1000.0, 40.0, 20.0), ToleranceBand::new(0.25).unwrap());
        assert_eq!(bounds.weight, MetricRange { min: 750.0, max: 1250.0 });
        assert!(bounds.matches(&day("2024-01-02", 750.0, 30, 15)));
        assert!(bounds.matches(&day("2024-01-02", 1250.0, 50, 25)));
        assert!(!bounds.matches(&day("2024-01-02", 1250.5, 50, 25)));
    }

    #[test]
    fn test_integer_counts_on_the_bound_match() {
        let bounds = SimilarityBounds::new(&ReferenceStat::new(200.0, 100.0, 20.0), ToleranceBand::new(0.15).unwrap());
        assert_eq!(bounds.deliveries, MetricRange { min: 85.0, max: 115.0 });
        assert_eq!(bounds.weight.max, 230.0);
        assert_eq!(bounds.destinations, MetricRange { min: 17.0, max: 23.0 });
        assert!(bounds.matches(&day("2024-01-02", 230.0, 115, 23)));
        assert!(bounds.matches(&day("2024-01-02", 170.0, 85, 17)));
        assert!(!bounds.matches(&day("2024-01-02", 230.0, 116, 23)));
    }

    #[test]
    fn test_zero_tolerance_is_exact_match() {
        let tolerance = ToleranceBand::new(0.0).unwrap();
        let days = vec![day("2024-01-02", 10000.0, 50, 20), day("2024-01-03", 10000.0, 51, 20)];
        let matched = find_similar_days(&days, &reference(), tolerance);
        assert_eq!(matched.len(), 1);
        assert!(matched.contains(&days[0].date));
    }

    #[test]
    fn test_wide_tolerance_is_degenerate_but_allowed() {
        let tolerance = ToleranceBand::new(1.5).unwrap();
        assert!(tolerance.range(100.0).min < 0.0);
        let days = vec![day("2024-01-02", 0.0, 0, 0), day("2024-01-03", 24000.0, 120, 49)];
        assert_eq!(find_similar_days(&days, &reference(), tolerance).len(), 2);
    }

    #[test]
    fn test_invalid_tolerance_rejected() {
        assert!(ToleranceBand::new(-0.1).unwrap_err().is_invalid_input());
        assert!(ToleranceBand::new(f64::NAN).is_err());
        assert_eq!(ToleranceBand::default().fraction(), DEFAULT_TOLERANCE);
    }

    #[test]
    fn test_empty_history() {
        assert!(find_similar_days(&[], &reference(), ToleranceBand::default()).is_empty());
    }

    #[test]
    fn test_matching_is_idempotent() {
        let days = vec![day("2024-01-02", 9500.0, 48, 19), day("2024-01-05", 10400.0, 55, 22)];
        let tolerance = ToleranceBand::default();
        assert_eq!(
            find_similar_days(&days, &reference(), tolerance),
            find_similar_days(&days, &reference(), tolerance)
        );
    }

    #[test]
    fn test_records_on_dates() {
        let records = vec![
            trip("2024-01-02", "VUC", "AAA1111", None, None),
            trip("2024-01-03", "VUC", "BBB2222", None, None),
        ];
        let dates: BTreeSet<NaiveDate> = [records[1].date].into_iter().collect();
        let selected = records_on_dates(&records, &dates);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].plate, "BBB2222");
    }
}
