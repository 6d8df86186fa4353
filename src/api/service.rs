//! Shared business logic for the dashboard API
//!
//! Holds the configured fleet and the two uploaded datasets. Every request
//! works on a snapshot of the datasets, so an upload never changes a result
//! that is already being computed.

use crate::allocation::{allocate, AllocationRequest, AllocationResult};
use crate::error::Result;
use crate::estimate::{estimate_from_matches, FleetEstimate};
use crate::fleet::{Fleet, VehicleClass};
use crate::similarity::{find_similar_days, SimilarityBounds, ToleranceBand};
use crate::stats::{daily_stats, plates_by_month, plates_by_type, DailyStat, DatasetSummary, PlateCount, ReferenceStat};
use crate::trips::{read_trips, IngestReport, TripDataset, TripFilter, TripRecord};
use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

// ============================================================================
// Data Structures
// ============================================================================

/// Which uploaded dataset an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    History,
    Current,
}

impl DatasetKind {
    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::History => "history",
            DatasetKind::Current => "current",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarDaysResult {
    pub reference: ReferenceStat,
    pub tolerance: f64,
    pub bounds: SimilarityBounds,
    pub history_days: usize,
    pub matched_dates: Vec<NaiveDate>,
    pub estimate: Option<FleetEstimate>,
}

// ============================================================================
// Dashboard Service
// ============================================================================

pub struct DashboardService {
    fleet: Fleet,
    tolerance: ToleranceBand,
    history: RwLock<Option<TripDataset>>,
    current: RwLock<Option<TripDataset>>,
}

impl DashboardService {
    pub fn new(fleet: Fleet, tolerance: ToleranceBand) -> Self {
        Self {
            fleet,
            tolerance,
            history: RwLock::new(None),
            current: RwLock::new(None),
        }
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn default_tolerance(&self) -> ToleranceBand {
        self.tolerance
    }

    fn slot(&self, kind: DatasetKind) -> &RwLock<Option<TripDataset>> {
        match kind {
            DatasetKind::History => &self.history,
            DatasetKind::Current => &self.current,
        }
    }

    pub async fn set_dataset(&self, kind: DatasetKind, dataset: TripDataset) -> IngestReport {
        let report = dataset.report.clone();
        info!("Replacing {} dataset: {} trips", kind.name(), report.kept);
        *self.slot(kind).write().await = Some(dataset);
        report
    }

    /// Parse an uploaded CSV body and replace the dataset with it
    pub async fn upload_csv(&self, kind: DatasetKind, body: &str) -> Result<IngestReport> {
        let dataset = read_trips(body.as_bytes())?;
        Ok(self.set_dataset(kind, dataset).await)
    }

    /// Snapshot of a dataset's records, `None` if it was never loaded
    pub async fn records(&self, kind: DatasetKind, filter: &TripFilter) -> Option<Vec<TripRecord>> {
        let guard = self.slot(kind).read().await;
        guard.as_ref().map(|d| filter.apply(&d.records))
    }

    /// Allocate `weight` over `classes`, or over the configured fleet
    pub fn allocate(&self, weight: f64, classes: Option<Vec<VehicleClass>>) -> Result<AllocationResult> {
        let classes = classes.unwrap_or_else(|| self.fleet.classes.clone());
        allocate(&AllocationRequest::new(weight, classes))
    }

    pub async fn summary(&self, kind: DatasetKind, filter: &TripFilter) -> Option<DatasetSummary> {
        let records = self.records(kind, filter).await?;
        Some(DatasetSummary::from_records(&records))
    }

    pub async fn daily_stats(&self, filter: &TripFilter) -> Option<Vec<DailyStat>> {
        let records = self.records(DatasetKind::History, filter).await?;
        Some(daily_stats(&records))
    }

    pub async fn plates_by_month(&self, filter: &TripFilter) -> Option<Vec<PlateCount>> {
        let records = self.records(DatasetKind::History, filter).await?;
        Some(plates_by_month(&records))
    }

    pub async fn plates_by_type(&self, filter: &TripFilter) -> Option<Vec<PlateCount>> {
        let records = self.records(DatasetKind::History, filter).await?;
        Some(plates_by_type(&records))
    }

    /// Reference computed from the whole current-volume dataset
    pub async fn current_reference(&self) -> Option<ReferenceStat> {
        let records = self.records(DatasetKind::Current, &TripFilter::default()).await?;
        Some(ReferenceStat::from_records(&records))
    }

    /// Similar historical days and the vehicle estimate built from them.
    /// `None` when the history dataset has not been loaded.
    pub async fn similar_days(
        &self,
        reference: ReferenceStat,
        tolerance: ToleranceBand,
        filter: &TripFilter,
    ) -> Option<SimilarDaysResult> {
        let history = self.records(DatasetKind::History, filter).await?;
        let days = daily_stats(&history);
        let matched = find_similar_days(&days, &reference, tolerance);
        let estimate = estimate_from_matches(&history, &matched);

        Some(SimilarDaysResult {
            reference,
            tolerance: tolerance.fraction(),
            bounds: SimilarityBounds::new(&reference, tolerance),
            history_days: days.len(),
            matched_dates: matched.into_iter().collect(),
            estimate,
        })
    }
}
