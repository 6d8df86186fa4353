//! REST API handlers for the fleet dashboard
//!
//! These handlers use the shared DashboardService.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::service::{DashboardService, DatasetKind, SimilarDaysResult};
use crate::allocation::AllocationResult;
use crate::error::FleetError;
use crate::export::to_csv_string;
use crate::fleet::{Fleet, VehicleClass};
use crate::similarity::ToleranceBand;
use crate::stats::{DailyStat, DatasetSummary, PlateCount, ReferenceStat};
use crate::trips::{IngestReport, TripFilter};

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct AllocateRequest {
    pub weight: f64,
    pub classes: Option<Vec<VehicleClass>>,
}

#[derive(Serialize)]
pub struct AllocateResponse {
    #[serde(flatten)]
    pub result: AllocationResult,
    pub fully_covered: bool,
    pub vehicles_used: u64,
    pub idle_capacity: f64,
}

impl From<AllocationResult> for AllocateResponse {
    fn from(result: AllocationResult) -> Self {
        Self {
            fully_covered: result.is_fully_covered(),
            vehicles_used: result.vehicles_used(),
            idle_capacity: result.idle_capacity(),
            result,
        }
    }
}

#[derive(Serialize)]
pub struct FleetResponse {
    pub classes: Vec<VehicleClass>,
    pub total_vehicles: u64,
    pub total_capacity: f64,
    pub default_tolerance: f64,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: message.into() }))
}

fn not_loaded(kind: DatasetKind) -> ApiError {
    error(
        StatusCode::NOT_FOUND,
        format!("No {} dataset loaded. PUT a CSV to /api/v1/datasets/{}", kind.name(), kind.name()),
    )
}

impl From<FleetError> for (StatusCode, Json<ErrorResponse>) {
    fn from(e: FleetError) -> Self {
        let status = match e {
            FleetError::Io(_) | FleetError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        error(status, e.to_string())
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Deserialize, Default)]
pub struct FilterQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub vehicle_type: Option<String>,
    pub format: Option<String>,
}

impl FilterQuery {
    fn to_filter(&self) -> TripFilter {
        TripFilter {
            from: self.from,
            to: self.to,
            vehicle_types: self.vehicle_type.iter().cloned().collect(),
        }
    }

    fn wants_csv(&self) -> bool {
        self.format.as_deref().is_some_and(|f| f.eq_ignore_ascii_case("csv"))
    }
}

#[derive(Deserialize, Default)]
pub struct SimilarQuery {
    pub tolerance: Option<f64>,
    pub weight: Option<f64>,
    pub deliveries: Option<f64>,
    pub destinations: Option<f64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub vehicle_type: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

pub type AppState = Arc<DashboardService>;

fn table_response<T: Serialize>(rows: Vec<T>, csv: bool) -> Result<Response, ApiError> {
    if csv {
        let body = to_csv_string(&rows)?;
        Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body).into_response())
    } else {
        Ok(Json(rows).into_response())
    }
}

/// GET /api/v1/health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET /api/v1/fleet
pub async fn get_fleet(State(service): State<AppState>) -> Json<FleetResponse> {
    let fleet: &Fleet = service.fleet();
    Json(FleetResponse {
        classes: fleet.classes.clone(),
        total_vehicles: fleet.total_vehicles(),
        total_capacity: fleet.total_capacity(),
        default_tolerance: service.default_tolerance().fraction(),
    })
}

/// POST /api/v1/allocate
pub async fn allocate(
    State(service): State<AppState>,
    Json(request): Json<AllocateRequest>,
) -> Result<Json<AllocateResponse>, ApiError> {
    let result = service.allocate(request.weight, request.classes)?;
    Ok(Json(AllocateResponse::from(result)))
}

async fn upload(service: &DashboardService, kind: DatasetKind, body: &str) -> Result<Json<IngestReport>, ApiError> {
    let report = service.upload_csv(kind, body).await?;
    Ok(Json(report))
}

/// PUT /api/v1/datasets/history
pub async fn put_history(State(service): State<AppState>, body: String) -> Result<Json<IngestReport>, ApiError> {
    upload(&service, DatasetKind::History, &body).await
}

/// PUT /api/v1/datasets/current
pub async fn put_current(State(service): State<AppState>, body: String) -> Result<Json<IngestReport>, ApiError> {
    upload(&service, DatasetKind::Current, &body).await
}

/// GET /api/v1/summary
pub async fn get_summary(
    State(service): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<DatasetSummary>, ApiError> {
    service
        .summary(DatasetKind::History, &params.to_filter())
        .await
        .map(Json)
        .ok_or_else(|| not_loaded(DatasetKind::History))
}

/// GET /api/v1/stats/daily
pub async fn get_daily_stats(
    State(service): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Result<Response, ApiError> {
    let rows: Vec<DailyStat> = service
        .daily_stats(&params.to_filter())
        .await
        .ok_or_else(|| not_loaded(DatasetKind::History))?;
    table_response(rows, params.wants_csv())
}

/// GET /api/v1/plates/monthly
pub async fn get_plates_monthly(
    State(service): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Result<Response, ApiError> {
    let rows: Vec<PlateCount> = service
        .plates_by_month(&params.to_filter())
        .await
        .ok_or_else(|| not_loaded(DatasetKind::History))?;
    table_response(rows, params.wants_csv())
}

/// GET /api/v1/plates/types
pub async fn get_plates_by_type(
    State(service): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Result<Response, ApiError> {
    let rows: Vec<PlateCount> = service
        .plates_by_type(&params.to_filter())
        .await
        .ok_or_else(|| not_loaded(DatasetKind::History))?;
    table_response(rows, params.wants_csv())
}

/// GET /api/v1/similar
pub async fn find_similar(
    State(service): State<AppState>,
    Query(params): Query<SimilarQuery>,
) -> Result<Json<SimilarDaysResult>, ApiError> {
    let tolerance = match params.tolerance {
        Some(t) => ToleranceBand::new(t)?,
        None => service.default_tolerance(),
    };

    let reference = match (params.weight, params.deliveries, params.destinations) {
        (Some(weight), Some(deliveries), Some(destinations)) => ReferenceStat::new(weight, deliveries, destinations),
        (None, None, None) => service
            .current_reference()
            .await
            .ok_or_else(|| not_loaded(DatasetKind::Current))?,
        _ => {
            return Err(error(
                StatusCode::BAD_REQUEST,
                "weight, deliveries and destinations must be given together",
            ))
        }
    };

    let filter = TripFilter {
        from: params.from,
        to: params.to,
        vehicle_types: params.vehicle_type.into_iter().collect(),
    };

    service
        .similar_days(reference, tolerance, &filter)
        .await
        .map(Json)
        .ok_or_else(|| not_loaded(DatasetKind::History))
}
