//! Fleet sizing and delivery analytics.
//!
//! Two pure computations sit at the core: the greedy vehicle [`allocation`]
//! and the tolerance-band [`similarity`] filter over daily aggregates. The
//! remaining modules ingest trip spreadsheets, aggregate them and export the
//! resulting tables.

pub mod allocation;
pub mod api;
pub mod config;
pub mod error;
pub mod estimate;
pub mod export;
pub mod fleet;
pub mod similarity;
pub mod stats;
pub mod trips;
pub mod vehicle_types;

pub use error::{FleetError, Result};
