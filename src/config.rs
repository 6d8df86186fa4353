//! Runtime configuration for the API server
//!
//! Environment variables:
//!   FLEET_API_PORT   - Port to listen on (default: 8080)
//!   FLEET_CONFIG     - JSON fleet definition (default: built-in standard fleet)
//!   FLEET_HISTORY    - Trip history spreadsheet loaded at startup (optional)
//!   FLEET_CURRENT    - Current-volume spreadsheet loaded at startup (optional)
//!   FLEET_TOLERANCE  - Default similar-day tolerance (default: 0.15)

use crate::error::{FleetError, Result};
use crate::fleet::Fleet;
use crate::similarity::{ToleranceBand, DEFAULT_TOLERANCE};
use std::collections::HashMap;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub fleet_path: Option<PathBuf>,
    pub history_path: Option<PathBuf>,
    pub current_path: Option<PathBuf>,
    pub tolerance: ToleranceBand,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            fleet_path: None,
            history_path: None,
            current_path: None,
            tolerance: ToleranceBand::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Build from an explicit variable map. Unset or empty variables keep defaults.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let port = match get("FLEET_API_PORT") {
            Some(v) => v
                .parse()
                .map_err(|_| FleetError::invalid(format!("FLEET_API_PORT is not a port: '{}'", v)))?,
            None => DEFAULT_PORT,
        };
        let tolerance = match get("FLEET_TOLERANCE") {
            Some(v) => ToleranceBand::new(
                v.parse()
                    .map_err(|_| FleetError::invalid(format!("FLEET_TOLERANCE is not a number: '{}'", v)))?,
            )?,
            None => ToleranceBand::new(DEFAULT_TOLERANCE)?,
        };

        Ok(Self {
            port,
            fleet_path: get("FLEET_CONFIG").map(PathBuf::from),
            history_path: get("FLEET_HISTORY").map(PathBuf::from),
            current_path: get("FLEET_CURRENT").map(PathBuf::from),
            tolerance,
        })
    }

    /// The configured fleet file, or the standard fleet when none is set
    pub fn load_fleet(&self) -> Result<Fleet> {
        match &self.fleet_path {
            Some(path) => Fleet::from_json_file(path),
            None => Ok(Fleet::standard()),
        }
    }
}
