//! Fleet definitions
//!
//! A fleet is an ordered list of vehicle classes. Order is priority: the
//! allocator fills earlier classes first.

use crate::allocation::{allocate, AllocationRequest, AllocationResult};
use crate::error::{FleetError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

/// A named category of truck with a count available and a per-unit capacity (kg)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleClass {
    pub name: String,
    pub count: u32,
    pub capacity: f64,
}

impl VehicleClass {
    pub fn new(name: impl Into<String>, count: u32, capacity: f64) -> Self {
        Self {
            name: name.into(),
            count,
            capacity,
        }
    }

    /// Total weight this class can carry with every vehicle dispatched
    pub fn total_capacity(&self) -> f64 {
        self.count as f64 * self.capacity
    }

    pub fn validate(&self) -> Result<()> {
        if !self.capacity.is_finite() || self.capacity <= 0.0 {
            return Err(FleetError::invalid(format!(
                "vehicle class '{}' has non-positive capacity {}",
                self.name, self.capacity
            )));
        }
        Ok(())
    }
}

/// Parses `NAME:COUNT:CAPACITY`, e.g. `VUC:2:2000`.
///
/// The name may itself contain colons; count and capacity are taken from the
/// last two fields.
impl FromStr for VehicleClass {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.rsplitn(3, ':');
        let capacity = parts.next();
        let count = parts.next();
        let name = parts.next();

        let (Some(name), Some(count), Some(capacity)) = (name, count, capacity) else {
            return Err(FleetError::invalid(format!(
                "expected NAME:COUNT:CAPACITY, got '{}'",
                s
            )));
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(FleetError::invalid(format!("empty vehicle class name in '{}'", s)));
        }
        let count: u32 = count
            .trim()
            .parse()
            .map_err(|_| FleetError::invalid(format!("invalid vehicle count '{}'", count)))?;
        let capacity: f64 = capacity
            .trim()
            .parse()
            .map_err(|_| FleetError::invalid(format!("invalid capacity '{}'", capacity)))?;

        let class = VehicleClass::new(name, count, capacity);
        class.validate()?;
        Ok(class)
    }
}

/// Ordered set of vehicle classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    pub classes: Vec<VehicleClass>,
}

impl Fleet {
    pub fn new(classes: Vec<VehicleClass>) -> Self {
        Self { classes }
    }

    /// The operation's current average fleet, in dispatch priority order
    pub fn standard() -> Self {
        Self::new(vec![
            VehicleClass::new("3/4", 9, 3500.0),
            VehicleClass::new("Semi Leve", 6, 1500.0),
            VehicleClass::new("VUC", 2, 2000.0),
            VehicleClass::new("Fiorino", 2, 600.0),
        ])
    }

    /// Load a fleet from a JSON file of the form
    /// `{"classes": [{"name": "VUC", "count": 2, "capacity": 2000}]}`
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let fleet: Fleet = serde_json::from_reader(BufReader::new(file))?;
        fleet.validate()?;
        Ok(fleet)
    }

    pub fn validate(&self) -> Result<()> {
        self.classes.iter().try_for_each(VehicleClass::validate)
    }

    /// Replace classes with the same name, append the rest at the end
    pub fn with_overrides(mut self, overrides: &[VehicleClass]) -> Self {
        for class in overrides {
            match self.classes.iter_mut().find(|c| c.name == class.name) {
                Some(existing) => *existing = class.clone(),
                None => self.classes.push(class.clone()),
            }
        }
        self
    }

    pub fn total_capacity(&self) -> f64 {
        self.classes.iter().map(VehicleClass::total_capacity).sum()
    }

    pub fn total_vehicles(&self) -> u64 {
        self.classes.iter().map(|c| u64::from(c.count)).sum()
    }

    pub fn allocate(&self, weight: f64) -> Result<AllocationResult> {
        allocate(&AllocationRequest::new(weight, self.classes.clone()))
    }
}

impl Default for Fleet {
    fn default() -> Self {
        Self::standard()
    }
}
