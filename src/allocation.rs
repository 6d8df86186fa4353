//! Greedy vehicle allocation
//!
//! Covers a daily cargo weight with whole vehicles, class by class, in the
//! order the caller lists them. A positive remainder means the fleet ran out
//! of capacity; it is reported on the result, not raised as an error.

use crate::error::{FleetError, Result};
use crate::fleet::VehicleClass;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationRequest {
    pub weight: f64,
    pub classes: Vec<VehicleClass>,
}

impl AllocationRequest {
    pub fn new(weight: f64, classes: Vec<VehicleClass>) -> Self {
        Self { weight, classes }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(FleetError::invalid(format!(
                "requested weight must be a non-negative number, got {}",
                self.weight
            )));
        }
        self.classes.iter().try_for_each(VehicleClass::validate)
    }
}

/// Vehicles dispatched from one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassAllocation {
    pub name: String,
    pub used: u32,
    pub available: u32,
    pub capacity: f64,
    /// Weight still uncovered once this class was dispatched
    pub remaining_after: f64,
}

impl ClassAllocation {
    pub fn allocated_capacity(&self) -> f64 {
        self.used as f64 * self.capacity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationResult {
    pub requested: f64,
    /// One entry per requested class, in request order
    pub classes: Vec<ClassAllocation>,
    /// Weight left uncovered after every class was exhausted
    pub remainder: f64,
}

impl AllocationResult {
    /// Vehicles used for the class with this name
    pub fn used(&self, name: &str) -> Option<u32> {
        self.classes.iter().find(|c| c.name == name).map(|c| c.used)
    }

    pub fn is_fully_covered(&self) -> bool {
        self.remainder <= 0.0
    }

    /// `Some(remainder)` when the fleet could not cover the requested weight
    pub fn shortfall(&self) -> Option<f64> {
        (!self.is_fully_covered()).then_some(self.remainder)
    }

    pub fn vehicles_used(&self) -> u64 {
        self.classes.iter().map(|c| u64::from(c.used)).sum()
    }

    pub fn allocated_capacity(&self) -> f64 {
        self.classes.iter().map(ClassAllocation::allocated_capacity).sum()
    }

    /// Capacity dispatched beyond what the covered weight needs
    pub fn idle_capacity(&self) -> f64 {
        (self.allocated_capacity() - (self.requested - self.remainder)).max(0.0)
    }
}

/// Assign whole vehicles to `request.weight`, filling classes in order.
pub fn allocate(request: &AllocationRequest) -> Result<AllocationResult> {
    request.validate()?;

    let mut remaining = request.weight;
    let mut classes = Vec::with_capacity(request.classes.len());

    for class in &request.classes {
        let (used, left) = fill_class(class.count, class.capacity, remaining);
        debug!(
            class = %class.name,
            used,
            available = class.count,
            remaining = left,
            "allocated vehicle class"
        );
        remaining = left;
        classes.push(ClassAllocation {
            name: class.name.clone(),
            used,
            available: class.count,
            capacity: class.capacity,
            remaining_after: left,
        });
    }

    Ok(AllocationResult {
        requested: request.weight,
        classes,
        remainder: remaining,
    })
}

/// Dispatch up to `available` vehicles while weight remains. The last vehicle
/// may run partly empty, so the remaining weight is clamped at zero.
fn fill_class(available: u32, capacity: f64, remaining: f64) -> (u32, f64) {
    if available == 0 || remaining <= 0.0 {
        return (0, remaining.max(0.0));
    }
    let needed = (remaining / capacity).ceil();
    let used = if needed >= available as f64 { available } else { needed as u32 };
    (used, (remaining - used as f64 * capacity).max(0.0))
}
