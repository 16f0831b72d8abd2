use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::spatial::{CellId, Point2D};

/// A weighted location needing service. Only `covered` changes during a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DemandPoint {
    pub position: Point2D,
    pub weight: f64,
    #[serde(default)]
    pub covered: bool,
}

impl DemandPoint {
    pub fn new(x: f64, y: f64, weight: f64) -> Self {
        Self {
            position: Point2D::new(x, y),
            weight,
            covered: false,
        }
    }
}

/// An existing service location.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FacilityPoint {
    pub position: Point2D,
}

impl FacilityPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point2D::new(x, y),
        }
    }
}

/// A proposed new facility and the demand it newly covers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub position: Point2D,
    pub gain: f64,
    /// Cell whose center was chosen.
    pub cell: CellId,
    /// Uncovered weight assigned to that cell when it was picked.
    pub score: f64,
}

pub fn validate_demand(demand: &[DemandPoint]) -> Result<(), PlanError> {
    for (index, point) in demand.iter().enumerate() {
        if !point.position.is_finite() {
            return Err(PlanError::invalid(format!(
                "demand point {index} has non-finite coordinates ({}, {})",
                point.position.x, point.position.y
            )));
        }
        if !point.weight.is_finite() || point.weight < 0.0 {
            return Err(PlanError::invalid(format!(
                "demand point {index} has invalid weight {}",
                point.weight
            )));
        }
    }
    Ok(())
}

pub fn validate_facilities(facilities: &[FacilityPoint]) -> Result<(), PlanError> {
    for (index, facility) in facilities.iter().enumerate() {
        if !facility.position.is_finite() {
            return Err(PlanError::invalid(format!(
                "facility {index} has non-finite coordinates ({}, {})",
                facility.position.x, facility.position.y
            )));
        }
    }
    Ok(())
}

pub fn total_weight(demand: &[DemandPoint]) -> f64 {
    demand.iter().map(|point| point.weight).sum()
}

pub fn covered_weight(demand: &[DemandPoint]) -> f64 {
    demand
        .iter()
        .filter(|point| point.covered)
        .map(|point| point.weight)
        .sum()
}
