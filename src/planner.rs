use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregate::CellAssignment;
use crate::components::{
    covered_weight, total_weight, validate_demand, validate_facilities, DemandPoint,
    FacilityPoint, Proposal,
};
use crate::coverage::CoverageEvaluator;
use crate::error::{require_positive, PlanError};
use crate::greedy::{checked_k, GreedySelector, SelectionStep};
use crate::spatial::{Bounds, CellId, HexGrid, Point2D};

/// Scalar parameters of one planning run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanSettings {
    pub name: String,
    pub coverage_radius_m: f64,
    pub hex_radius_m: f64,
    /// Signed so that a negative budget from configuration is reported
    /// instead of failing to parse.
    pub k: i64,
    pub padding_m: f64,
}

impl PlanSettings {
    pub fn validate(&self) -> Result<usize, PlanError> {
        require_positive("coverage_radius_m", self.coverage_radius_m)?;
        require_positive("hex_radius_m", self.hex_radius_m)?;
        if !self.padding_m.is_finite() || self.padding_m < 0.0 {
            return Err(PlanError::invalid(format!(
                "padding_m must be a non-negative finite number, got {}",
                self.padding_m
            )));
        }
        checked_k(self.k)
    }
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            name: "plan".to_string(),
            coverage_radius_m: 3_000.0,
            hex_radius_m: 3_000.0,
            k: 10,
            padding_m: 5_000.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CellScore {
    pub id: CellId,
    pub center: Point2D,
    pub score: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanTotals {
    pub demand_points: usize,
    pub facilities: usize,
    pub total_weight: f64,
    pub initially_covered_weight: f64,
    pub final_covered_weight: f64,
    pub unassigned_points: usize,
}

/// Everything a run produces: proposals in selection order, the initial cell
/// scores for reporting, and the final demand state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanReport {
    pub name: String,
    pub settings: PlanSettings,
    pub bounds: Bounds,
    pub totals: PlanTotals,
    pub proposals: Vec<Proposal>,
    pub cells: Vec<CellScore>,
    #[serde(skip)]
    pub demand: Vec<DemandPoint>,
}

pub struct Planner {
    settings: PlanSettings,
    k: usize,
}

impl Planner {
    pub fn new(settings: PlanSettings) -> Result<Self, PlanError> {
        let k = settings.validate()?;
        Ok(Self { settings, k })
    }

    pub fn settings(&self) -> &PlanSettings {
        &self.settings
    }

    pub fn run(
        &self,
        demand: Vec<DemandPoint>,
        facilities: &[FacilityPoint],
    ) -> Result<PlanReport, PlanError> {
        self.run_with_hook(demand, facilities, |_| {})
    }

    pub fn run_with_hook<F>(
        &self,
        mut demand: Vec<DemandPoint>,
        facilities: &[FacilityPoint],
        hook: F,
    ) -> Result<PlanReport, PlanError>
    where
        F: FnMut(&SelectionStep<'_>),
    {
        validate_demand(&demand)?;
        validate_facilities(facilities)?;

        let evaluator = CoverageEvaluator::new(self.settings.coverage_radius_m)?;
        evaluator.evaluate_all(&mut demand, facilities)?;
        let initially_covered_weight = covered_weight(&demand);

        let bounds = self.tessellation_bounds(&demand, facilities);
        let grid = HexGrid::generate(bounds, self.settings.hex_radius_m)?;
        let assignment = CellAssignment::build(&grid, &demand);
        let initial_scores = assignment.scores(&demand);

        let selector = GreedySelector::new(&grid, self.settings.coverage_radius_m)?;
        let proposals =
            selector.select_assigned(&mut demand, facilities, self.k, &assignment, hook)?;

        let totals = PlanTotals {
            demand_points: demand.len(),
            facilities: facilities.len(),
            total_weight: total_weight(&demand),
            initially_covered_weight,
            final_covered_weight: covered_weight(&demand),
            unassigned_points: assignment.unassigned(),
        };
        info!(
            name = %self.settings.name,
            cells = grid.len(),
            proposals = proposals.len(),
            total_weight = totals.total_weight,
            initially_covered = totals.initially_covered_weight,
            finally_covered = totals.final_covered_weight,
            "planning run complete"
        );

        Ok(PlanReport {
            name: self.settings.name.clone(),
            settings: self.settings.clone(),
            bounds,
            totals,
            proposals,
            cells: cell_scores(&grid, &initial_scores),
            demand,
        })
    }

    /// Demand extent grown by the padding margin. Falls back to the facility
    /// extent, then to the origin, when there is no demand.
    fn tessellation_bounds(&self, demand: &[DemandPoint], facilities: &[FacilityPoint]) -> Bounds {
        Bounds::enclosing(demand.iter().map(|point| point.position))
            .or_else(|| Bounds::enclosing(facilities.iter().map(|f| f.position)))
            .unwrap_or(Bounds {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 0.0,
                max_y: 0.0,
            })
            .padded(self.settings.padding_m)
    }
}

fn cell_scores(grid: &HexGrid, scores: &BTreeMap<CellId, f64>) -> Vec<CellScore> {
    scores
        .iter()
        .filter(|(_, score)| **score > 0.0)
        .filter_map(|(&id, &score)| {
            grid.cell(id).map(|cell| CellScore {
                id,
                center: cell.center,
                score,
            })
        })
        .collect()
}
