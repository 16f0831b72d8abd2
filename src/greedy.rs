//! Greedy maximal-coverage site selection

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};

use tracing::{debug, warn};

use crate::aggregate::CellAssignment;
use crate::components::{covered_weight, DemandPoint, FacilityPoint, Proposal};
use crate::coverage::CoverageEvaluator;
use crate::error::PlanError;
use crate::spatial::{CellId, HexGrid, PointIndex};

/// Converts a signed proposal budget from configuration into a count.
pub fn checked_k(k: i64) -> Result<usize, PlanError> {
    usize::try_from(k)
        .map_err(|_| PlanError::invalid(format!("k must be zero or positive, got {k}")))
}

/// State visible to a selection hook after each proposal.
pub struct SelectionStep<'a> {
    pub iteration: usize,
    pub proposal: &'a Proposal,
    pub covered_weight: f64,
    pub demand: &'a [DemandPoint],
}

pub struct GreedySelector<'g> {
    grid: &'g HexGrid,
    coverage: CoverageEvaluator,
}

impl<'g> GreedySelector<'g> {
    pub fn new(grid: &'g HexGrid, coverage_radius: f64) -> Result<Self, PlanError> {
        Ok(Self {
            grid,
            coverage: CoverageEvaluator::new(coverage_radius)?,
        })
    }

    pub fn coverage_radius(&self) -> f64 {
        self.coverage.radius()
    }

    pub fn select(
        &self,
        demand: &mut [DemandPoint],
        existing: &[FacilityPoint],
        k: usize,
    ) -> Result<Vec<Proposal>, PlanError> {
        self.select_with_hook(demand, existing, k, |_| {})
    }

    /// Proposes up to `k` facilities, marking newly covered demand as it goes.
    ///
    /// Each round picks the cell with the most uncovered weight (lowest id on
    /// ties), places a facility at its center and covers every point within
    /// the coverage radius of it. Stops early once no cell holds uncovered
    /// demand or the best cell's weight is not positive.
    pub fn select_with_hook<F>(
        &self,
        demand: &mut [DemandPoint],
        existing: &[FacilityPoint],
        k: usize,
        hook: F,
    ) -> Result<Vec<Proposal>, PlanError>
    where
        F: FnMut(&SelectionStep<'_>),
    {
        let assignment = CellAssignment::build(self.grid, demand);
        self.select_assigned(demand, existing, k, &assignment, hook)
    }

    /// Same as [`select_with_hook`](Self::select_with_hook), reusing a cell
    /// assignment the caller already built over this grid and demand.
    pub fn select_assigned<F>(
        &self,
        demand: &mut [DemandPoint],
        existing: &[FacilityPoint],
        k: usize,
        assignment: &CellAssignment,
        mut hook: F,
    ) -> Result<Vec<Proposal>, PlanError>
    where
        F: FnMut(&SelectionStep<'_>),
    {
        if assignment.demand_len() != demand.len()
            || assignment.cell_count() != self.grid.len()
        {
            return Err(PlanError::invalid(format!(
                "cell assignment covers {} points over {} cells, expected {} over {}",
                assignment.demand_len(),
                assignment.cell_count(),
                demand.len(),
                self.grid.len()
            )));
        }
        let radius = self.coverage.radius();
        self.coverage.evaluate_all(demand, existing)?;

        if assignment.unassigned() > 0 {
            warn!(
                points = assignment.unassigned(),
                weight = assignment.unassigned_weight(),
                "demand outside the tessellation can never be selected"
            );
        }

        let index = PointIndex::new(demand.iter().map(|point| point.position), radius);
        let mut ledger = ScoreLedger::new(assignment, demand);
        let mut covered = covered_weight(demand);
        let mut proposals = Vec::with_capacity(k.min(self.grid.len()));

        while proposals.len() < k {
            let Some(best) = ledger.best() else {
                debug!("no cell holds uncovered demand");
                break;
            };
            if best.score <= 0.0 {
                debug!(cell = best.cell, "best remaining cell has no weight");
                break;
            }

            let position = self.grid.cells()[best.cell as usize].center;
            let mut gain = 0.0;
            let mut touched = BTreeSet::new();
            for slot in index.within(position, radius) {
                let point = &mut demand[slot];
                if point.covered {
                    continue;
                }
                point.covered = true;
                gain += point.weight;
                if let Some(cell) = assignment.cell_of(slot) {
                    touched.insert(cell);
                }
            }
            for cell in touched {
                ledger.refresh(cell, assignment, demand);
            }
            covered += gain;

            debug!(
                iteration = proposals.len(),
                cell = best.cell,
                score = best.score,
                gain,
                x = position.x,
                y = position.y,
                "proposed facility"
            );
            proposals.push(Proposal {
                position,
                gain,
                cell: best.cell,
                score: best.score,
            });
            if let Some(proposal) = proposals.last() {
                hook(&SelectionStep {
                    iteration: proposals.len() - 1,
                    proposal,
                    covered_weight: covered,
                    demand: &*demand,
                });
            }
        }
        Ok(proposals)
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    score: f64,
    cell: CellId,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: higher score first, then lower cell id.
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Per-cell uncovered weight with a lazily pruned max-heap.
///
/// A cell is re-summed over its members only when one of them becomes
/// covered, in member order, so every score equals what a full rescan would
/// produce. Heap entries whose score no longer matches the ledger are stale
/// and are dropped when they reach the top.
struct ScoreLedger {
    scores: Vec<Option<f64>>,
    heap: BinaryHeap<Candidate>,
}

impl ScoreLedger {
    fn new(assignment: &CellAssignment, demand: &[DemandPoint]) -> Self {
        let scores = assignment.scores_by_cell(demand);
        let heap = scores
            .iter()
            .enumerate()
            .filter_map(|(cell, score)| {
                score.map(|score| Candidate {
                    score,
                    cell: cell as CellId,
                })
            })
            .collect();
        Self { scores, heap }
    }

    fn refresh(&mut self, cell: CellId, assignment: &CellAssignment, demand: &[DemandPoint]) {
        let score = assignment.uncovered_weight(cell, demand);
        self.scores[cell as usize] = score;
        if let Some(score) = score {
            self.heap.push(Candidate { score, cell });
        }
    }

    fn best(&mut self) -> Option<Candidate> {
        while let Some(top) = self.heap.peek().copied() {
            if self.scores[top.cell as usize] == Some(top.score) {
                return Some(top);
            }
            self.heap.pop();
        }
        None
    }
}
