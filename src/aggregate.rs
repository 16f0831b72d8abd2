//! Bucketing of demand into hex cells

use std::collections::BTreeMap;

use crate::components::DemandPoint;
use crate::spatial::{CellId, HexGrid};

/// Fixed mapping of demand points to the cells that contain them.
///
/// Membership never changes during a run; only the covered flags of the
/// members do, so the mapping is built once and reused for every rescoring.
#[derive(Debug, Clone)]
pub struct CellAssignment {
    cell_of: Vec<Option<CellId>>,
    members: Vec<Vec<usize>>,
    unassigned: usize,
    unassigned_weight: f64,
}

impl CellAssignment {
    pub fn build(grid: &HexGrid, demand: &[DemandPoint]) -> Self {
        let mut members = vec![Vec::new(); grid.len()];
        let mut unassigned = 0;
        let mut unassigned_weight = 0.0;
        let cell_of = demand
            .iter()
            .enumerate()
            .map(|(index, point)| {
                let cell = grid.locate(point.position);
                match cell {
                    Some(id) => members[id as usize].push(index),
                    None => {
                        unassigned += 1;
                        unassigned_weight += point.weight;
                    }
                }
                cell
            })
            .collect();
        Self {
            cell_of,
            members,
            unassigned,
            unassigned_weight,
        }
    }

    /// Number of demand points the mapping was built over.
    pub fn demand_len(&self) -> usize {
        self.cell_of.len()
    }

    pub fn cell_count(&self) -> usize {
        self.members.len()
    }

    pub fn cell_of(&self, demand_index: usize) -> Option<CellId> {
        self.cell_of.get(demand_index).copied().flatten()
    }

    /// Demand indices assigned to `cell`, ascending.
    pub fn members(&self, cell: CellId) -> &[usize] {
        self.members
            .get(cell as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Points outside every cell. They can never drive a selection.
    pub fn unassigned(&self) -> usize {
        self.unassigned
    }

    pub fn unassigned_weight(&self) -> f64 {
        self.unassigned_weight
    }

    /// Uncovered weight of one cell, or `None` when every member is covered.
    pub fn uncovered_weight(&self, cell: CellId, demand: &[DemandPoint]) -> Option<f64> {
        let mut any = false;
        let mut sum = 0.0;
        for &index in self.members(cell) {
            let point = &demand[index];
            if !point.covered {
                any = true;
                sum += point.weight;
            }
        }
        any.then_some(sum)
    }

    /// Uncovered weight indexed by cell id.
    pub fn scores_by_cell(&self, demand: &[DemandPoint]) -> Vec<Option<f64>> {
        (0..self.members.len() as CellId)
            .map(|cell| self.uncovered_weight(cell, demand))
            .collect()
    }

    /// Uncovered weight per cell for every cell with at least one uncovered
    /// member.
    pub fn scores(&self, demand: &[DemandPoint]) -> BTreeMap<CellId, f64> {
        self.scores_by_cell(demand)
            .into_iter()
            .enumerate()
            .filter_map(|(cell, score)| score.map(|score| (cell as CellId, score)))
            .collect()
    }
}

/// Sum of uncovered demand weight per cell. Cells without uncovered demand
/// are absent; read a missing key as 0.0.
pub fn score_cells(grid: &HexGrid, demand: &[DemandPoint]) -> BTreeMap<CellId, f64> {
    CellAssignment::build(grid, demand).scores(demand)
}
