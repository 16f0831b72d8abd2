//! Flat-top hexagonal tessellation of a planar region

use serde::{Deserialize, Serialize};

use super::geometry::{convex_contains, Bounds, Point2D};
use crate::error::{require_positive, PlanError};

pub type CellId = u32;

/// Largest tessellation `HexGrid::generate` will build. Well under
/// `CellId::MAX`; at roughly 140 bytes a cell this is about 550 MiB.
pub const MAX_CELLS: u64 = 4_000_000;

/// Offset lattice coordinates of a cell. Column and row both start at -1 so
/// the grid carries one padding ring around its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexPos {
    pub col: i64,
    pub row: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexCell {
    pub id: CellId,
    pub pos: HexPos,
    pub center: Point2D,
    /// Counter-clockwise, starting at angle 0 (the right-hand vertex).
    pub boundary: [Point2D; 6],
}

impl HexCell {
    /// Closed containment: points on the boundary count as inside.
    pub fn contains(&self, point: Point2D, tolerance: f64) -> bool {
        convex_contains(&self.boundary, point, tolerance)
    }
}

/// Hexagonal grid covering a bounding box.
///
/// Centers sit at `dx = 1.5 r` horizontally and `dy = sqrt(3) r` vertically;
/// even columns are shifted up by `dy / 2` so neighbouring columns interlock.
#[derive(Debug, Clone)]
pub struct HexGrid {
    bounds: Bounds,
    radius: f64,
    dx: f64,
    dy: f64,
    cols: u32,
    rows: u32,
    tolerance: f64,
    cells: Vec<HexCell>,
}

impl HexGrid {
    pub fn generate(bounds: Bounds, hex_radius: f64) -> Result<Self, PlanError> {
        require_positive("hex_radius", hex_radius)?;
        bounds.validate()?;

        let dx = 1.5 * hex_radius;
        let dy = 3.0_f64.sqrt() * hex_radius;
        let cols = axis_count(bounds.width(), dx)?;
        let rows = axis_count(bounds.height(), dy)?;
        let total = u64::from(cols)
            .checked_mul(u64::from(rows))
            .filter(|&total| total <= MAX_CELLS)
            .ok_or_else(|| {
                PlanError::invalid(format!(
                    "tessellation too large: {cols} x {rows} cells exceeds {MAX_CELLS}"
                ))
            })?;

        let mut grid = Self {
            bounds,
            radius: hex_radius,
            dx,
            dy,
            cols,
            rows,
            tolerance: hex_radius * 1e-9,
            cells: Vec::with_capacity(total as usize),
        };

        for row in -1..(rows as i64 - 1) {
            for col in -1..(cols as i64 - 1) {
                let pos = HexPos { col, row };
                let center = grid.center_of(pos);
                let id = grid.cells.len() as CellId;
                grid.cells.push(HexCell {
                    id,
                    pos,
                    center,
                    boundary: hexagon(center, hex_radius),
                });
            }
        }
        Ok(grid)
    }

    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> Option<&HexCell> {
        self.cells.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn center_of(&self, pos: HexPos) -> Point2D {
        let x = self.bounds.min_x + pos.col as f64 * self.dx;
        let mut y = self.bounds.min_y + pos.row as f64 * self.dy;
        if pos.col.rem_euclid(2) == 0 {
            y += self.dy / 2.0;
        }
        Point2D::new(x, y)
    }

    /// Convert lattice position to cell id
    pub fn pos_to_id(&self, pos: HexPos) -> Option<CellId> {
        let col = pos.col + 1;
        let row = pos.row + 1;
        if col < 0 || row < 0 || col >= self.cols as i64 || row >= self.rows as i64 {
            return None;
        }
        Some((row * self.cols as i64 + col) as CellId)
    }

    /// Convert cell id to lattice position
    pub fn id_to_pos(&self, id: CellId) -> Option<HexPos> {
        self.cell(id).map(|cell| cell.pos)
    }

    /// Lowest-id cell whose closed polygon contains `point`.
    ///
    /// A point inside cell (c, r) is within 2/3 of a column spacing of column
    /// c and within half a row spacing of row r, so rounding and checking one
    /// step either side finds every candidate. Ids grow with (row, col), so
    /// the minimum id is the first match in generation order.
    pub fn locate(&self, point: Point2D) -> Option<CellId> {
        if !point.is_finite() {
            return None;
        }
        let col_guess = ((point.x - self.bounds.min_x) / self.dx).round() as i64;
        let mut best: Option<CellId> = None;
        for col in (col_guess - 1)..=(col_guess + 1) {
            let offset = if col.rem_euclid(2) == 0 {
                self.dy / 2.0
            } else {
                0.0
            };
            let row_guess = ((point.y - self.bounds.min_y - offset) / self.dy).round() as i64;
            for row in (row_guess - 1)..=(row_guess + 1) {
                let Some(id) = self.pos_to_id(HexPos { col, row }) else {
                    continue;
                };
                if best.is_some_and(|current| current <= id) {
                    continue;
                }
                if self.cells[id as usize].contains(point, self.tolerance) {
                    best = Some(id);
                }
            }
        }
        best
    }
}

fn axis_count(span: f64, spacing: f64) -> Result<u32, PlanError> {
    let count = (span / spacing).ceil() + 2.0;
    if !count.is_finite() || count > u32::MAX as f64 {
        return Err(PlanError::invalid(format!(
            "tessellation too large: {count} cells along one axis"
        )));
    }
    Ok(count as u32)
}

/// Flat-top hexagon: vertex `i` sits at `60 * i` degrees, starting from the
/// right-hand vertex at 0° and winding counter-clockwise.
fn hexagon(center: Point2D, radius: f64) -> [Point2D; 6] {
    std::array::from_fn(|i| {
        let angle = (60.0 * i as f64).to_radians();
        Point2D::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        )
    })
}
