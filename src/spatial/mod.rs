//! Spatial model - planar geometry, hexagonal tessellation, point lookup

pub mod geometry;
pub mod hex;
pub mod index;

pub use geometry::{Bounds, Point2D};
pub use hex::{CellId, HexCell, HexGrid, HexPos, MAX_CELLS};
pub use index::PointIndex;
