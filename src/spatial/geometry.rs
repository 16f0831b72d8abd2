//! Planar geometry primitives (meters)

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// A position in planar meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance. Every coverage decision in the crate goes through
    /// this one function so indexed and naive lookups agree at the boundary.
    pub fn distance(&self, other: Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self, PlanError> {
        let bounds = Self {
            min_x,
            min_y,
            max_x,
            max_y,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Smallest box containing every point, or `None` for an empty input.
    pub fn enclosing(points: impl IntoIterator<Item = Point2D>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for point in iter {
            bounds.min_x = bounds.min_x.min(point.x);
            bounds.min_y = bounds.min_y.min(point.y);
            bounds.max_x = bounds.max_x.max(point.x);
            bounds.max_y = bounds.max_y.max(point.y);
        }
        Some(bounds)
    }

    pub fn padded(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, point: Point2D) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(PlanError::invalid("bounds must be finite"));
        }
        if self.min_x > self.max_x || self.min_y > self.max_y {
            return Err(PlanError::invalid(format!(
                "bounds are inverted: ({}, {}) .. ({}, {})",
                self.min_x, self.min_y, self.max_x, self.max_y
            )));
        }
        Ok(())
    }
}

/// Closed containment test for a convex polygon wound counter-clockwise.
///
/// `tolerance` is an absolute slack in meters; points that sit on an edge
/// (up to rounding in independently computed vertices) count as inside.
pub fn convex_contains(vertices: &[Point2D], point: Point2D, tolerance: f64) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let edge_x = b.x - a.x;
        let edge_y = b.y - a.y;
        let len = edge_x.hypot(edge_y);
        if len == 0.0 {
            continue;
        }
        // Signed distance of the point from the edge line, positive on the left.
        let cross = edge_x * (point.y - a.y) - edge_y * (point.x - a.x);
        if cross / len < -tolerance {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point2D> {
        vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(0.0, 10.0),
        ]
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn convex_contains_interior_edge_and_outside() {
        let square = unit_square();
        assert!(convex_contains(&square, Point2D::new(5.0, 5.0), 0.0));
        assert!(convex_contains(&square, Point2D::new(10.0, 5.0), 0.0));
        assert!(convex_contains(&square, Point2D::new(0.0, 0.0), 0.0));
        assert!(!convex_contains(&square, Point2D::new(15.0, 5.0), 0.0));
        assert!(!convex_contains(&square, Point2D::new(5.0, -0.5), 0.0));
    }

    #[test]
    fn convex_contains_needs_a_polygon() {
        assert!(!convex_contains(&[], Point2D::new(0.0, 0.0), 0.0));
        assert!(!convex_contains(
            &[Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)],
            Point2D::new(0.5, 0.5),
            0.0
        ));
    }

    #[test]
    fn enclosing_and_padding() {
        let bounds = Bounds::enclosing([
            Point2D::new(1.0, 5.0),
            Point2D::new(-2.0, 3.0),
            Point2D::new(4.0, -1.0),
        ])
        .unwrap();
        assert_eq!(bounds, Bounds::new(-2.0, -1.0, 4.0, 5.0).unwrap());

        let padded = bounds.padded(10.0);
        assert_eq!(padded.min_x, -12.0);
        assert_eq!(padded.max_y, 15.0);
        assert!(Bounds::enclosing(std::iter::empty::<Point2D>()).is_none());
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        assert!(Bounds::new(1.0, 0.0, 0.0, 1.0).is_err());
        assert!(Bounds::new(0.0, f64::NAN, 1.0, 1.0).is_err());
    }
}
