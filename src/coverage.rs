//! Circular coverage of demand by facilities

use tracing::debug;

use crate::components::{validate_demand, validate_facilities, DemandPoint, FacilityPoint};
use crate::error::{require_positive, PlanError};
use crate::spatial::{Point2D, PointIndex};

/// True iff some facility lies within `radius` (inclusive) of `point`.
pub fn is_covered(point: Point2D, facilities: &[FacilityPoint], radius: f64) -> bool {
    facilities
        .iter()
        .any(|facility| facility.position.distance(point) <= radius)
}

pub struct CoverageEvaluator {
    radius: f64,
}

impl CoverageEvaluator {
    pub fn new(radius: f64) -> Result<Self, PlanError> {
        require_positive("coverage_radius", radius)?;
        Ok(Self { radius })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn is_covered(&self, point: Point2D, facilities: &[FacilityPoint]) -> bool {
        is_covered(point, facilities, self.radius)
    }

    /// Marks every demand point within reach of a facility as covered and
    /// returns how many points changed. Flags already set stay set.
    pub fn evaluate_all(
        &self,
        demand: &mut [DemandPoint],
        facilities: &[FacilityPoint],
    ) -> Result<usize, PlanError> {
        validate_demand(demand)?;
        validate_facilities(facilities)?;
        if facilities.is_empty() {
            return Ok(0);
        }

        let index = PointIndex::new(facilities.iter().map(|f| f.position), self.radius);
        let mut newly_covered = 0;
        for point in demand.iter_mut().filter(|point| !point.covered) {
            if index.any_within(point.position, self.radius) {
                point.covered = true;
                newly_covered += 1;
            }
        }
        debug!(
            facilities = facilities.len(),
            demand = demand.len(),
            newly_covered,
            "evaluated existing coverage"
        );
        Ok(newly_covered)
    }

    /// Covers everything within reach of a facility at `center` and returns
    /// the weight that was not covered before. Repeating the call with the
    /// same center is a no-op returning 0.
    pub fn cover_around(&self, center: Point2D, demand: &mut [DemandPoint]) -> f64 {
        let mut gain = 0.0;
        for point in demand.iter_mut() {
            if point.position.distance(center) <= self.radius && !point.covered {
                point.covered = true;
                gain += point.weight;
            }
        }
        gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demand() -> Vec<DemandPoint> {
        vec![
            DemandPoint::new(0.0, 0.0, 1.0),
            DemandPoint::new(100.0, 0.0, 2.0),
            DemandPoint::new(101.0, 0.0, 4.0),
            DemandPoint::new(5_000.0, 5_000.0, 8.0),
        ]
    }

    #[test]
    fn test_is_covered_inclusive_boundary() {
        let facilities = [FacilityPoint::new(0.0, 0.0)];
        assert!(is_covered(Point2D::new(100.0, 0.0), &facilities, 100.0));
        assert!(!is_covered(Point2D::new(100.5, 0.0), &facilities, 100.0));
        assert!(!is_covered(Point2D::new(0.0, 0.0), &[], 100.0));
    }

    #[test]
    fn test_evaluate_all_matches_predicate() {
        let evaluator = CoverageEvaluator::new(100.0).unwrap();
        let facilities = [FacilityPoint::new(0.0, 0.0), FacilityPoint::new(5_050.0, 5_000.0)];
        let mut points = demand();
        let changed = evaluator.evaluate_all(&mut points, &facilities).unwrap();
        assert_eq!(changed, 3);
        for point in &points {
            assert_eq!(point.covered, evaluator.is_covered(point.position, &facilities));
        }
    }

    #[test]
    fn test_evaluate_all_is_idempotent_and_never_uncovers() {
        let evaluator = CoverageEvaluator::new(100.0).unwrap();
        let mut points = demand();
        points[3].covered = true;
        evaluator
            .evaluate_all(&mut points, &[FacilityPoint::new(0.0, 0.0)])
            .unwrap();
        let first = points.clone();
        let changed = evaluator
            .evaluate_all(&mut points, &[FacilityPoint::new(0.0, 0.0)])
            .unwrap();
        assert_eq!(changed, 0);
        assert_eq!(points, first);
        assert!(points[3].covered);
    }

    #[test]
    fn test_invalid_input_leaves_flags_untouched() {
        let evaluator = CoverageEvaluator::new(100.0).unwrap();
        let mut points = demand();
        points.push(DemandPoint::new(0.0, 0.0, -1.0));
        let result = evaluator.evaluate_all(&mut points, &[FacilityPoint::new(0.0, 0.0)]);
        assert!(matches!(result, Err(PlanError::InvalidParameter(_))));
        assert!(points.iter().all(|p| !p.covered));
    }

    #[test]
    fn test_cover_around_twice() {
        let evaluator = CoverageEvaluator::new(100.0).unwrap();
        let mut points = demand();
        let gain = evaluator.cover_around(Point2D::new(50.0, 0.0), &mut points);
        assert_eq!(gain, 7.0);
        assert!(!points[3].covered);
        let snapshot = points.clone();
        assert_eq!(evaluator.cover_around(Point2D::new(50.0, 0.0), &mut points), 0.0);
        assert_eq!(points, snapshot);
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        assert!(CoverageEvaluator::new(0.0).is_err());
        assert!(CoverageEvaluator::new(-1.0).is_err());
        assert!(CoverageEvaluator::new(f64::NAN).is_err());
    }
}
