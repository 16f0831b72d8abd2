//! Uniform-grid spatial hash over a fixed point set.
//!
//! Points are bucketed by `floor(coord / bucket_size)`. A radius query visits
//! every bucket overlapped by the query square and filters with the exact
//! distance test, so results match a linear scan.

use std::collections::HashMap;

use super::geometry::Point2D;

pub struct PointIndex {
    buckets: HashMap<(i64, i64), Vec<usize>>,
    bucket_size: f64,
    points: Vec<Point2D>,
}

impl PointIndex {
    /// Index `points` by position; query results refer to positions in this
    /// sequence. `bucket_size` must be positive; the typical choice is the
    /// query radius.
    pub fn new(points: impl IntoIterator<Item = Point2D>, bucket_size: f64) -> Self {
        let mut index = Self {
            buckets: HashMap::new(),
            bucket_size,
            points: Vec::new(),
        };
        for point in points {
            let slot = index.points.len();
            index
                .buckets
                .entry(index.bucket_of(point))
                .or_default()
                .push(slot);
            index.points.push(point);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    fn bucket_of(&self, point: Point2D) -> (i64, i64) {
        let discretize = |v: f64| (v / self.bucket_size).floor() as i64;
        (discretize(point.x), discretize(point.y))
    }

    fn for_each_candidate(
        &self,
        center: Point2D,
        radius: f64,
        mut visit: impl FnMut(usize) -> bool,
    ) {
        let (lo_x, lo_y) = self.bucket_of(Point2D::new(center.x - radius, center.y - radius));
        let (hi_x, hi_y) = self.bucket_of(Point2D::new(center.x + radius, center.y + radius));
        let span = (hi_x.abs_diff(lo_x) as u128 + 1) * (hi_y.abs_diff(lo_y) as u128 + 1);
        if span > self.buckets.len() as u128 {
            // Query square larger than the occupied area: walk occupied buckets instead.
            for (&(bx, by), slots) in &self.buckets {
                if bx < lo_x || bx > hi_x || by < lo_y || by > hi_y {
                    continue;
                }
                for &slot in slots {
                    if !visit(slot) {
                        return;
                    }
                }
            }
            return;
        }
        for bx in lo_x..=hi_x {
            for by in lo_y..=hi_y {
                if let Some(slots) = self.buckets.get(&(bx, by)) {
                    for &slot in slots {
                        if !visit(slot) {
                            return;
                        }
                    }
                }
            }
        }
    }

    /// True if any indexed point lies within `radius` (inclusive) of `center`.
    pub fn any_within(&self, center: Point2D, radius: f64) -> bool {
        let mut found = false;
        self.for_each_candidate(center, radius, |slot| {
            found = self.points[slot].distance(center) <= radius;
            !found
        });
        found
    }

    /// Slots of all indexed points within `radius` (inclusive) of `center`,
    /// in ascending order.
    pub fn within(&self, center: Point2D, radius: f64) -> Vec<usize> {
        let mut hits = Vec::new();
        self.for_each_candidate(center, radius, |slot| {
            if self.points[slot].distance(center) <= radius {
                hits.push(slot);
            }
            true
        });
        hits.sort_unstable();
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_within_matches_linear_scan() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let points: Vec<Point2D> = (0..400)
            .map(|_| Point2D::new(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0)))
            .collect();
        let index = PointIndex::new(points.iter().copied(), 60.0);

        for _ in 0..100 {
            let center = Point2D::new(rng.gen_range(-550.0..550.0), rng.gen_range(-550.0..550.0));
            let expected: Vec<usize> = points
                .iter()
                .enumerate()
                .filter(|(_, p)| p.distance(center) <= 60.0)
                .map(|(i, _)| i)
                .collect();
            assert_eq!(index.within(center, 60.0), expected);
            assert_eq!(index.any_within(center, 60.0), !expected.is_empty());
        }
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let index = PointIndex::new([Point2D::new(30.0, 40.0)], 50.0);
        assert!(index.any_within(Point2D::new(0.0, 0.0), 50.0));
        assert_eq!(index.within(Point2D::new(0.0, 0.0), 50.0), vec![0]);
        assert!(!index.any_within(Point2D::new(0.0, 0.0), 49.999));
    }

    #[test]
    fn test_empty_index() {
        let index = PointIndex::new(std::iter::empty::<Point2D>(), 10.0);
        assert!(index.is_empty());
        assert!(!index.any_within(Point2D::new(0.0, 0.0), 1e6));
    }
}
