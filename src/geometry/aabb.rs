use std::fmt;

use crate::math::Point2;

/// An axis-aligned bounding box in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    /// Minimum corner of the bounding box.
    pub min: Point2,
    /// Maximum corner of the bounding box.
    pub max: Point2,
}

impl Aabb2 {
    /// Creates a box from its corners.
    #[must_use]
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all `points`. An empty slice gives an inverted
    /// box that contains nothing.
    #[must_use]
    pub fn from_points(points: &[Point2]) -> Self {
        let mut bb = Self::new(
            Point2::new(f64::INFINITY, f64::INFINITY),
            Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        );
        for p in points {
            bb.add_point(p);
        }
        bb
    }

    /// Grows the box to contain `p`.
    pub fn add_point(&mut self, p: &Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        )
    }

    /// Whether the closed boxes share a point.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Whether `p` lies in the closed box.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Width and height.
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.max.x - self.min.x, self.max.y - self.min.y)
    }
}

impl fmt::Display for Aabb2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bbox [{}, {}] x [{}, {}]",
            self.min.x, self.max.x, self.min.y, self.max.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_and_union() {
        let a = Aabb2::from_points(&[Point2::new(0.0, 1.0), Point2::new(2.0, -1.0)]);
        assert_eq!(a.min, Point2::new(0.0, -1.0));
        assert_eq!(a.max, Point2::new(2.0, 1.0));
        let b = Aabb2::from_points(&[Point2::new(5.0, 5.0)]);
        let u = a.union(&b);
        assert_eq!(u.max, Point2::new(5.0, 5.0));
        assert_eq!(u.size(), (5.0, 6.0));
    }

    #[test]
    fn overlap_is_closed() {
        let a = Aabb2::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        let b = Aabb2::new(Point2::new(1.0, 1.0), Point2::new(2.0, 2.0));
        let c = Aabb2::new(Point2::new(1.5, 0.0), Point2::new(2.0, 0.5));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.contains(&Point2::new(1.0, 0.5)));
        assert!(!Aabb2::from_points(&[]).contains(&Point2::origin()));
    }
}
