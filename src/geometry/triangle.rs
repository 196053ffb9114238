use std::fmt;

use nalgebra::Rotation2;

use super::Aabb2;
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::predicates::{is_counter_clockwise, is_point_in_triangle, triangles_overlap};
use crate::math::{Point2, Vector2};

/// A triangle bounding the piece `[s0, s1]` of curve number `icurve`.
///
/// Triangles are produced by the curve covers and live only for the duration
/// of one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle2D {
    p1: Point2,
    p2: Point2,
    p3: Point2,
    s0: f64,
    s1: f64,
    icurve: usize,
}

impl Triangle2D {
    /// Creates a triangle covering `[s0, s1]` of curve `icurve`.
    #[must_use]
    pub fn new(p1: Point2, p2: Point2, p3: Point2, s0: f64, s1: f64, icurve: usize) -> Self {
        Self {
            p1,
            p2,
            p3,
            s0,
            s1,
            icurve,
        }
    }

    #[must_use]
    pub fn p1(&self) -> &Point2 {
        &self.p1
    }

    #[must_use]
    pub fn p2(&self) -> &Point2 {
        &self.p2
    }

    #[must_use]
    pub fn p3(&self) -> &Point2 {
        &self.p3
    }

    /// The three vertices in order.
    #[must_use]
    pub fn points(&self) -> [Point2; 3] {
        [self.p1, self.p2, self.p3]
    }

    /// Start of the covered parameter interval.
    #[must_use]
    pub fn s0(&self) -> f64 {
        self.s0
    }

    /// End of the covered parameter interval.
    #[must_use]
    pub fn s1(&self) -> f64 {
        self.s1
    }

    /// Index of the curve piece this triangle bounds.
    #[must_use]
    pub fn icurve(&self) -> usize {
        self.icurve
    }

    /// Shifts the covered interval by `ds` and relabels the curve index.
    #[must_use]
    pub(crate) fn reparametrized(mut self, ds: f64, icurve: usize) -> Self {
        self.s0 += ds;
        self.s1 += ds;
        self.icurve = icurve;
        self
    }

    pub fn translate(&mut self, tx: f64, ty: f64) {
        let t = Vector2::new(tx, ty);
        self.p1 += t;
        self.p2 += t;
        self.p3 += t;
    }

    /// Rotates the triangle by `angle` around `(cx, cy)`.
    pub fn rotate(&mut self, angle: f64, cx: f64, cy: f64) {
        let rot = Rotation2::new(angle);
        let c = Point2::new(cx, cy);
        for p in [&mut self.p1, &mut self.p2, &mut self.p3] {
            *p = c + rot * (*p - c);
        }
    }

    /// Scales the triangle about the origin.
    pub fn scale(&mut self, sc: f64) {
        for p in [&mut self.p1, &mut self.p2, &mut self.p3] {
            p.coords *= sc;
        }
    }

    #[must_use]
    pub fn bbox(&self) -> Aabb2 {
        Aabb2::from_points(&self.points())
    }

    #[must_use]
    pub fn baricenter(&self) -> Point2 {
        Point2::from((self.p1.coords + self.p2.coords + self.p3.coords) / 3.0)
    }

    /// Length of the longest edge.
    #[must_use]
    pub fn diameter(&self) -> f64 {
        (self.p2 - self.p1)
            .norm()
            .max((self.p3 - self.p2).norm())
            .max((self.p1 - self.p3).norm())
    }

    /// Whether the two closed triangles share a point.
    #[must_use]
    pub fn overlap(&self, other: &Self) -> bool {
        triangles_overlap(&self.points(), &other.points())
    }

    /// `+1` counter-clockwise, `-1` clockwise, `0` degenerate.
    #[must_use]
    pub fn is_counter_clockwise(&self) -> i32 {
        is_counter_clockwise(&self.p1, &self.p2, &self.p3)
    }

    /// `+1` inside, `-1` outside, `0` on the border.
    #[must_use]
    pub fn is_inside(&self, pt: &Point2) -> i32 {
        is_point_in_triangle(pt, &self.p1, &self.p2, &self.p3)
    }

    /// Distance from `pt` to the nearest point of the closed triangle.
    #[must_use]
    pub fn dist_min(&self, pt: &Point2) -> f64 {
        if self.is_inside(pt) >= 0 {
            return 0.0;
        }
        point_to_segment_dist(pt, &self.p1, &self.p2)
            .min(point_to_segment_dist(pt, &self.p2, &self.p3))
            .min(point_to_segment_dist(pt, &self.p3, &self.p1))
    }

    /// Distance from `pt` to the farthest point of the triangle, which is
    /// always a vertex.
    #[must_use]
    pub fn dist_max(&self, pt: &Point2) -> f64 {
        (pt - self.p1)
            .norm()
            .max((pt - self.p2).norm())
            .max((pt - self.p3).norm())
    }
}

impl fmt::Display for Triangle2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Triangle2D")?;
        writeln!(f, "P1 = [{}, {}]", self.p1.x, self.p1.y)?;
        writeln!(f, "P2 = [{}, {}]", self.p2.x, self.p2.y)?;
        writeln!(f, "P3 = [{}, {}]", self.p3.x, self.p3.y)?;
        write!(f, "s = [{}, {}] on curve {}", self.s0, self.s1, self.icurve)
    }
}
