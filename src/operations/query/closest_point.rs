use std::cmp::Ordering;

use tracing::trace;

use crate::geometry::curve::{CoverOptions, Curve};
use crate::math::Point2;

/// Newton steps allowed inside one triangle interval.
const MAX_PROJECTION_ITER: usize = 20;

/// Result of a closest point query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    /// The closest point on the offset curve.
    pub point: Point2,
    /// Arc length at the closest point.
    pub s: f64,
    /// Lateral coordinate of the query point with respect to the base curve.
    pub t: f64,
    /// Distance from the query point to `point`.
    pub distance: f64,
    /// Whether the segment from `point` to the query point is normal to the
    /// curve. False when the minimum sits on an end point at an angle.
    pub orthogonal: bool,
}

/// Finds the point of an offset curve closest to a query point.
pub struct ClosestPointOnCurve<'a, C> {
    curve: &'a C,
    point: Point2,
    offs: f64,
    cover: CoverOptions,
}

impl<'a, C: Curve> ClosestPointOnCurve<'a, C> {
    /// Creates a new `ClosestPointOnCurve` query.
    #[must_use]
    pub fn new(curve: &'a C, point: Point2) -> Self {
        Self {
            curve,
            point,
            offs: 0.0,
            cover: CoverOptions::default(),
        }
    }

    /// Projects on the ISO offset of the curve instead.
    #[must_use]
    pub fn with_offset(mut self, offs: f64) -> Self {
        self.offs = offs;
        self
    }

    #[must_use]
    pub fn with_cover(mut self, cover: CoverOptions) -> Self {
        self.cover = cover;
        self
    }

    /// Executes the query.
    ///
    /// Triangles of the cover whose nearest point is farther than the
    /// smallest farthest-vertex distance cannot hold the minimum and are
    /// skipped. The rest are visited nearest first with a clamped Newton
    /// projection on each interval.
    #[must_use]
    pub fn execute(&self) -> ClosestPoint {
        let q = &self.point;
        let tvec = self.curve.bb_triangles_iso(self.offs, &self.cover, 0);
        if tvec.is_empty() {
            return self.result_at(0.0);
        }

        let upper = tvec
            .iter()
            .map(|t| t.dist_max(q))
            .fold(f64::INFINITY, f64::min);
        let mut candidates: Vec<(f64, f64, f64)> = tvec
            .iter()
            .map(|t| (t.dist_min(q), t.s0(), t.s1()))
            .filter(|&(d, _, _)| d <= upper)
            .collect();
        candidates.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(Ordering::Equal));

        let mut best = (f64::INFINITY, 0.0);
        let mut visited = 0;
        for (dmin, s0, s1) in candidates {
            if dmin > best.0 {
                break;
            }
            visited += 1;
            let s = self.project_on(s0, s1);
            let d = self.distance_at(s);
            if d < best.0 {
                best = (d, s);
            }
        }
        trace!(triangles = tvec.len(), visited, "closest point search");
        self.result_at(best.1)
    }

    fn distance_at(&self, s: f64) -> f64 {
        (self.curve.eval_iso(s, self.offs) - self.point).norm()
    }

    /// Local minimiser of the distance on `[s0, s1]`.
    fn project_on(&self, s0: f64, s1: f64) -> f64 {
        let (curve, offs, q) = (self.curve, self.offs, &self.point);
        let mut s = 0.5 * (s0 + s1);
        for _ in 0..MAX_PROJECTION_ITER {
            let r = curve.eval_iso(s, offs) - q;
            let d1 = curve.eval_iso_d(s, offs);
            let d2 = curve.eval_iso_dd(s, offs);
            let f = r.dot(&d1);
            let df = d1.dot(&d1) + r.dot(&d2);
            if df <= f64::EPSILON {
                break;
            }
            let next = (s - f / df).clamp(s0, s1);
            let step = (next - s).abs();
            s = next;
            if step <= f64::EPSILON * (1.0 + s.abs()) {
                break;
            }
        }
        [s, s0, s1]
            .into_iter()
            .map(|c| (self.distance_at(c), c))
            .fold((f64::INFINITY, s), |best, cur| if cur.0 < best.0 { cur } else { best })
            .1
    }

    fn result_at(&self, s: f64) -> ClosestPoint {
        let point = self.curve.eval_iso(s, self.offs);
        let r = self.point - point;
        let distance = r.norm();
        let along = r.dot(&self.curve.tg(s)).abs();
        ClosestPoint {
            point,
            s,
            t: self.offs + r.dot(&self.curve.nor_iso(s)),
            distance,
            orthogonal: along <= 1e-8 * (1.0 + distance),
        }
    }
}
