use std::f64::consts::PI;
use std::fmt;

use nalgebra::Rotation2;

use super::{CoverOptions, Curve};
use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::{Aabb2, Triangle2D};
use crate::math::arc_2d::{
    arc_from_g1, arc_point_at, arc_subdivision_count, axis_crossings, tangent_apex,
};
use crate::math::{heading, left_normal, Point2, TOLERANCE};

/// A circular arc given by start point, start heading, signed curvature and
/// arc length.
///
/// `curvature = 0` is a straight segment; positive curvature turns
/// counter-clockwise.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CircleArc {
    x0: f64,
    y0: f64,
    theta0: f64,
    k: f64,
    l: f64,
}

impl CircleArc {
    /// Creates a new arc.
    ///
    /// # Errors
    ///
    /// Returns an error if the length is negative or any value is not finite.
    pub fn new(x0: f64, y0: f64, theta0: f64, k: f64, l: f64) -> Result<Self> {
        if ![x0, y0, theta0, k, l].iter().all(|v| v.is_finite()) {
            return Err(GeometryError::Degenerate("non-finite arc data".into()).into());
        }
        if l < 0.0 {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "length",
                value: l,
                min: 0.0,
                max: f64::INFINITY,
            }
            .into());
        }
        Ok(Self {
            x0,
            y0,
            theta0,
            k,
            l,
        })
    }

    /// Builds the arc leaving `(x0, y0)` with heading `theta0` that ends at
    /// `(x1, y1)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the two points coincide or the target lies straight
    /// behind the start heading.
    pub fn build_g1(x0: f64, y0: f64, theta0: f64, x1: f64, y1: f64) -> Result<Self> {
        if (x1 - x0).hypot(y1 - y0) < TOLERANCE {
            return Err(GeometryError::ZeroChord.into());
        }
        let (k, l) = arc_from_g1(x0, y0, theta0, x1, y1).ok_or_else(|| {
            GeometryError::Degenerate(format!(
                "no arc from ({x0}, {y0}) heading {theta0} reaches ({x1}, {y1})"
            ))
        })?;
        Self::new(x0, y0, theta0, k, l)
    }

    #[must_use]
    pub fn x_begin(&self) -> f64 {
        self.x0
    }

    #[must_use]
    pub fn y_begin(&self) -> f64 {
        self.y0
    }

    #[must_use]
    pub fn curvature(&self) -> f64 {
        self.k
    }

    /// Total heading change along the arc.
    #[must_use]
    pub fn delta_theta(&self) -> f64 {
        self.k * self.l
    }

    /// Center of the supporting circle, `None` for a straight segment.
    #[must_use]
    pub fn center(&self) -> Option<Point2> {
        if self.k == 0.0 {
            return None;
        }
        Some(Point2::new(self.x0, self.y0) + left_normal(&heading(self.theta0)) / self.k)
    }

    /// The arc traced by the points at lateral offset `offs`.
    ///
    /// The offset of an arc is a concentric arc scaled by `1 - k * offs`; a
    /// negative factor means the offset passes through the center and runs
    /// the other way round.
    ///
    /// # Errors
    ///
    /// Returns an error when the offset collapses the arc onto its center.
    pub fn offset_iso(&self, offs: f64) -> Result<Self> {
        let lambda = 1.0 - self.k * offs;
        if lambda.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "offset {offs} collapses arc of curvature {}",
                self.k
            ))
            .into());
        }
        let p = self.eval_iso(0.0, offs);
        let theta0 = if lambda > 0.0 {
            self.theta0
        } else {
            self.theta0 + PI
        };
        Self::new(p.x, p.y, theta0, self.k / lambda.abs(), self.l * lambda.abs())
    }

    fn bbox_points(&self) -> Vec<Point2> {
        let mut pts = vec![self.eval(0.0), self.eval(self.l)];
        for t in axis_crossings(self.theta0, self.delta_theta()) {
            pts.push(self.eval(t * self.l));
        }
        pts
    }
}

impl Curve for CircleArc {
    fn length(&self) -> f64 {
        self.l
    }

    fn length_iso(&self, offs: f64) -> f64 {
        (self.l * (1.0 - self.k * offs)).abs()
    }

    fn theta(&self, s: f64) -> f64 {
        self.theta0 + s * self.k
    }

    fn theta_d(&self, _s: f64) -> f64 {
        self.k
    }

    fn eval(&self, s: f64) -> Point2 {
        let (x, y) = arc_point_at(self.x0, self.y0, self.theta0, self.k, s);
        Point2::new(x, y)
    }

    fn bbox_iso(&self, offs: f64) -> Aabb2 {
        match self.offset_iso(offs) {
            Ok(arc) => Aabb2::from_points(&arc.bbox_points()),
            // Collapsed onto the center.
            Err(_) => Aabb2::from_points(&[self.eval_iso(0.0, offs)]),
        }
    }

    fn bb_triangles_iso(&self, offs: f64, opts: &CoverOptions, icurve: usize) -> Vec<Triangle2D> {
        if self.l <= 0.0 {
            return Vec::new();
        }
        let lambda = (1.0 - self.k * offs).abs();
        let n = arc_subdivision_count(
            self.delta_theta().abs(),
            self.l * lambda,
            opts.max_angle,
            opts.max_size,
        );
        #[allow(clippy::cast_precision_loss)]
        let ds = self.l / n as f64;
        let mut tvec = Vec::with_capacity(n);
        let mut a = self.eval_iso(0.0, offs);
        for i in 0..n {
            #[allow(clippy::cast_precision_loss)]
            let s0 = i as f64 * ds;
            let s1 = if i + 1 == n { self.l } else { s0 + ds };
            let b = self.eval_iso(s1, offs);
            let apex = tangent_apex(&a, &b, self.k * (s1 - s0));
            tvec.push(Triangle2D::new(a, apex, b, s0, s1, icurve));
            a = b;
        }
        tvec
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        self.x0 += tx;
        self.y0 += ty;
    }

    fn rotate(&mut self, angle: f64, cx: f64, cy: f64) {
        let c = Point2::new(cx, cy);
        let p = c + Rotation2::new(angle) * (Point2::new(self.x0, self.y0) - c);
        self.x0 = p.x;
        self.y0 = p.y;
        self.theta0 += angle;
    }

    fn scale(&mut self, sc: f64) {
        self.k /= sc;
        self.l *= sc;
    }

    fn reverse(&mut self) {
        let end = self.eval(self.l);
        self.theta0 = self.theta(self.l) + PI;
        self.x0 = end.x;
        self.y0 = end.y;
        self.k = -self.k;
    }

    fn change_origin(&mut self, newx0: f64, newy0: f64) {
        self.x0 = newx0;
        self.y0 = newy0;
    }

    fn trim(&mut self, s_begin: f64, s_end: f64) -> Result<()> {
        let slack = TOLERANCE * (1.0 + self.l);
        if s_begin > s_end || s_begin < -slack || s_end > self.l + slack {
            return Err(OperationError::InvalidInput(format!(
                "cannot trim arc of length {} to [{s_begin}, {s_end}]",
                self.l
            ))
            .into());
        }
        let s_begin = s_begin.clamp(0.0, self.l);
        let s_end = s_end.clamp(s_begin, self.l);
        let p = self.eval(s_begin);
        self.theta0 = self.theta(s_begin);
        self.x0 = p.x;
        self.y0 = p.y;
        self.l = s_end - s_begin;
        Ok(())
    }
}

impl fmt::Display for CircleArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x0 = {}, y0 = {}, theta0 = {}, kappa = {}, L = {}",
            self.x0, self.y0, self.theta0, self.k, self.l
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::range_symm;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn quarter() -> CircleArc {
        // Unit circle centred at origin, from (1, 0) to (0, 1).
        CircleArc::new(1.0, 0.0, FRAC_PI_2, 1.0, FRAC_PI_2).unwrap()
    }

    #[test]
    fn evaluation_follows_the_circle() {
        let arc = quarter();
        let c = arc.center().unwrap();
        assert_abs_diff_eq!(c.coords.norm(), 0.0, epsilon = 1e-15);
        for i in 0..=10 {
            let s = arc.length() * f64::from(i) / 10.0;
            assert_abs_diff_eq!(arc.eval(s).coords.norm(), 1.0, epsilon = 1e-14);
            // Tangent is perpendicular to the radius.
            assert_abs_diff_eq!(arc.tg(s).dot(&arc.eval(s).coords), 0.0, epsilon = 1e-14);
        }
        let end = arc.end_point();
        assert_abs_diff_eq!(end.x, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(end.y, 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(arc.eval_dd(0.3).norm(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn new_rejects_negative_length() {
        assert!(CircleArc::new(0.0, 0.0, 0.0, 1.0, -1.0).is_err());
        assert!(CircleArc::new(0.0, f64::NAN, 0.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn build_g1_hits_the_target() {
        let arc = CircleArc::build_g1(0.0, 0.0, 0.4, 3.0, -1.0).unwrap();
        let end = arc.end_point();
        assert_abs_diff_eq!(end.x, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(end.y, -1.0, epsilon = 1e-12);
        assert!(CircleArc::build_g1(0.0, 0.0, 0.4, 0.0, 0.0).is_err());
    }

    #[test]
    fn reverse_twice_restores_points() {
        let arc = CircleArc::new(0.5, -1.0, 0.3, -0.7, 2.5).unwrap();
        let mut rev = arc;
        rev.reverse();
        assert_abs_diff_eq!(rev.start_point(), arc.end_point(), epsilon = 1e-14);
        assert_abs_diff_eq!(rev.curvature(), 0.7);
        rev.reverse();
        for i in 0..=8 {
            let s = arc.length() * f64::from(i) / 8.0;
            assert_abs_diff_eq!(rev.eval(s), arc.eval(s), epsilon = 1e-13);
        }
    }

    #[test]
    fn rotate_and_scale() {
        let mut arc = quarter();
        arc.rotate(FRAC_PI_2, 0.0, 0.0);
        assert_abs_diff_eq!(arc.start_point(), Point2::new(0.0, 1.0), epsilon = 1e-15);
        assert_abs_diff_eq!(range_symm(arc.theta_begin() - PI), 0.0, epsilon = 1e-15);
        let mut big = quarter();
        big.scale(2.0);
        assert_abs_diff_eq!(big.length(), PI, epsilon = 1e-15);
        assert_abs_diff_eq!(big.end_point(), Point2::new(-1.0, 2.0), epsilon = 1e-14);
    }

    #[test]
    fn trim_keeps_geometry() {
        let arc = quarter();
        let piece = arc.trimmed(0.25, 1.0).unwrap();
        assert_abs_diff_eq!(piece.length(), 0.75, epsilon = 1e-15);
        assert_abs_diff_eq!(piece.eval(0.5), arc.eval(0.75), epsilon = 1e-14);
        assert!(arc.trimmed(1.0, 0.5).is_err());
        assert!(arc.trimmed(0.0, 5.0).is_err());
    }

    #[test]
    fn offset_arc_shrinks_towards_center() {
        let arc = quarter();
        let inner = arc.offset_iso(0.25).unwrap();
        assert_abs_diff_eq!(inner.curvature(), 1.0 / 0.75, epsilon = 1e-14);
        assert_abs_diff_eq!(inner.length(), 0.75 * FRAC_PI_2, epsilon = 1e-14);
        assert_abs_diff_eq!(inner.end_point(), arc.eval_iso(arc.length(), 0.25), epsilon = 1e-14);
        // Past the center the offset runs backwards.
        let flipped = arc.offset_iso(3.0).unwrap();
        assert_abs_diff_eq!(flipped.end_point(), arc.eval_iso(arc.length(), 3.0), epsilon = 1e-13);
        assert!(arc.offset_iso(1.0).is_err());
        assert_abs_diff_eq!(arc.length_iso(3.0), 2.0 * FRAC_PI_2, epsilon = 1e-14);
    }

    #[test]
    fn bbox_includes_axis_extremes() {
        // Upper half circle from (1, 0) to (-1, 0) reaches y = 1.
        let arc = CircleArc::new(1.0, 0.0, FRAC_PI_2, 1.0, PI).unwrap();
        let bb = arc.bbox();
        assert_abs_diff_eq!(bb.max.y, 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(bb.min.x, -1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(bb.min.y, 0.0, epsilon = 1e-14);
        let outer = arc.bbox_sae(0.5);
        assert_abs_diff_eq!(outer.max.y, 1.5, epsilon = 1e-14);
    }

    #[test]
    fn cover_contains_curve() {
        let arc = CircleArc::new(0.0, 0.0, 0.2, 0.8, 5.0).unwrap();
        let opts = CoverOptions::default();
        for offs in [0.0, 0.3, -0.4] {
            let tvec = arc.bb_triangles_iso(offs, &opts, 7);
            assert!(tvec.len() >= 23);
            assert_abs_diff_eq!(tvec[0].s0(), 0.0);
            assert_abs_diff_eq!(tvec[tvec.len() - 1].s1(), 5.0);
            for i in 1..200 {
                let s = 5.0 * f64::from(i) / 200.0;
                let p = arc.eval_iso(s, offs);
                let hit = tvec
                    .iter()
                    .filter(|t| t.s0() <= s && s <= t.s1())
                    .any(|t| t.is_inside(&p) >= 0);
                assert!(hit, "s={s} offs={offs} not covered");
            }
            assert!(tvec.iter().all(|t| t.icurve() == 7));
        }
    }

    #[test]
    fn straight_cover_is_split_by_size() {
        let seg = CircleArc::new(0.0, 0.0, 0.0, 0.0, 10.0).unwrap();
        let opts = CoverOptions {
            max_size: 2.5,
            ..CoverOptions::default()
        };
        let tvec = seg.bb_triangles(&opts, 0);
        assert_eq!(tvec.len(), 4);
        assert_eq!(tvec[1].is_counter_clockwise(), 0);
        assert!(CircleArc::default().bb_triangles(&opts, 0).is_empty());
    }
}
