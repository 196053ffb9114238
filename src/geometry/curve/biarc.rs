use std::fmt;

use tracing::debug;

use super::{CircleArc, CoverOptions, Curve};
use crate::error::{ArcfitError, GeometryError, OperationError, Result};
use crate::geometry::{Aabb2, Triangle2D};
use crate::math::arc_2d::sinc;
use crate::math::solve::halley;
use crate::math::{cross, range_symm, Point2, TOLERANCE};
use crate::operations::query::{
    merge_candidate, ClosestPoint, ClosestPointOnCurve, CurveCurveCollision, CurveCurveIntersect,
    IntersectList, IntersectOptions,
};

/// Maximum number of Halley steps for the minimum-energy split.
const MAX_ENERGY_ITER: usize = 100;

/// Two circular arcs joined with a common point and a common tangent.
///
/// The global arc length runs through `C0` first and continues on `C1`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Biarc {
    c0: CircleArc,
    c1: CircleArc,
}

impl Biarc {
    /// Builds the biarc interpolating the two oriented points.
    ///
    /// # Errors
    ///
    /// See [`Biarc::build`].
    pub fn new(x0: f64, y0: f64, theta0: f64, x1: f64, y1: f64, theta1: f64) -> Result<Self> {
        let mut ba = Self::default();
        ba.build(x0, y0, theta0, x1, y1, theta1)?;
        Ok(ba)
    }

    /// Builds the minimum-energy biarc through three points.
    ///
    /// # Errors
    ///
    /// See [`Biarc::build_3p`].
    pub fn new_3p(x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self> {
        let mut ba = Self::default();
        ba.build_3p(x0, y0, x1, y1, x2, y2)?;
        Ok(ba)
    }

    /// Joins two arcs that already share their end/start point and tangent.
    ///
    /// # Errors
    ///
    /// Returns an error if the arcs are not G1-continuous within tolerance.
    pub fn from_arcs(c0: CircleArc, c1: CircleArc) -> Result<Self> {
        let gap = (c0.end_point() - c1.start_point()).norm();
        let turn = range_symm(c0.theta_end() - c1.theta_begin()).abs();
        let scale = 1.0 + c0.length() + c1.length();
        if gap > TOLERANCE * scale || turn > TOLERANCE {
            return Err(OperationError::InvalidInput(format!(
                "arcs are not G1 continuous (gap {gap:e}, turn {turn:e})"
            ))
            .into());
        }
        Ok(Self { c0, c1 })
    }

    /// Interpolates the oriented points `(x0, y0, theta0)` and
    /// `(x1, y1, theta1)` with two arcs.
    ///
    /// The junction is the equal-chord one: in the frame of the chord, with
    /// relative headings `a` and `b`, the junction heading is `-(a + b) / 2`
    /// and both arcs span chords of length `d / (2 cos((b - a) / 4))`.
    /// On failure `self` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroChord`] when the points coincide and
    /// [`GeometryError::Degenerate`] when an input is not finite or both
    /// headings point straight back along the chord.
    pub fn build(
        &mut self,
        x0: f64,
        y0: f64,
        theta0: f64,
        x1: f64,
        y1: f64,
        theta1: f64,
    ) -> Result<()> {
        if ![x0, y0, theta0, x1, y1, theta1].iter().all(|v| v.is_finite()) {
            debug!(x0, y0, theta0, x1, y1, theta1, "biarc build rejected: non-finite input");
            return Err(GeometryError::Degenerate("non-finite input".into()).into());
        }
        let dx = x1 - x0;
        let dy = y1 - y0;
        let d = dx.hypot(dy);
        let scale = 1.0 + x0.abs().max(y0.abs()).max(x1.abs()).max(y1.abs());
        if d <= TOLERANCE * scale {
            debug!(x0, y0, x1, y1, "biarc build rejected: zero chord");
            return Err(GeometryError::ZeroChord.into());
        }
        let omega = dy.atan2(dx);
        let a = range_symm(theta0 - omega);
        let b = range_symm(theta1 - omega);

        let c = ((b - a) / 4.0).cos();
        let d0 = -(3.0 * a + b) / 4.0;
        let d1 = (a + 3.0 * b) / 4.0;
        let (sc0, sc1) = (sinc(d0), sinc(d1));
        if c < 1e-8 || sc0 < 1e-8 || sc1 < 1e-8 {
            debug!(theta0, theta1, omega, "biarc build rejected: degenerate headings");
            return Err(GeometryError::Degenerate(format!(
                "headings {theta0} and {theta1} admit no biarc along chord angle {omega}"
            ))
            .into());
        }
        let half = d / (2.0 * c);

        let c0 = CircleArc::new(x0, y0, theta0, 2.0 * d0.sin() / half, half / sc0)?;
        // Start C1 exactly where C0 ends.
        let mid = c0.end_point();
        let c1 = CircleArc::new(mid.x, mid.y, c0.theta_end(), 2.0 * d1.sin() / half, half / sc1)?;

        self.c0 = c0;
        self.c1 = c1;
        Ok(())
    }

    /// Interpolates three points with the biarc of minimum bending energy
    /// whose junction is the middle point.
    ///
    /// With `alpha` and `beta` the tangent deflections against the two chords
    /// (`alpha + beta` is the turning angle between the chords), the energy
    /// `alpha sin(alpha) / La + beta sin(beta) / Lb` is stationary where
    /// `Lb g(alpha) = La g(beta)`, `g(x) = sin(x) + x cos(x)`. The residual
    /// takes opposite signs at `alpha = 0` and `alpha = omega`, so the root is
    /// bracketed and found with bisection-safeguarded Halley steps. On failure
    /// `self` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error when two consecutive points coincide, when the
    /// polyline folds back onto itself, or when the iteration does not
    /// converge.
    pub fn build_3p(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    ) -> Result<()> {
        let va = Point2::new(x1, y1) - Point2::new(x0, y0);
        let vb = Point2::new(x2, y2) - Point2::new(x1, y1);
        let la = va.norm();
        let lb = vb.norm();
        if la < TOLERANCE || lb < TOLERANCE {
            debug!(la, lb, "biarc 3-point build rejected: coincident points");
            return Err(GeometryError::ZeroChord.into());
        }
        let omega = cross(&va, &vb).atan2(va.dot(&vb));
        if omega.abs() > std::f64::consts::PI - 1e-8 {
            debug!(omega, "biarc 3-point build rejected: polyline folds back");
            return Err(GeometryError::Degenerate(
                "middle tangent undetermined: the polyline folds back".into(),
            )
            .into());
        }

        let residual = |alpha: f64| {
            let ga = gfun(alpha);
            let gb = gfun(omega - alpha);
            [
                lb * ga[0] - la * gb[0],
                lb * ga[1] + la * gb[1],
                lb * ga[2] - la * gb[2],
            ]
        };
        let guess = omega * la / (la + lb);
        let alpha = halley(residual, 0.0, omega, guess, 1e-12 * (la + lb), MAX_ENERGY_ITER)
            .map_err(|e| {
                debug!(error = %e, omega, "biarc 3-point energy split failed");
                ArcfitError::from(e)
            })?;

        let phi_a = va.y.atan2(va.x);
        let c0 = CircleArc::build_g1(x0, y0, phi_a - alpha, x1, y1)?;
        let c1 = CircleArc::build_g1(x1, y1, c0.theta_end(), x2, y2)?;

        self.c0 = c0;
        self.c1 = c1;
        Ok(())
    }

    /// First arc.
    #[must_use]
    pub fn c0(&self) -> &CircleArc {
        &self.c0
    }

    /// Second arc.
    #[must_use]
    pub fn c1(&self) -> &CircleArc {
        &self.c1
    }

    #[must_use]
    pub fn x_middle(&self) -> f64 {
        self.c1.x_begin()
    }

    #[must_use]
    pub fn y_middle(&self) -> f64 {
        self.c1.y_begin()
    }

    #[must_use]
    pub fn theta_middle(&self) -> f64 {
        self.c1.theta_begin()
    }

    #[must_use]
    pub fn kappa0(&self) -> f64 {
        self.c0.curvature()
    }

    #[must_use]
    pub fn kappa1(&self) -> f64 {
        self.c1.curvature()
    }

    #[must_use]
    pub fn length0(&self) -> f64 {
        self.c0.length()
    }

    #[must_use]
    pub fn length1(&self) -> f64 {
        self.c1.length()
    }

    /// Total heading change along both arcs.
    #[must_use]
    pub fn delta_theta(&self) -> f64 {
        self.c0.delta_theta() + self.c1.delta_theta()
    }

    /// Sub-arc holding global parameter `s`, and `s` local to it.
    fn locate(&self, s: f64) -> (&CircleArc, f64) {
        let l0 = self.c0.length();
        if s <= l0 {
            (&self.c0, s)
        } else {
            (&self.c1, s - l0)
        }
    }

    /// Whether the two biarcs touch or cross anywhere.
    #[must_use]
    pub fn collision(&self, other: &Self) -> bool {
        self.collision_iso(0.0, other, 0.0)
    }

    /// Whether this biarc offset by `offs` touches `other` offset by
    /// `offs_other`.
    #[must_use]
    pub fn collision_iso(&self, offs: f64, other: &Self, offs_other: f64) -> bool {
        self.pairs(other).into_iter().any(|(a, b, _, _)| {
            CurveCurveCollision::new(a, b)
                .with_offsets(offs, offs_other)
                .execute()
        })
    }

    /// Appends the `(s, s_other)` parameter pairs of all intersections with
    /// `other` to `ilist`, as `(s_other, s)` when `swap_s_vals` is set.
    pub fn intersect(&self, other: &Self, ilist: &mut IntersectList, swap_s_vals: bool) {
        self.intersect_iso(0.0, other, 0.0, ilist, swap_s_vals);
    }

    /// Offset version of [`Biarc::intersect`].
    pub fn intersect_iso(
        &self,
        offs: f64,
        other: &Self,
        offs_other: f64,
        ilist: &mut IntersectList,
        swap_s_vals: bool,
    ) {
        let options = IntersectOptions::default();
        let mut found = IntersectList::new();
        for (a, b, shift_a, shift_b) in self.pairs(other) {
            let hits = CurveCurveIntersect::new(a, b)
                .with_offsets(offs, offs_other)
                .with_options(options)
                .execute();
            for (sa, sb) in hits {
                // A crossing at the junction shows up in two pairs.
                merge_candidate(&mut found, (sa + shift_a, sb + shift_b), options.merge_tolerance);
            }
        }
        ilist.extend(
            found
                .into_iter()
                .map(|(sa, sb)| if swap_s_vals { (sb, sa) } else { (sa, sb) }),
        );
    }

    fn pairs<'a>(&'a self, other: &'a Self) -> [(&'a CircleArc, &'a CircleArc, f64, f64); 4] {
        let (l0, m0) = (self.c0.length(), other.c0.length());
        [
            (&self.c0, &other.c0, 0.0, 0.0),
            (&self.c0, &other.c1, 0.0, m0),
            (&self.c1, &other.c0, l0, 0.0),
            (&self.c1, &other.c1, l0, m0),
        ]
    }

    /// Point of the biarc closest to `(qx, qy)`.
    #[must_use]
    pub fn closest_point(&self, qx: f64, qy: f64) -> ClosestPoint {
        self.closest_point_iso(qx, qy, 0.0)
    }

    /// Point of the offset biarc closest to `(qx, qy)`.
    #[must_use]
    pub fn closest_point_iso(&self, qx: f64, qy: f64, offs: f64) -> ClosestPoint {
        let q = Point2::new(qx, qy);
        let first = ClosestPointOnCurve::new(&self.c0, q).with_offset(offs).execute();
        let mut second = ClosestPointOnCurve::new(&self.c1, q).with_offset(offs).execute();
        second.s += self.c0.length();
        if second.distance < first.distance {
            second
        } else {
            first
        }
    }
}

/// `[g, g', g'']` for `g(x) = sin(x) + x cos(x)`, the derivative of the
/// bending energy `x sin(x)` of an arc with half-angle `x`.
fn gfun(alpha: f64) -> [f64; 3] {
    let (so, co) = alpha.sin_cos();
    let oco = alpha * co;
    [so + oco, 2.0 * co - alpha * so, -3.0 * so - oco]
}

impl Curve for Biarc {
    fn length(&self) -> f64 {
        self.c0.length() + self.c1.length()
    }

    fn length_iso(&self, offs: f64) -> f64 {
        self.c0.length_iso(offs) + self.c1.length_iso(offs)
    }

    fn theta(&self, s: f64) -> f64 {
        let (arc, s) = self.locate(s);
        arc.theta(s)
    }

    fn theta_d(&self, s: f64) -> f64 {
        let (arc, s) = self.locate(s);
        arc.theta_d(s)
    }

    fn eval(&self, s: f64) -> Point2 {
        let (arc, s) = self.locate(s);
        arc.eval(s)
    }

    fn bbox_iso(&self, offs: f64) -> Aabb2 {
        self.c0.bbox_iso(offs).union(&self.c1.bbox_iso(offs))
    }

    fn bb_triangles_iso(&self, offs: f64, opts: &CoverOptions, icurve: usize) -> Vec<Triangle2D> {
        let mut tvec = self.c0.bb_triangles_iso(offs, opts, icurve);
        let l0 = self.c0.length();
        tvec.extend(
            self.c1
                .bb_triangles_iso(offs, opts, icurve + 1)
                .into_iter()
                .map(|t| t.reparametrized(l0, icurve + 1)),
        );
        tvec
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        self.c0.translate(tx, ty);
        self.c1.translate(tx, ty);
    }

    fn rotate(&mut self, angle: f64, cx: f64, cy: f64) {
        self.c0.rotate(angle, cx, cy);
        self.c1.rotate(angle, cx, cy);
    }

    fn scale(&mut self, sc: f64) {
        let start = self.c0.start_point();
        let mid = start + (self.c1.start_point() - start) * sc;
        self.c1.change_origin(mid.x, mid.y);
        self.c1.scale(sc);
        self.c0.scale(sc);
    }

    fn reverse(&mut self) {
        std::mem::swap(&mut self.c0, &mut self.c1);
        self.c0.reverse();
        self.c1.reverse();
    }

    fn change_origin(&mut self, newx0: f64, newy0: f64) {
        self.c0.change_origin(newx0, newy0);
        let mid = self.c0.end_point();
        self.c1.change_origin(mid.x, mid.y);
    }

    fn trim(&mut self, s_begin: f64, s_end: f64) -> Result<()> {
        let l0 = self.c0.length();
        let l = self.length();
        let slack = TOLERANCE * (1.0 + l);
        if s_begin > s_end || s_begin < -slack || s_end > l + slack {
            return Err(OperationError::InvalidInput(format!(
                "cannot trim biarc of length {l} to [{s_begin}, {s_end}]"
            ))
            .into());
        }
        let s_begin = s_begin.clamp(0.0, l);
        let s_end = s_end.clamp(s_begin, l);
        let (mut c0, mut c1) = (self.c0, self.c1);
        if s_end <= l0 {
            c0.trim(s_begin, s_end)?;
            // C1 collapses onto the end of what is left of C0.
            c1 = c0;
            c1.trim(c0.length(), c0.length())?;
        } else if s_begin >= l0 {
            c1.trim(s_begin - l0, s_end - l0)?;
            c0 = c1;
            c0.trim(0.0, 0.0)?;
        } else {
            c0.trim(s_begin, l0)?;
            c1.trim(0.0, s_end - l0)?;
        }
        self.c0 = c0;
        self.c1 = c1;
        Ok(())
    }
}

impl fmt::Display for Biarc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BiArc")?;
        writeln!(f, "C0: {}", self.c0)?;
        write!(f, "C1: {}", self.c1)
    }
}

/// Guesses a heading at every vertex of a polyline.
///
/// Interior headings are the junction tangents of the minimum-energy biarcs
/// through consecutive point triples; the end headings come from the first
/// and last of those biarcs. Two points share the chord heading.
///
/// # Errors
///
/// Returns an error for fewer than two points or when one of the three-point
/// biarcs cannot be built.
pub fn guess_theta(points: &[Point2]) -> Result<Vec<f64>> {
    let n = points.len();
    if n < 2 {
        return Err(OperationError::InvalidInput(format!(
            "need at least two points to guess headings, got {n}"
        ))
        .into());
    }
    if n == 2 {
        let d = points[1] - points[0];
        let th = d.y.atan2(d.x);
        return Ok(vec![th, th]);
    }
    let mut theta = vec![0.0; n];
    let mut ba = Biarc::default();
    for k in 1..n - 1 {
        let (p, q, r) = (&points[k - 1], &points[k], &points[k + 1]);
        ba.build_3p(p.x, p.y, q.x, q.y, r.x, r.y)?;
        if k == 1 {
            theta[0] = ba.theta_begin();
        }
        theta[k] = ba.theta_middle();
    }
    theta[n - 1] = ba.theta_end();
    Ok(theta)
}
