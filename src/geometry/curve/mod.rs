mod biarc;
mod circle_arc;

pub use biarc::{guess_theta, Biarc};
pub use circle_arc::CircleArc;

use std::f64::consts::PI;

use super::{Aabb2, Triangle2D};
use crate::error::Result;
use crate::math::{heading, left_normal, Point2, Vector2};

/// Position, heading and curvature of a curve at one arc-length value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveState {
    /// Point on the curve.
    pub point: Point2,
    /// Heading of the tangent.
    pub theta: f64,
    /// Signed curvature.
    pub kappa: f64,
}

/// Parameters of a triangle cover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverOptions {
    /// Largest heading swing bounded by one triangle. Values above `π/2` are
    /// treated as `π/2`.
    pub max_angle: f64,
    /// Largest curve length bounded by one triangle.
    pub max_size: f64,
}

impl Default for CoverOptions {
    fn default() -> Self {
        Self {
            max_angle: PI / 18.0,
            max_size: 1e100,
        }
    }
}

/// A planar curve parametrised by arc length `s` in `[0, length()]`.
///
/// Lateral offsets follow the ISO convention: a positive `offs` moves the
/// point to the left of the direction of travel. The SAE convention is the
/// same offset with the sign flipped.
pub trait Curve {
    /// Arc length of the curve.
    fn length(&self) -> f64;

    /// Arc length of the curve offset by `offs`.
    fn length_iso(&self, offs: f64) -> f64;

    /// Heading at `s`.
    fn theta(&self, s: f64) -> f64;

    /// Curvature at `s`.
    fn theta_d(&self, s: f64) -> f64;

    /// Derivative of the curvature at `s`. Zero for piecewise-circular curves.
    fn theta_dd(&self, _s: f64) -> f64 {
        0.0
    }

    /// Second derivative of the curvature at `s`.
    fn theta_ddd(&self, _s: f64) -> f64 {
        0.0
    }

    /// Point at `s`.
    fn eval(&self, s: f64) -> Point2;

    /// Axis-aligned bounding box of the curve offset by `offs`.
    fn bbox_iso(&self, offs: f64) -> Aabb2;

    /// Triangle cover of the curve offset by `offs`. Every triangle is tagged
    /// with the interval of `s` it bounds and with a curve index starting at
    /// `icurve`.
    fn bb_triangles_iso(&self, offs: f64, opts: &CoverOptions, icurve: usize) -> Vec<Triangle2D>;

    fn translate(&mut self, tx: f64, ty: f64);

    /// Rotates by `angle` around `(cx, cy)`.
    fn rotate(&mut self, angle: f64, cx: f64, cy: f64);

    /// Scales by `sc` about the start point.
    fn scale(&mut self, sc: f64);

    /// Reverses the direction of travel.
    fn reverse(&mut self);

    /// Moves the curve rigidly so that it starts at `(newx0, newy0)`.
    fn change_origin(&mut self, newx0: f64, newy0: f64);

    /// Keeps only the piece `[s_begin, s_end]`, re-based to start at `s = 0`.
    ///
    /// # Errors
    ///
    /// Returns an error if `s_begin > s_end` or the interval leaves the curve.
    fn trim(&mut self, s_begin: f64, s_end: f64) -> Result<()>;

    /// Copy of the piece `[s_begin, s_end]`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Curve::trim`].
    fn trimmed(&self, s_begin: f64, s_end: f64) -> Result<Self>
    where
        Self: Sized + Clone,
    {
        let mut piece = self.clone();
        piece.trim(s_begin, s_end)?;
        Ok(piece)
    }

    /// Curvature at `s`.
    fn kappa(&self, s: f64) -> f64 {
        self.theta_d(s)
    }

    /// Unit tangent at `s`.
    fn tg(&self, s: f64) -> Vector2 {
        heading(self.theta(s))
    }

    /// Unit normal pointing left of the direction of travel.
    fn nor_iso(&self, s: f64) -> Vector2 {
        left_normal(&self.tg(s))
    }

    fn eval_d(&self, s: f64) -> Vector2 {
        self.tg(s)
    }

    fn eval_dd(&self, s: f64) -> Vector2 {
        self.nor_iso(s) * self.theta_d(s)
    }

    fn eval_ddd(&self, s: f64) -> Vector2 {
        let k = self.theta_d(s);
        self.nor_iso(s) * self.theta_dd(s) - self.tg(s) * (k * k)
    }

    fn eval_iso(&self, s: f64, offs: f64) -> Point2 {
        self.eval(s) + self.nor_iso(s) * offs
    }

    fn eval_iso_d(&self, s: f64, offs: f64) -> Vector2 {
        self.tg(s) * (1.0 - self.theta_d(s) * offs)
    }

    fn eval_iso_dd(&self, s: f64, offs: f64) -> Vector2 {
        let k = self.theta_d(s);
        self.nor_iso(s) * (k * (1.0 - k * offs)) - self.tg(s) * (self.theta_dd(s) * offs)
    }

    fn eval_iso_ddd(&self, s: f64, offs: f64) -> Vector2 {
        let k = self.theta_d(s);
        let dk = self.theta_dd(s);
        self.nor_iso(s) * (dk * (1.0 - 3.0 * k * offs))
            - self.tg(s) * (k * k * (1.0 - k * offs) + self.theta_ddd(s) * offs)
    }

    fn eval_sae(&self, s: f64, offs: f64) -> Point2 {
        self.eval_iso(s, -offs)
    }

    fn eval_sae_d(&self, s: f64, offs: f64) -> Vector2 {
        self.eval_iso_d(s, -offs)
    }

    fn length_sae(&self, offs: f64) -> f64 {
        self.length_iso(-offs)
    }

    fn evaluate(&self, s: f64) -> CurveState {
        CurveState {
            point: self.eval(s),
            theta: self.theta(s),
            kappa: self.theta_d(s),
        }
    }

    fn evaluate_iso(&self, s: f64, offs: f64) -> CurveState {
        let k = self.theta_d(s);
        CurveState {
            point: self.eval_iso(s, offs),
            theta: self.theta(s),
            kappa: k / (1.0 - k * offs),
        }
    }

    fn bbox(&self) -> Aabb2 {
        self.bbox_iso(0.0)
    }

    fn bbox_sae(&self, offs: f64) -> Aabb2 {
        self.bbox_iso(-offs)
    }

    fn bb_triangles(&self, opts: &CoverOptions, icurve: usize) -> Vec<Triangle2D> {
        self.bb_triangles_iso(0.0, opts, icurve)
    }

    fn bb_triangles_sae(&self, offs: f64, opts: &CoverOptions, icurve: usize) -> Vec<Triangle2D> {
        self.bb_triangles_iso(-offs, opts, icurve)
    }

    fn start_point(&self) -> Point2 {
        self.eval(0.0)
    }

    fn end_point(&self) -> Point2 {
        self.eval(self.length())
    }

    fn theta_begin(&self) -> f64 {
        self.theta(0.0)
    }

    fn theta_end(&self) -> f64 {
        self.theta(self.length())
    }
}
