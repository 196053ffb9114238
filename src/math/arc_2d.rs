/// 2D circular arc math utilities.
///
/// Arcs are described by start point, start heading `theta0`, signed
/// curvature `k` and arc length. `k = 0` is a straight segment, `k > 0`
/// turns counter-clockwise.
use std::f64::consts::FRAC_PI_2;

use super::{left_normal, range_symm, Point2, Vector2};

/// `sin(x) / x`, continuous at zero.
#[must_use]
pub fn sinc(x: f64) -> f64 {
    if x.abs() < 0.002 {
        let x2 = x * x;
        1.0 - x2 / 6.0 * (1.0 - x2 / 20.0)
    } else {
        x.sin() / x
    }
}

/// Evaluates a point on an arc at arc length `s`.
///
/// Uses the chord form `p0 + s * sinc(k s / 2) * (cos, sin)(theta0 + k s / 2)`,
/// which stays exact for `k -> 0`.
#[must_use]
pub fn arc_point_at(x0: f64, y0: f64, theta0: f64, k: f64, s: f64) -> (f64, f64) {
    let half = k * s / 2.0;
    let chord = s * sinc(half);
    let (sn, cs) = (theta0 + half).sin_cos();
    (x0 + chord * cs, y0 + chord * sn)
}

/// Curvature and length of the arc leaving `(x0, y0)` with heading `theta0`
/// and ending at `(x1, y1)`.
///
/// Returns `None` for a zero-length chord or when the chord points straight
/// back against `theta0` (no finite arc exists).
#[must_use]
pub fn arc_from_g1(x0: f64, y0: f64, theta0: f64, x1: f64, y1: f64) -> Option<(f64, f64)> {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let chord = dx.hypot(dy);
    if chord < 1e-14 * (1.0 + x0.abs().max(y0.abs())) {
        return None;
    }
    let delta = range_symm(dy.atan2(dx) - theta0);
    let sc = sinc(delta);
    if sc < 1e-8 {
        return None;
    }
    let k = 2.0 * delta.sin() / chord;
    Some((k, chord / sc))
}

/// Apex of the triangle bounding an arc piece from `a` to `b` that turns by
/// `dtheta`: the intersection of the end tangents.
///
/// `|dtheta|` must stay below `π`. For a straight piece the apex is the chord
/// midpoint and the triangle collapses to the chord.
#[must_use]
pub fn tangent_apex(a: &Point2, b: &Point2, dtheta: f64) -> Point2 {
    let mid = Point2::from((a.coords + b.coords) * 0.5);
    let chord: Vector2 = b - a;
    let len = chord.norm();
    if len < 1e-300 || dtheta == 0.0 {
        return mid;
    }
    let n = left_normal(&(chord / len));
    mid - n * (0.5 * len * (dtheta / 2.0).tan())
}

/// Fractions `t` in `(0, 1)` where the heading `theta0 + t * dtheta` crosses a
/// multiple of `π/2`, i.e. where an arc reaches an axis-aligned extreme.
#[must_use]
pub fn axis_crossings(theta0: f64, dtheta: f64) -> Vec<f64> {
    let mut out = Vec::new();
    if dtheta.abs() < 1e-300 {
        return out;
    }
    let (lo, hi) = if dtheta > 0.0 {
        (theta0, theta0 + dtheta)
    } else {
        (theta0 + dtheta, theta0)
    };
    let mut m = (lo / FRAC_PI_2).floor() + 1.0;
    while m * FRAC_PI_2 < hi {
        out.push((m * FRAC_PI_2 - theta0) / dtheta);
        m += 1.0;
    }
    if dtheta < 0.0 {
        out.reverse();
    }
    out
}

/// Number of pieces needed so that each piece of an arc turns at most
/// `max_angle` and is at most `max_size` long.
#[must_use]
pub fn arc_subdivision_count(abs_sweep: f64, length: f64, max_angle: f64, max_size: f64) -> usize {
    let max_angle = max_angle.clamp(1e-6, FRAC_PI_2);
    // Shave off rounding noise so exact multiples do not add a piece.
    let by_angle = (abs_sweep / max_angle * (1.0 - 1e-12)).ceil();
    let by_size = if max_size > 0.0 {
        (length / max_size * (1.0 - 1e-12)).ceil()
    } else {
        1.0
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = by_angle.max(by_size).min(1e6) as usize;
    n.max(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    const TOL: f64 = 1e-12;

    #[test]
    fn sinc_is_smooth_at_zero() {
        assert_abs_diff_eq!(sinc(0.0), 1.0, epsilon = TOL);
        // Both branches agree at the switch-over.
        assert_abs_diff_eq!(sinc(0.002), 0.002_f64.sin() / 0.002, epsilon = 1e-15);
    }

    #[test]
    fn quarter_circle_point() {
        // Unit circle centred at (0, 1), starting at origin heading +x.
        let (x, y) = arc_point_at(0.0, 0.0, 0.0, 1.0, FRAC_PI_2);
        assert_abs_diff_eq!(x, 1.0, epsilon = TOL);
        assert_abs_diff_eq!(y, 1.0, epsilon = TOL);
    }

    #[test]
    fn straight_segment_point() {
        let (x, y) = arc_point_at(1.0, 2.0, FRAC_PI_2, 0.0, 3.0);
        assert_abs_diff_eq!(x, 1.0, epsilon = TOL);
        assert_abs_diff_eq!(y, 5.0, epsilon = TOL);
    }

    #[test]
    fn g1_semicircle() {
        let (k, l) = arc_from_g1(0.0, 0.0, FRAC_PI_2, 2.0, 0.0).unwrap();
        assert_abs_diff_eq!(k, -1.0, epsilon = TOL);
        assert_abs_diff_eq!(l, PI, epsilon = 1e-10);
    }

    #[test]
    fn g1_rejects_backward_chord_and_zero_chord() {
        assert!(arc_from_g1(0.0, 0.0, 0.0, -1.0, 0.0).is_none());
        assert!(arc_from_g1(1.0, 1.0, 0.3, 1.0, 1.0).is_none());
    }

    #[test]
    fn apex_of_quarter_arc() {
        // Quarter arc (1,0) -> (0,1) on the unit circle, CCW: tangents meet at (1,1).
        let a = Point2::new(1.0, 0.0);
        let b = Point2::new(0.0, 1.0);
        let apex = tangent_apex(&a, &b, FRAC_PI_2);
        assert_abs_diff_eq!(apex.x, 1.0, epsilon = TOL);
        assert_abs_diff_eq!(apex.y, 1.0, epsilon = TOL);
    }

    #[test]
    fn axis_crossings_in_both_directions() {
        let up = axis_crossings(0.1, PI);
        assert_eq!(up.len(), 2);
        assert_abs_diff_eq!(0.1 + up[0] * PI, FRAC_PI_2, epsilon = TOL);
        let down = axis_crossings(0.1, -PI);
        assert_eq!(down.len(), 2);
        assert!(down[0] < down[1]);
        assert_abs_diff_eq!(0.1 - down[0] * PI, 0.0, epsilon = TOL);
    }

    #[test]
    fn subdivision_count_respects_both_limits() {
        assert_eq!(arc_subdivision_count(PI, 1.0, PI / 18.0, 1e100), 18);
        assert_eq!(arc_subdivision_count(0.0, 10.0, PI / 18.0, 1.0), 10);
        assert_eq!(arc_subdivision_count(0.0, 0.0, PI / 18.0, 1.0), 1);
    }
}
