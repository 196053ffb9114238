//! Small iterative and direct solvers.

use crate::error::SolverError;

/// Finds a root of a scalar function inside the bracket `[lo, hi]` with
/// Halley's method.
///
/// `f` returns `[f(x), f'(x), f''(x)]` and must change sign over the bracket.
/// Every evaluation shrinks the bracket. A Halley step that leaves it, or
/// that fails to halve the bracket width of the step before, is replaced by
/// bisection, so the iteration cannot stall or escape. When the Halley
/// denominator vanishes the step falls back to plain Newton.
///
/// # Errors
///
/// Returns [`SolverError::NoSignChange`] when `f` has the same sign at both
/// ends and [`SolverError::NotConverged`] if `|f(x)| <= tol` is not reached
/// within `max_iter` steps.
pub fn halley<F>(f: F, lo: f64, hi: f64, x0: f64, tol: f64, max_iter: usize) -> Result<f64, SolverError>
where
    F: Fn(f64) -> [f64; 3],
{
    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let f_lo = f(lo)[0];
    if f_lo.abs() <= tol {
        return Ok(lo);
    }
    let f_hi = f(hi)[0];
    if f_hi.abs() <= tol {
        return Ok(hi);
    }
    if f_lo.signum() == f_hi.signum() {
        return Err(SolverError::NoSignChange { lo, hi });
    }
    let rising = f_hi > 0.0;

    let mut x = x0.clamp(lo, hi);
    let mut last_width = hi - lo;
    let mut residual = f64::INFINITY;
    for _ in 0..max_iter {
        let [g, g1, g2] = f(x);
        residual = g.abs();
        if residual <= tol {
            return Ok(x);
        }
        if (g > 0.0) == rising {
            hi = x;
        } else {
            lo = x;
        }
        let width = hi - lo;
        if width <= 4.0 * f64::EPSILON * (1.0 + x.abs()) {
            return Ok(x);
        }
        let denom = 2.0 * g1 * g1 - g * g2;
        let step = if denom.abs() > f64::EPSILON * (g1 * g1).max(1.0) {
            2.0 * g * g1 / denom
        } else {
            g / g1
        };
        let next = x - step;
        // NaN steps fail the comparisons and bisect too.
        x = if next > lo && next < hi && step.abs() < 0.5 * last_width {
            next
        } else {
            0.5 * (lo + hi)
        };
        last_width = width;
    }
    Err(SolverError::NotConverged {
        iterations: max_iter,
        residual,
    })
}

/// Solves the 2x2 system `[[a11, a12], [a21, a22]] * (x, y) = (b1, b2)`.
///
/// Returns `None` when the determinant is negligible relative to the matrix
/// entries.
#[must_use]
pub fn solve_2x2(a11: f64, a12: f64, a21: f64, a22: f64, b1: f64, b2: f64) -> Option<(f64, f64)> {
    let det = a11 * a22 - a12 * a21;
    let scale = (a11.abs() + a12.abs()) * (a21.abs() + a22.abs());
    if scale == 0.0 || det.abs() <= 1e-14 * scale {
        return None;
    }
    Some(((b1 * a22 - a12 * b2) / det, (a11 * b2 - b1 * a21) / det))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn halley_finds_cube_root() {
        let f = |x: f64| [x * x * x - 2.0, 3.0 * x * x, 6.0 * x];
        let root = halley(f, 0.0, 2.0, 1.0, 1e-14, 20).unwrap();
        assert_abs_diff_eq!(root, 2.0_f64.cbrt(), epsilon = 1e-12);
    }

    #[test]
    fn halley_accepts_reversed_bracket_and_end_root() {
        let f = |x: f64| [x - 1.0, 1.0, 0.0];
        assert_abs_diff_eq!(halley(f, 3.0, 0.0, 2.5, 1e-14, 10).unwrap(), 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(halley(f, 1.0, 4.0, 2.0, 1e-14, 10).unwrap(), 1.0);
    }

    #[test]
    fn halley_bisects_where_steps_overshoot() {
        // atan has a flat tail: unguarded Newton from x = 3 diverges.
        let f = |x: f64| {
            let d = 1.0 / (1.0 + x * x);
            [x.atan(), d, -2.0 * x * d * d]
        };
        let root = halley(f, -1.0, 10.0, 3.0, 1e-14, 100).unwrap();
        assert_abs_diff_eq!(root, 0.0, epsilon = 1e-13);
    }

    #[test]
    fn halley_survives_flat_derivative() {
        // f' vanishes at the seed; the bracket keeps the iteration alive.
        let f = |x: f64| [x * x * x, 3.0 * x * x, 6.0 * x];
        let root = halley(f, -1.0, 2.0, 0.5, 1e-14, 100).unwrap();
        assert!(root.abs() < 1e-4);
    }

    #[test]
    fn halley_requires_sign_change() {
        let err = halley(|x| [x * x + 1.0, 2.0 * x, 2.0], -1.0, 3.0, 0.0, 1e-12, 8).unwrap_err();
        assert!(matches!(err, SolverError::NoSignChange { .. }));
    }

    #[test]
    fn halley_reports_budget() {
        let f = |x: f64| [x - 0.123_456_789, 1.0e-3, 0.0];
        let err = halley(f, 0.0, 1.0, 1.0, 1e-300, 3).unwrap_err();
        assert!(matches!(err, SolverError::NotConverged { iterations: 3, .. }));
    }

    #[test]
    fn solve_2x2_regular_and_singular() {
        let (x, y) = solve_2x2(2.0, 1.0, 1.0, 3.0, 3.0, 5.0).unwrap();
        assert_abs_diff_eq!(x, 0.8, epsilon = 1e-14);
        assert_abs_diff_eq!(y, 1.4, epsilon = 1e-14);
        assert!(solve_2x2(1.0, 2.0, 2.0, 4.0, 1.0, 1.0).is_none());
    }
}
