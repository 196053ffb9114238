pub mod arc_2d;
pub mod distance_2d;
pub mod predicates;
pub mod solve;

use std::f64::consts::PI;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Maps an angle into `(-π, π]`.
#[must_use]
pub fn range_symm(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// Unit vector with heading `theta`.
#[must_use]
pub fn heading(theta: f64) -> Vector2 {
    let (s, c) = theta.sin_cos();
    Vector2::new(c, s)
}

/// 2D cross product `a.x * b.y - a.y * b.x`.
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: &Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn range_symm_wraps_into_half_open_interval() {
        assert_abs_diff_eq!(range_symm(3.0 * PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(range_symm(-PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(range_symm(PI / 3.0 + 4.0 * PI), PI / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(range_symm(-7.0 * PI / 4.0), PI / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn cross_sign_follows_winding() {
        let x = Vector2::new(1.0, 0.0);
        let y = Vector2::new(0.0, 1.0);
        assert!(cross(&x, &y) > 0.0);
        assert!(cross(&y, &x) < 0.0);
        assert_abs_diff_eq!(left_normal(&x), y);
    }
}
