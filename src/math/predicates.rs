//! Orientation and containment predicates on raw point triples.
//!
//! All predicates return a three-way outcome: the degenerate or on-border case
//! is reported as `0` and never folded into one of the other answers.

use super::distance_2d::point_to_segment_dist;
use super::{cross, left_normal, Point2, Vector2};

/// Relative threshold under which a cross product counts as zero.
const COLLINEAR_EPS: f64 = 1e-12;

/// Orientation of the triple `p1, p2, p3`.
///
/// Returns `+1` for counter-clockwise, `-1` for clockwise and `0` for
/// collinear (degenerate) points.
#[must_use]
pub fn is_counter_clockwise(p1: &Point2, p2: &Point2, p3: &Point2) -> i32 {
    let d1 = p2 - p1;
    let d2 = p3 - p1;
    let c = cross(&d1, &d2);
    let scale = d1.norm() * d2.norm();
    if c.abs() <= COLLINEAR_EPS * scale || scale == 0.0 {
        0
    } else if c > 0.0 {
        1
    } else {
        -1
    }
}

/// Position of `pt` relative to the closed triangle `p1, p2, p3`.
///
/// Returns `+1` strictly inside, `-1` strictly outside and `0` on an edge.
/// A collinear triangle is treated as the segment it spans: points on that
/// segment are on the border, everything else is outside.
#[must_use]
pub fn is_point_in_triangle(pt: &Point2, p1: &Point2, p2: &Point2, p3: &Point2) -> i32 {
    let d = is_counter_clockwise(p1, p2, p3);
    if d == 0 {
        return point_on_degenerate(pt, [p1, p2, p3]);
    }
    let mut a = is_counter_clockwise(p1, p2, pt);
    let mut b = is_counter_clockwise(p2, p3, pt);
    let mut c = is_counter_clockwise(p3, p1, pt);
    if d < 0 {
        a = -a;
        b = -b;
        c = -c;
    }
    if a < 0 || b < 0 || c < 0 {
        -1
    } else if a > 0 && b > 0 && c > 0 {
        1
    } else {
        0
    }
}

fn point_on_degenerate(pt: &Point2, tri: [&Point2; 3]) -> i32 {
    // The longest edge spans every vertex of a collinear triple.
    let mut best = (tri[0], tri[1]);
    let mut best_len = (tri[1] - tri[0]).norm_squared();
    for (a, b) in [(tri[1], tri[2]), (tri[2], tri[0])] {
        let len = (b - a).norm_squared();
        if len > best_len {
            best = (a, b);
            best_len = len;
        }
    }
    let eps = COLLINEAR_EPS * (1.0 + best_len.sqrt());
    if point_to_segment_dist(pt, best.0, best.1) <= eps {
        0
    } else {
        -1
    }
}

/// Whether two closed triangles share at least one point.
///
/// Separating-axis test over the edge directions and edge normals of both
/// triangles. Including the edge directions keeps the test exact when a
/// triangle collapses to a segment or a point.
#[must_use]
pub fn triangles_overlap(a: &[Point2; 3], b: &[Point2; 3]) -> bool {
    let extent = a
        .iter()
        .chain(b.iter())
        .fold(1.0_f64, |m, p| m.max(p.x.abs()).max(p.y.abs()));
    let eps = COLLINEAR_EPS * extent;

    let mut any_axis = false;
    for tri in [a, b] {
        for i in 0..3 {
            let e = tri[(i + 1) % 3] - tri[i];
            if e.norm_squared() == 0.0 {
                continue;
            }
            any_axis = true;
            if separated_along(&e, a, b, eps) || separated_along(&left_normal(&e), a, b, eps) {
                return false;
            }
        }
    }
    if !any_axis {
        // Both triangles are single points.
        return (a[0] - b[0]).norm() <= eps;
    }
    true
}

fn separated_along(axis: &Vector2, a: &[Point2; 3], b: &[Point2; 3], eps: f64) -> bool {
    let len = axis.norm();
    let u = axis / len;
    let (a_min, a_max) = project(&u, a);
    let (b_min, b_max) = project(&u, b);
    a_max < b_min - eps || b_max < a_min - eps
}

fn project(u: &Vector2, tri: &[Point2; 3]) -> (f64, f64) {
    tri.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        let d = u.x * p.x + u.y * p.y;
        (lo.min(d), hi.max(d))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn tri(p: [(f64, f64); 3]) -> [Point2; 3] {
        [pt(p[0].0, p[0].1), pt(p[1].0, p[1].1), pt(p[2].0, p[2].1)]
    }

    #[test]
    fn orientation_three_way() {
        let a = pt(0.0, 0.0);
        let b = pt(1.0, 0.0);
        assert_eq!(is_counter_clockwise(&a, &b, &pt(0.0, 1.0)), 1);
        assert_eq!(is_counter_clockwise(&a, &b, &pt(0.0, -1.0)), -1);
        assert_eq!(is_counter_clockwise(&a, &b, &pt(3.0, 0.0)), 0);
        assert_eq!(is_counter_clockwise(&a, &a, &b), 0);
    }

    #[test]
    fn point_in_triangle_inside_outside_border() {
        let [p1, p2, p3] = tri([(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)]);
        assert_eq!(is_point_in_triangle(&pt(0.5, 0.5), &p1, &p2, &p3), 1);
        assert_eq!(is_point_in_triangle(&pt(2.0, 2.0), &p1, &p2, &p3), -1);
        assert_eq!(is_point_in_triangle(&pt(1.0, 0.0), &p1, &p2, &p3), 0);
        assert_eq!(is_point_in_triangle(&pt(1.0, 1.0), &p1, &p2, &p3), 0);
        // Winding does not matter.
        assert_eq!(is_point_in_triangle(&pt(0.5, 0.5), &p1, &p3, &p2), 1);
    }

    #[test]
    fn point_in_degenerate_triangle() {
        let [p1, p2, p3] = tri([(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(is_point_in_triangle(&pt(1.5, 1.5), &p1, &p2, &p3), 0);
        assert_eq!(is_point_in_triangle(&pt(3.0, 3.0), &p1, &p2, &p3), -1);
        assert_eq!(is_point_in_triangle(&pt(1.0, 0.0), &p1, &p2, &p3), -1);
    }

    #[test]
    fn overlap_cases() {
        let t = tri([(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)]);
        // Crossing.
        assert!(triangles_overlap(&t, &tri([(1.0, -1.0), (1.0, 3.0), (3.0, 1.0)])));
        // Contained.
        assert!(triangles_overlap(&t, &tri([(0.1, 0.1), (0.3, 0.1), (0.1, 0.3)])));
        // Touching at a vertex counts.
        assert!(triangles_overlap(&t, &tri([(2.0, 0.0), (3.0, 0.0), (3.0, 1.0)])));
        // Separated by the hypotenuse.
        assert!(!triangles_overlap(&t, &tri([(1.5, 1.5), (3.0, 1.5), (1.5, 3.0)])));
    }

    #[test]
    fn overlap_with_degenerate_triangles() {
        let seg = tri([(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let other = tri([(3.0, 0.0), (4.0, 0.0), (5.0, 0.0)]);
        assert!(!triangles_overlap(&seg, &other));
        let cross_seg = tri([(1.0, -1.0), (1.0, 0.0), (1.0, 1.0)]);
        assert!(triangles_overlap(&seg, &cross_seg));
        let point = tri([(1.0, 0.0), (1.0, 0.0), (1.0, 0.0)]);
        assert!(triangles_overlap(&seg, &point));
        let far_point = tri([(1.0, 0.5), (1.0, 0.5), (1.0, 0.5)]);
        assert!(!triangles_overlap(&seg, &far_point));
    }
}
