use super::Point2;

/// Returns the minimum distance from point `p` to the line segment `a`-`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let t = project_on_segment(p, a, b);
    (p - (a + (b - a) * t)).norm()
}

/// Parameter in `[0, 1]` of the point of segment `a`-`b` closest to `p`.
/// A zero-length segment projects to `0`.
#[must_use]
pub fn project_on_segment(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < 1e-20 {
        return 0.0;
    }
    ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0)
}
