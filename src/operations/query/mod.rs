mod closest_point;
mod collision;
mod intersect;
mod refine;

pub use closest_point::{ClosestPoint, ClosestPointOnCurve};
pub use collision::CurveCurveCollision;
pub use intersect::{merge_candidate, CurveCurveIntersect};

use crate::geometry::curve::CoverOptions;

/// Parameter pairs `(s_a, s_b)` of intersection points, one entry per point.
pub type IntersectList = Vec<(f64, f64)>;

/// Parameters of the collision and intersection searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectOptions {
    /// Cover used for the first level of the search.
    pub cover: CoverOptions,
    /// Newton tolerance on the distance between the two points, relative to
    /// the coordinate scale.
    pub tolerance: f64,
    /// Triangles with a diameter at or below this size are not split further.
    pub leaf_size: f64,
    /// Maximum number of bisection levels.
    pub max_depth: usize,
    /// Maximum number of leaf pairs handed to Newton before the search gives up.
    pub max_leaves: usize,
    /// Solutions closer than this in both parameters are reported once.
    pub merge_tolerance: f64,
}

impl Default for IntersectOptions {
    fn default() -> Self {
        Self {
            cover: CoverOptions::default(),
            tolerance: 1e-10,
            leaf_size: 1e-4,
            max_depth: 40,
            max_leaves: 4096,
            merge_tolerance: 1e-4,
        }
    }
}
