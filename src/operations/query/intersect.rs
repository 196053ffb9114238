use super::refine::{search, SearchMode, Side};
use super::{IntersectList, IntersectOptions};
use crate::geometry::curve::Curve;

/// Computes the parameter pairs at which two offset curves cross.
pub struct CurveCurveIntersect<'a, A, B> {
    a: &'a A,
    b: &'a B,
    offs_a: f64,
    offs_b: f64,
    options: IntersectOptions,
}

impl<'a, A, B> CurveCurveIntersect<'a, A, B>
where
    A: Curve + Clone,
    B: Curve + Clone,
{
    /// Creates a new `CurveCurveIntersect` query on the curves themselves.
    #[must_use]
    pub fn new(a: &'a A, b: &'a B) -> Self {
        Self {
            a,
            b,
            offs_a: 0.0,
            offs_b: 0.0,
            options: IntersectOptions::default(),
        }
    }

    /// Intersects the ISO offsets of the curves instead.
    #[must_use]
    pub fn with_offsets(mut self, offs_a: f64, offs_b: f64) -> Self {
        self.offs_a = offs_a;
        self.offs_b = offs_b;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: IntersectOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes the query, returning one `(s_a, s_b)` pair per crossing.
    ///
    /// Tangential contacts are reported once when the Newton iteration
    /// converges on them and omitted when its Jacobian is singular.
    #[must_use]
    pub fn execute(&self) -> IntersectList {
        search(
            &Side {
                curve: self.a,
                offs: self.offs_a,
            },
            &Side {
                curve: self.b,
                offs: self.offs_b,
            },
            &self.options,
            SearchMode::AllCrossings,
        )
        .hits
    }
}

/// Adds `pair` to `ilist` unless an entry within `tol` in both parameters is
/// already there.
pub fn merge_candidate(ilist: &mut IntersectList, pair: (f64, f64), tol: f64) {
    let (sa, sb) = pair;
    let known = ilist
        .iter()
        .any(|&(ta, tb)| (ta - sa).abs() <= tol && (tb - sb).abs() <= tol);
    if !known {
        ilist.push(pair);
    }
}
