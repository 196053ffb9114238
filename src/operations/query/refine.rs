//! Hierarchical triangle refinement shared by the collision and
//! intersection queries.
//!
//! Both curves are covered with triangles. Overlapping pairs are bisected
//! along their parameter intervals until both triangles are smaller than the
//! leaf size, then a 2x2 Newton iteration polishes the crossing.

use tracing::{debug, trace, warn};

use super::{merge_candidate, IntersectList, IntersectOptions};
use crate::geometry::curve::Curve;
use crate::geometry::Triangle2D;
use crate::math::solve::solve_2x2;

/// Newton steps allowed at one leaf pair.
const MAX_NEWTON_ITER: usize = 50;

/// Relative slack on the parameter range accepted for a Newton solution.
const PARAM_SLACK: f64 = 1e-8;

/// What the search should collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchMode {
    /// Stop at the first evidence of contact.
    FirstContact,
    /// Collect every crossing.
    AllCrossings,
}

/// Result of one refinement run.
#[derive(Debug, Default)]
pub(crate) struct SearchOutcome {
    /// Merged Newton solutions.
    pub hits: IntersectList,
    /// A leaf pair at leaf size still overlapped without a Newton solution.
    pub touching: bool,
}

impl SearchOutcome {
    pub(crate) fn in_contact(&self) -> bool {
        self.touching || !self.hits.is_empty()
    }
}

/// One offset curve taking part in the search.
pub(crate) struct Side<'a, C> {
    pub curve: &'a C,
    pub offs: f64,
}

impl<C: Curve> Side<'_, C> {
    fn cover(&self, options: &IntersectOptions, icurve: usize) -> Vec<Triangle2D> {
        self.curve.bb_triangles_iso(self.offs, &options.cover, icurve)
    }

    /// Covers of the two halves of the interval bounded by `t`.
    fn split(&self, t: &Triangle2D, options: &IntersectOptions) -> Vec<Triangle2D>
    where
        C: Clone,
    {
        let mid = 0.5 * (t.s0() + t.s1());
        let mut children = Vec::with_capacity(2);
        for (lo, hi) in [(t.s0(), mid), (mid, t.s1())] {
            match self.curve.trimmed(lo, hi) {
                Ok(piece) => children.extend(
                    piece
                        .bb_triangles_iso(self.offs, &options.cover, t.icurve())
                        .into_iter()
                        .map(|c| c.reparametrized(lo, t.icurve())),
                ),
                Err(e) => trace!(lo, hi, error = %e, "skipping piece that cannot be trimmed"),
            }
        }
        children
    }
}

/// Runs the refinement on the pair `(a, b)`.
pub(crate) fn search<A, B>(
    a: &Side<'_, A>,
    b: &Side<'_, B>,
    options: &IntersectOptions,
    mode: SearchMode,
) -> SearchOutcome
where
    A: Curve + Clone,
    B: Curve + Clone,
{
    let mut outcome = SearchOutcome::default();
    let ta = a.cover(options, 0);
    let tb = b.cover(options, 1);

    let mut stack: Vec<(Triangle2D, Triangle2D, usize)> = Vec::new();
    push_overlapping(&mut stack, &ta, &tb, 0);
    trace!(
        triangles_a = ta.len(),
        triangles_b = tb.len(),
        pairs = stack.len(),
        "coarse cover pairs"
    );

    let mut leaves = 0;
    let mut splits = 0;
    while let Some((x, y, depth)) = stack.pop() {
        let small = x.diameter() <= options.leaf_size && y.diameter() <= options.leaf_size;
        if !small && depth < options.max_depth {
            splits += 1;
            let xs = a.split(&x, options);
            let ys = b.split(&y, options);
            push_overlapping(&mut stack, &xs, &ys, depth + 1);
            continue;
        }
        if !small {
            debug!(depth, "refinement depth cap reached before leaf size");
        }
        if leaves >= options.max_leaves {
            warn!(
                max_leaves = options.max_leaves,
                pending = stack.len() + 1,
                "leaf budget exhausted, intersection list may be incomplete"
            );
            break;
        }
        leaves += 1;
        match newton(a, b, &x, &y, options) {
            Some(pair) => {
                merge_candidate(&mut outcome.hits, pair, options.merge_tolerance);
                if mode == SearchMode::FirstContact {
                    break;
                }
            }
            // Overlapping at leaf size without a crossing: tangential contact.
            None if small => {
                outcome.touching = true;
                if mode == SearchMode::FirstContact {
                    break;
                }
            }
            // A coarse leaf left by the depth cap is no evidence of contact.
            None => {}
        }
    }
    trace!(splits, leaves, hits = outcome.hits.len(), touching = outcome.touching, "refinement done");
    outcome
}

fn push_overlapping(
    stack: &mut Vec<(Triangle2D, Triangle2D, usize)>,
    xs: &[Triangle2D],
    ys: &[Triangle2D],
    depth: usize,
) {
    for x in xs {
        let bx = x.bbox();
        for y in ys {
            if bx.overlaps(&y.bbox()) && x.overlap(y) {
                stack.push((*x, *y, depth));
            }
        }
    }
}

/// Newton iteration on `P_a(s_a) - P_b(s_b) = 0` seeded at the interval
/// midpoints of a leaf pair.
fn newton<A: Curve, B: Curve>(
    a: &Side<'_, A>,
    b: &Side<'_, B>,
    x: &Triangle2D,
    y: &Triangle2D,
    options: &IntersectOptions,
) -> Option<(f64, f64)> {
    let mut sa = 0.5 * (x.s0() + x.s1());
    let mut sb = 0.5 * (y.s0() + y.s1());
    for _ in 0..MAX_NEWTON_ITER {
        let pa = a.curve.eval_iso(sa, a.offs);
        let pb = b.curve.eval_iso(sb, b.offs);
        let r = pa - pb;
        let scale = 1.0 + pa.coords.amax().max(pb.coords.amax());
        if r.norm() <= options.tolerance * scale {
            return accept(a, b, sa, sb);
        }
        let da = a.curve.eval_iso_d(sa, a.offs);
        let db = b.curve.eval_iso_d(sb, b.offs);
        let (dsa, dsb) = solve_2x2(da.x, -db.x, da.y, -db.y, -r.x, -r.y)?;
        sa += dsa;
        sb += dsb;
        if !(sa.is_finite() && sb.is_finite()) {
            return None;
        }
    }
    None
}

fn accept<A: Curve, B: Curve>(a: &Side<'_, A>, b: &Side<'_, B>, sa: f64, sb: f64) -> Option<(f64, f64)> {
    let la = a.curve.length();
    let lb = b.curve.length();
    let slack_a = PARAM_SLACK * (1.0 + la);
    let slack_b = PARAM_SLACK * (1.0 + lb);
    if sa < -slack_a || sa > la + slack_a || sb < -slack_b || sb > lb + slack_b {
        return None;
    }
    Some((sa.clamp(0.0, la), sb.clamp(0.0, lb)))
}
