use super::refine::{search, SearchMode, Side};
use super::IntersectOptions;
use crate::geometry::curve::Curve;

/// Decides whether two offset curves touch or cross.
pub struct CurveCurveCollision<'a, A, B> {
    a: &'a A,
    b: &'a B,
    offs_a: f64,
    offs_b: f64,
    options: IntersectOptions,
}

impl<'a, A, B> CurveCurveCollision<'a, A, B>
where
    A: Curve + Clone,
    B: Curve + Clone,
{
    /// Creates a new `CurveCurveCollision` query on the curves themselves.
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

    /// Tests the ISO offsets of the curves instead.
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

    /// Executes the query. Stops at the first contact found.
    #[must_use]
    pub fn execute(&self) -> bool {
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
            SearchMode::FirstContact,
        )
        .in_contact()
    }
}
