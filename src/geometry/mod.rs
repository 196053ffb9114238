mod aabb;
pub mod curve;
mod triangle;

pub use aabb::Aabb2;
pub use curve::{guess_theta, Biarc, CircleArc, CoverOptions, Curve, CurveState};
pub use triangle::Triangle2D;
