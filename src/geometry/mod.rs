// geometry/mod.rs

// Geodetic primitives shared by the decomposition and the planners: locations,
// the planar offset/rotation helpers and the survey polygon.

pub mod geo;
pub mod polygon;

pub use geo::{centroid, rotate_around, translate, Location};
pub use polygon::{Boundary, Polygon};
