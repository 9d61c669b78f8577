mod algorithm;
mod bbox;
mod boundary;
mod index;

use bbox::BoundingBox;
pub use boundary::BoundaryPolygon;
pub use index::{Candidates, SpatialIndex};
