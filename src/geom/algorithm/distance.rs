use std::iter::once;

use geo::{Coord, Distance, Euclidean, MultiPolygon, Point};

/// Returns true if `coord` lies within `tol` of any ring of `shape`.
///
/// Together with a containment test this is exactly membership in the
/// round-joined outward buffer of `shape` by `tol`.
pub(crate) fn within_distance(shape: &MultiPolygon<f64>, coord: Coord<f64>, tol: f64) -> bool {
    let point = Point::from(coord);
    shape.0.iter()
        .flat_map(|polygon| once(polygon.exterior()).chain(polygon.interiors()))
        .any(|ring| Euclidean.distance(&point, ring) <= tol)
}
