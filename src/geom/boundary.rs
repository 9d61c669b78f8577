use geo::{Area, BoundingRect, Coord, Intersects, MultiPolygon, Point, Rect};

use crate::county::CountyId;
use super::algorithm::{clean_multipolygon, simplify_multipolygon, within_distance};
use super::bbox;

/// An immutable county boundary: simplified rings, an outward buffer, and the
/// bounding box of the buffered shape.
#[derive(Debug, Clone)]
pub struct BoundaryPolygon {
    county: CountyId,
    shape: MultiPolygon<f64>,
    bbox: Rect<f64>,
    buffer: f64,
    area: f64, // Planar area of the unbuffered shape, in square degrees
}

impl BoundaryPolygon {
    /// Prepare a county polygon for indexing.
    ///
    /// The shape is cleaned, simplified by `simplify` and expanded outward by
    /// `buffer` (both in degrees). Returns `None` if no usable ring survives.
    pub fn new(county: CountyId, shape: MultiPolygon<f64>, buffer: f64, simplify: f64) -> Option<Self> {
        let shape = clean_multipolygon(simplify_multipolygon(&clean_multipolygon(shape), simplify));
        if shape.0.is_empty() { return None }

        let buffer = buffer.max(0.0);
        let bbox = bbox::expand(shape.bounding_rect()?, buffer);
        let area = shape.unsigned_area();

        Some(Self { county, shape, bbox, buffer, area })
    }

    /// County this polygon belongs to.
    #[inline] pub fn county(&self) -> &CountyId { &self.county }

    /// Simplified, unbuffered geometry in (lon, lat) order.
    #[inline] pub fn shape(&self) -> &MultiPolygon<f64> { &self.shape }

    /// Bounding box of the buffered geometry.
    #[inline] pub fn bbox(&self) -> Rect<f64> { self.bbox }

    /// Outward buffer distance, in degrees.
    #[inline] pub fn buffer(&self) -> f64 { self.buffer }

    /// Planar area of the unbuffered geometry.
    #[inline] pub fn area(&self) -> f64 { self.area }

    /// Exact, ring-inclusive containment test against the unbuffered geometry.
    pub fn covers(&self, coord: Coord<f64>) -> bool {
        self.in_bbox(coord) && self.shape.intersects(&Point::from(coord))
    }

    /// True if `coord` lies within the buffer distance of a ring.
    /// Always false for an unbuffered polygon.
    pub fn within_buffer(&self, coord: Coord<f64>) -> bool {
        self.buffer > 0.0 && self.in_bbox(coord) && within_distance(&self.shape, coord, self.buffer)
    }

    /// Containment against the buffered polygon.
    pub fn contains(&self, coord: Coord<f64>) -> bool {
        self.covers(coord) || self.within_buffer(coord)
    }

    #[inline]
    fn in_bbox(&self, coord: Coord<f64>) -> bool {
        let (min, max) = (self.bbox.min(), self.bbox.max());
        min.x <= coord.x && coord.x <= max.x && min.y <= coord.y && coord.y <= max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Polygon};

    fn square(x0: f64, y0: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x0, y: y0), (x: x0 + size, y: y0), (x: x0 + size, y: y0 + size), (x: x0, y: y0 + size),
        ]])
    }

    fn county(name: &str) -> CountyId {
        CountyId::new(name).unwrap()
    }

    #[test]
    fn bbox_includes_buffer() {
        let polygon = BoundaryPolygon::new(county("Erie"), square(0.0, 0.0, 1.0), 0.1, 0.0).unwrap();
        assert_eq!(polygon.bbox().min(), Coord { x: -0.1, y: -0.1 });
        assert_eq!(polygon.bbox().max(), Coord { x: 1.1, y: 1.1 });
        assert!((polygon.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn containment_is_ring_inclusive() {
        let polygon = BoundaryPolygon::new(county("Erie"), square(0.0, 0.0, 1.0), 0.0, 0.0).unwrap();
        assert!(polygon.contains(Coord { x: 0.5, y: 0.5 }));
        assert!(polygon.contains(Coord { x: 1.0, y: 0.5 }));
        assert!(polygon.contains(Coord { x: 0.0, y: 0.0 }));
        assert!(!polygon.contains(Coord { x: 1.0001, y: 0.5 }));
    }

    #[test]
    fn buffer_absorbs_points_just_outside() {
        let polygon = BoundaryPolygon::new(county("Erie"), square(0.0, 0.0, 1.0), 0.01, 0.0).unwrap();
        assert!(polygon.contains(Coord { x: 1.005, y: 0.5 }));
        assert!(!polygon.contains(Coord { x: 1.02, y: 0.5 }));
    }

    #[test]
    fn buffer_band_is_separate_from_the_shape() {
        let buffered = BoundaryPolygon::new(county("Erie"), square(0.0, 0.0, 1.0), 0.01, 0.0).unwrap();
        assert!(!buffered.covers(Coord { x: 1.005, y: 0.5 }));
        assert!(buffered.within_buffer(Coord { x: 1.005, y: 0.5 }));
        assert!(buffered.covers(Coord { x: 0.5, y: 0.5 }));
        assert!(!buffered.within_buffer(Coord { x: 0.5, y: 0.5 }));

        let bare = BoundaryPolygon::new(county("Erie"), square(0.0, 0.0, 1.0), 0.0, 0.0).unwrap();
        assert!(!bare.within_buffer(Coord { x: 1.0, y: 0.5 }));
        assert!(bare.covers(Coord { x: 1.0, y: 0.5 }));
    }

    #[test]
    fn holes_are_excluded_beyond_the_buffer() {
        let outer = square(0.0, 0.0, 10.0).0.remove(0);
        let hole = square(4.0, 4.0, 2.0).0.remove(0);
        let shape = MultiPolygon(vec![Polygon::new(outer.exterior().clone(), vec![hole.exterior().clone()])]);
        let polygon = BoundaryPolygon::new(county("Erie"), shape, 0.1, 0.0).unwrap();

        assert!(!polygon.contains(Coord { x: 5.0, y: 5.0 }));
        assert!(polygon.contains(Coord { x: 4.05, y: 5.0 }));
        assert!(polygon.contains(Coord { x: 2.0, y: 2.0 }));
    }

    #[test]
    fn degenerate_shapes_are_rejected() {
        let empty = MultiPolygon::<f64>(vec![]);
        assert!(BoundaryPolygon::new(county("Erie"), empty, 0.0, 0.0).is_none());
    }
}
