use geo::{LineString, MultiPolygon, Polygon, Simplify};

/// Smallest closed ring: three distinct vertices plus the closing vertex.
const MIN_RING_COORDS: usize = 4;

/// Simplify a MultiPolygon using Douglas-Peucker.
/// Rings that would collapse below a triangle keep their original vertices.
pub(crate) fn simplify_multipolygon(mp: &MultiPolygon<f64>, tolerance: f64) -> MultiPolygon<f64> {
    if tolerance <= 0.0 { return mp.clone() }

    let simplify_ring = |ring: &LineString<f64>| {
        let simplified = ring.simplify(&tolerance);
        if simplified.0.len() >= MIN_RING_COORDS { simplified } else { ring.clone() }
    };

    MultiPolygon(mp.0.iter()
        .map(|poly| Polygon::new(
            simplify_ring(poly.exterior()),
            poly.interiors().iter().map(simplify_ring).collect(),
        ))
        .collect())
}

/// Close every ring, drop degenerate holes and drop polygons whose exterior is degenerate.
pub(crate) fn clean_multipolygon(mp: MultiPolygon<f64>) -> MultiPolygon<f64> {
    fn usable(ring: &LineString<f64>) -> bool {
        ring.0.len() >= MIN_RING_COORDS && ring.0.iter().all(|c| c.x.is_finite() && c.y.is_finite())
    }

    MultiPolygon(mp.0.into_iter()
        .filter_map(|poly| {
            // Polygon::new closes open rings
            let (exterior, interiors) = poly.into_inner();
            let poly = Polygon::new(exterior, interiors);
            if !usable(poly.exterior()) { return None }
            let (exterior, interiors) = poly.into_inner();
            Some(Polygon::new(exterior, interiors.into_iter().filter(usable).collect()))
        })
        .collect())
}
