use geo::{Coord, Rect};
use rstar::{RTreeObject, AABB};

/// A bounding box in an R-tree, associated with a boundary polygon by index.
#[derive(Debug, Clone)]
pub(super) struct BoundingBox {
    idx: usize, // Index of corresponding BoundaryPolygon in the index
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub(super) fn new(idx: usize, bbox: Rect<f64>) -> Self {
        Self { idx, bbox }
    }

    /// Get the index of the corresponding BoundaryPolygon.
    #[inline] pub(super) fn idx(&self) -> usize { self.idx }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Grow a rectangle by `pad` on every side.
pub(super) fn expand(rect: Rect<f64>, pad: f64) -> Rect<f64> {
    Rect::new(
        Coord { x: rect.min().x - pad, y: rect.min().y - pad },
        Coord { x: rect.max().x + pad, y: rect.max().y + pad },
    )
}

/// Smallest rectangle covering both inputs.
pub(super) fn union(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}
