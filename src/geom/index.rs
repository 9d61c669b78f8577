use geo::{Coord, Rect};
use rstar::{primitives::GeomWithData, RTree, AABB};
use smallvec::SmallVec;

use super::{bbox, BoundaryPolygon, BoundingBox};

/// Candidate polygon indices for a single point, in rank order.
pub type Candidates = SmallVec<[usize; 4]>;

/// SpatialIndex is an immutable, bulk-loaded R-tree over county boundary boxes.
///
/// The index only narrows candidates by bounding-box overlap; exact
/// containment is left to the resolver. Candidates are always reported in a
/// fixed rank order: smallest unbuffered area first, then county name, so that
/// overlapping buffers resolve the same way on every rebuild.
#[derive(Debug)]
pub struct SpatialIndex {
    polygons: Vec<BoundaryPolygon>,
    rtree: RTree<BoundingBox>,
    rank: Vec<u32>,
}

impl SpatialIndex {
    /// Bulk-build the index over all polygons.
    pub fn build(polygons: Vec<BoundaryPolygon>) -> Self {
        let rtree = RTree::bulk_load(
            polygons.iter().enumerate()
                .map(|(i, polygon)| BoundingBox::new(i, polygon.bbox()))
                .collect()
        );

        let mut order = (0..polygons.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| {
            polygons[a].area().total_cmp(&polygons[b].area())
                .then_with(|| polygons[a].county().cmp(polygons[b].county()))
                .then(a.cmp(&b))
        });

        let mut rank = vec![0; polygons.len()];
        for (r, &i) in order.iter().enumerate() {
            rank[i] = r as u32;
        }

        Self { polygons, rtree, rank }
    }

    /// Get the number of polygons.
    #[inline] pub fn len(&self) -> usize { self.polygons.len() }

    /// Check if there are no polygons.
    #[inline] pub fn is_empty(&self) -> bool { self.polygons.is_empty() }

    /// Get a reference to the polygon at `idx`.
    #[inline] pub fn polygon(&self, idx: usize) -> &BoundaryPolygon { &self.polygons[idx] }

    /// Get a reference to the list of polygons.
    #[inline] pub fn polygons(&self) -> &[BoundaryPolygon] { &self.polygons }

    /// Tie-break rank of the polygon at `idx` (lower wins).
    #[inline] pub fn rank(&self, idx: usize) -> u32 { self.rank[idx] }

    /// Indices of polygons whose bounding box contains `coord`, in rank order.
    pub fn query(&self, coord: Coord<f64>) -> Candidates {
        let envelope = AABB::from_point([coord.x, coord.y]);
        let mut candidates = self.rtree.locate_in_envelope_intersecting(&envelope)
            .map(|bb| bb.idx())
            .collect::<Candidates>();
        candidates.sort_unstable_by_key(|&idx| self.rank[idx]);
        candidates
    }

    /// All `(point_index, polygon_index)` bounding-box overlaps for `coords`,
    /// found by one simultaneous traversal of the polygon tree and a tree of
    /// the query points. Sorted by point, then by polygon rank.
    pub fn query_batch(&self, coords: &[Coord<f64>]) -> Vec<(usize, usize)> {
        if coords.is_empty() || self.is_empty() { return Vec::new() }

        let points = RTree::bulk_load(
            coords.iter().enumerate()
                .map(|(i, c)| GeomWithData::new([c.x, c.y], i))
                .collect()
        );

        let mut pairs = self.rtree.intersection_candidates_with_other_tree(&points)
            .map(|(bb, point)| (point.data, bb.idx()))
            .collect::<Vec<_>>();
        pairs.sort_unstable_by_key(|&(point, polygon)| (point, self.rank[polygon]));
        pairs
    }

    /// Compute the bounding rectangle of all buffered polygons.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.polygons.iter()
            .map(BoundaryPolygon::bbox)
            .reduce(bbox::union)
    }
}
