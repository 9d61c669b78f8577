use geo::Coord;

use crate::{coordinate::Coordinate, county::CountyId};
use super::Snapshot;

impl Snapshot {
    /// Resolve the county containing `point`, or `None` if it lies outside every polygon.
    ///
    /// Bounding-box candidates are first tested against their unbuffered shapes
    /// in rank order. Only if none contains the point are their buffer bands
    /// tested, again in rank order. The first hit wins.
    pub fn resolve(&self, point: Coordinate) -> Option<&CountyId> {
        let coord = point.to_coord();
        let candidates = self.index().query(coord);
        self.first_match(candidates.iter().copied(), coord)
            .map(|idx| self.index().polygon(idx).county())
    }

    /// Resolve every point with a single batched index query.
    /// The output has one entry per input point, in input order.
    pub fn resolve_batch(&self, points: &[Coordinate]) -> Vec<Option<&CountyId>> {
        let coords = points.iter().map(|p| p.to_coord()).collect::<Vec<_>>();
        let mut resolved = vec![None; points.len()];

        // Pairs arrive grouped by point and in rank order within each group.
        let pairs = self.index().query_batch(&coords);
        for group in pairs.chunk_by(|a, b| a.0 == b.0) {
            let point = group[0].0;
            resolved[point] = self.first_match(group.iter().map(|&(_, idx)| idx), coords[point])
                .map(|idx| self.index().polygon(idx).county());
        }

        resolved
    }

    /// Two passes over rank-ordered candidates: shapes, then buffer bands.
    fn first_match<I>(&self, candidates: I, coord: Coord<f64>) -> Option<usize>
    where
        I: Iterator<Item = usize> + Clone,
    {
        candidates.clone().find(|&idx| self.in_shape(idx, coord))
            .or_else(|| candidates.filter(|&idx| self.index().polygon(idx).buffer() > 0.0)
                .find(|&idx| self.in_buffer(idx, coord)))
    }

    fn in_shape(&self, idx: usize, coord: Coord<f64>) -> bool {
        self.count_containment_test();
        self.index().polygon(idx).covers(coord)
    }

    fn in_buffer(&self, idx: usize, coord: Coord<f64>) -> bool {
        self.count_containment_test();
        self.index().polygon(idx).within_buffer(coord)
    }
}
