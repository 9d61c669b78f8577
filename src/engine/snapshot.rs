use std::{path::Path, sync::{atomic::{AtomicUsize, Ordering}, Arc}};

use crate::{
    config::TaxConfig,
    error::Result,
    geom::SpatialIndex,
    store::{self, DatasetInfo, EmptyDataset},
    tax::RateTable,
};

/// An immutable pairing of a spatial index with the configuration and rate
/// table it is priced against. Shared read-only between any number of
/// concurrent callers and replaced wholesale on reload.
#[derive(Debug)]
pub struct Snapshot {
    index: SpatialIndex,
    config: Arc<TaxConfig>,
    rates: RateTable,
    info: DatasetInfo,
    containment_tests: AtomicUsize,
}

impl Snapshot {
    /// Assemble a snapshot from an already-built index; rates are derived from `config`.
    pub fn new(index: SpatialIndex, config: Arc<TaxConfig>, info: DatasetInfo) -> Self {
        let rates = RateTable::from_config(&config);
        Self { index, config, rates, info, containment_tests: AtomicUsize::new(0) }
    }

    /// Load a boundary dataset and build a snapshot priced with `config`.
    pub fn build(path: &Path, config: Arc<TaxConfig>, empty: EmptyDataset) -> Result<Self> {
        let loaded = store::load(path, &config, empty)?;
        Ok(Self::new(SpatialIndex::build(loaded.polygons), config, loaded.info))
    }

    #[inline] pub fn index(&self) -> &SpatialIndex { &self.index }

    /// Configuration the boundaries were prepared with and the rates derived from.
    #[inline] pub fn config(&self) -> &Arc<TaxConfig> { &self.config }

    #[inline] pub fn rates(&self) -> &RateTable { &self.rates }

    /// Where this snapshot's boundaries came from.
    #[inline] pub fn info(&self) -> &DatasetInfo { &self.info }

    /// Number of exact point-in-polygon tests run against this snapshot so far.
    #[inline] pub fn containment_tests(&self) -> usize { self.containment_tests.load(Ordering::Relaxed) }

    #[inline]
    pub(super) fn count_containment_test(&self) {
        self.containment_tests.fetch_add(1, Ordering::Relaxed);
    }
}
