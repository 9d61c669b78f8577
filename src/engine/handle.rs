use std::{path::Path, sync::Arc};

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    config::TaxConfig,
    coordinate::Coordinate,
    county::CountyId,
    error::{Result, TaxError},
    pipeline::{self, EnrichOptions, Enrichment, RawRow},
    record::PricedRecord,
    store::EmptyDataset,
};
use super::Snapshot;

/// Owned handle to the current boundary snapshot.
///
/// Lookups clone the snapshot `Arc` and release the lock before doing any work,
/// so a reload never blocks on in-flight queries and every call runs against
/// exactly one snapshot. Loads and reloads are serialized among themselves.
#[derive(Debug)]
pub struct Engine {
    /// Configuration for the next `load`, held for the whole build and swap.
    loader: Mutex<Arc<TaxConfig>>,
    empty: EmptyDataset,
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl Engine {
    /// Create an engine with no snapshot installed.
    pub fn new(config: TaxConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            loader: Mutex::new(Arc::new(config)),
            empty: EmptyDataset::default(),
            current: RwLock::new(None),
        })
    }

    /// Choose how datasets with no usable polygons are handled.
    pub fn with_empty_dataset(mut self, empty: EmptyDataset) -> Self {
        self.empty = empty;
        self
    }

    /// Configuration of the snapshot being served, or the one the first load will use.
    pub fn config(&self) -> Arc<TaxConfig> {
        let current = self.current.read().clone();
        match current {
            Some(snapshot) => snapshot.config().clone(),
            None => self.loader.lock().clone(),
        }
    }

    #[inline] pub fn empty_dataset(&self) -> EmptyDataset { self.empty }

    /// Build a snapshot from the dataset at `path` with the current configuration and install it.
    /// On failure the previous snapshot, if any, stays in place.
    pub fn load(&self, path: &Path) -> Result<Arc<Snapshot>> {
        let loader = self.loader.lock();
        let snapshot = Snapshot::build(path, loader.clone(), self.empty)?;
        Ok(self.swap(snapshot))
    }

    /// Load `path` priced with a new configuration, replacing both on success.
    pub fn reload(&self, path: &Path, config: TaxConfig) -> Result<Arc<Snapshot>> {
        config.validate()?;
        let config = Arc::new(config);

        let mut loader = self.loader.lock();
        let snapshot = Snapshot::build(path, config.clone(), self.empty)?;
        *loader = config;
        Ok(self.swap(snapshot))
    }

    /// Atomically replace the current snapshot. Later loads use its configuration.
    pub fn install(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let mut loader = self.loader.lock();
        *loader = snapshot.config().clone();
        self.swap(snapshot)
    }

    // Callers hold the loader lock.
    fn swap(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        let previous = self.current.write().replace(snapshot.clone());

        let info = snapshot.info();
        match previous {
            Some(previous) => info!(
                path = %info.path.display(),
                sha256 = %info.sha256,
                polygons = info.polygons,
                previous = %previous.info().sha256,
                "[engine] replaced boundary snapshot",
            ),
            None => info!(
                path = %info.path.display(),
                sha256 = %info.sha256,
                polygons = info.polygons,
                "[engine] installed boundary snapshot",
            ),
        }
        snapshot
    }

    /// The snapshot currently being served.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.current.read().clone().ok_or(TaxError::IndexNotReady)
    }

    #[inline] pub fn is_ready(&self) -> bool { self.current.read().is_some() }

    /// Resolve the county containing (`latitude`, `longitude`); `None` means outside every polygon.
    pub fn resolve(&self, latitude: f64, longitude: f64) -> Result<Option<CountyId>> {
        let point = Coordinate::new(latitude, longitude)?;
        Ok(self.snapshot()?.resolve(point).cloned())
    }

    /// Resolve many points against one snapshot, preserving input order.
    pub fn resolve_batch(&self, points: &[Coordinate]) -> Result<Vec<Option<CountyId>>> {
        let snapshot = self.snapshot()?;
        Ok(snapshot.resolve_batch(points).into_iter().map(|c| c.cloned()).collect())
    }

    /// Price a single order.
    ///
    /// Fails with `OutsideJurisdiction` when the point resolves to no county and
    /// with `InvalidInput` for a negative subtotal or unusable coordinate.
    pub fn lookup(&self, latitude: f64, longitude: f64, subtotal: Decimal) -> Result<PricedRecord> {
        if subtotal < Decimal::ZERO {
            return Err(TaxError::InvalidInput(format!("subtotal must not be negative, got {subtotal}")));
        }
        let point = Coordinate::new(latitude, longitude)?;
        let snapshot = self.snapshot()?;

        let county = snapshot.resolve(point)
            .ok_or(TaxError::OutsideJurisdiction { latitude, longitude })?
            .clone();
        PricedRecord::price(point, subtotal, county, snapshot.rates(), Utc::now())
    }

    /// Run the batch enrichment pipeline over `rows` against the current snapshot.
    pub fn enrich(&self, rows: &[RawRow], options: &EnrichOptions) -> Result<Enrichment> {
        let snapshot = self.snapshot()?;
        Ok(pipeline::enrich(&snapshot, rows, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn calls_before_load_are_not_ready() {
        let engine = Engine::new(TaxConfig::default()).unwrap();
        assert!(!engine.is_ready());
        assert!(matches!(engine.snapshot(), Err(TaxError::IndexNotReady)));
        assert!(matches!(engine.resolve(40.7, -74.0), Err(TaxError::IndexNotReady)));
        assert!(matches!(engine.lookup(40.7, -74.0, dec!(1)), Err(TaxError::IndexNotReady)));
        assert!(matches!(engine.enrich(&[], &EnrichOptions::default()), Err(TaxError::IndexNotReady)));
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = TaxConfig { state_rate: dec!(-0.01), ..TaxConfig::default() };
        assert!(matches!(Engine::new(config), Err(TaxError::Config(_))));
    }

    #[test]
    fn invalid_input_is_checked_before_readiness() {
        let engine = Engine::new(TaxConfig::default()).unwrap();
        assert!(matches!(engine.lookup(40.7, -74.0, dec!(-5)), Err(TaxError::InvalidInput(_))));
        assert!(matches!(engine.resolve(f64::NAN, -74.0), Err(TaxError::InvalidInput(_))));
    }

    #[test]
    fn installed_snapshot_brings_its_config() {
        let engine = Engine::new(TaxConfig::default()).unwrap();
        let config = Arc::new(TaxConfig { state_rate: dec!(0.05), ..TaxConfig::default() });
        let info = crate::store::DatasetInfo {
            path: "memory".into(),
            sha256: String::new(),
            polygons: 0,
            skipped: 0,
            loaded_at: Utc::now(),
        };

        engine.install(Snapshot::new(crate::geom::SpatialIndex::build(vec![]), config.clone(), info));
        assert!(Arc::ptr_eq(&engine.config(), &config));
        assert!(Arc::ptr_eq(&*engine.loader.lock(), &config));
    }

    #[test]
    fn failed_load_keeps_engine_empty() {
        let engine = Engine::new(TaxConfig::default()).unwrap();
        assert!(matches!(engine.load(Path::new("/missing/counties.geojson")), Err(TaxError::Dataset { .. })));
        assert!(!engine.is_ready());
    }
}
