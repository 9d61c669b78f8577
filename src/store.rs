//! Boundary store: reads county polygons from a dataset file and prepares them for indexing.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::{config::TaxConfig, county::CountyId, error::{Result, TaxError}, geom::BoundaryPolygon, io::BoundarySource};

/// What to do when a dataset parses but yields zero usable polygons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyDataset {
    /// Fail the load with `TaxError::Dataset`.
    #[default]
    Fail,
    /// Install an empty snapshot that answers "outside jurisdiction" for every point.
    RejectAll,
}

/// Identifies the dataset a snapshot was built from.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub path: PathBuf,
    pub sha256: String,
    pub polygons: usize,
    pub skipped: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Polygons read from one dataset, ready for `SpatialIndex::build`.
#[derive(Debug)]
pub struct LoadedBoundaries {
    pub polygons: Vec<BoundaryPolygon>,
    pub info: DatasetInfo,
}

/// Load county polygons from `path`.
///
/// Each feature's name becomes its County Identifier, and its geometry is
/// buffered and simplified by the configured tolerances. Features without a
/// name or usable polygon rings are skipped with a warning.
pub fn load(path: &Path, config: &TaxConfig, empty: EmptyDataset) -> Result<LoadedBoundaries> {
    let source = BoundarySource::read(path)
        .map_err(|e| TaxError::dataset(path, format!("{e:#}")))?;
    let sha256 = source.sha256();

    let features = source.features(config.name_property.as_deref())
        .map_err(|e| TaxError::dataset(path, format!("{e:#}")))?;

    let total = features.len();
    let polygons = features.into_iter().enumerate()
        .filter_map(|(i, feature)| {
            let Some(county) = feature.name.as_deref().and_then(CountyId::new) else {
                warn!(path = %path.display(), feature = i, "[store] skipping feature without a county name");
                return None;
            };
            let prepared = feature.shape.and_then(|shape| {
                BoundaryPolygon::new(county.clone(), shape, config.buffer_tolerance, config.simplify_tolerance)
            });
            if prepared.is_none() {
                warn!(path = %path.display(), feature = i, county = %county, "[store] skipping feature without usable polygon rings");
            }
            prepared
        })
        .collect::<Vec<_>>();

    if polygons.is_empty() {
        match empty {
            EmptyDataset::Fail => {
                return Err(TaxError::dataset(path, format!("no usable polygons among {total} features")));
            }
            EmptyDataset::RejectAll => {
                warn!(path = %path.display(), features = total, "[store] dataset has no usable polygons; every lookup will be rejected");
            }
        }
    }

    let info = DatasetInfo {
        path: path.to_path_buf(),
        sha256,
        polygons: polygons.len(),
        skipped: total - polygons.len(),
        loaded_at: Utc::now(),
    };
    info!(path = %path.display(), polygons = info.polygons, skipped = info.skipped, "[store] loaded boundary dataset");

    Ok(LoadedBoundaries { polygons, info })
}
