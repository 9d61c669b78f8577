//! IO module for format-specific reading operations.
//!
//! # Format Modules
//!
//! - `geojson` - GeoJSON FeatureCollections of county boundaries
//! - `shp` - Shapefile (`.shp` + `.dbf`) county boundaries
//! - `csv` - CSV order tables handed to the enrichment pipeline

pub mod csv;
mod geojson;
mod shp;

#[cfg(test)]
pub(crate) use shp::write_test_shapefile;

use std::{fs, path::Path};

use anyhow::{Context, Result};
use geo::MultiPolygon;
use sha2::{Digest, Sha256};

/// Property names tried in order for a county name when none is configured.
pub(crate) const NAME_PROPERTIES: &[&str] = &["NAME", "name", "NAMELSAD", "County", "county"];

/// One boundary feature as read from disk, before validation.
#[derive(Debug, Clone)]
pub(crate) struct RawFeature {
    pub name: Option<String>,
    pub shape: Option<MultiPolygon<f64>>,
}

/// Raw bytes of a boundary dataset, read once and then both fingerprinted and parsed.
#[derive(Debug, Clone)]
pub(crate) enum BoundarySource {
    GeoJson(Vec<u8>),
    /// A `.shp` together with its sibling `.dbf`, which carries the county names.
    Shapefile { shp: Vec<u8>, dbf: Vec<u8> },
}

impl BoundarySource {
    /// Read the dataset at `path`, choosing the format by extension.
    /// `.shp` is read as a Shapefile; anything else as GeoJSON.
    pub(crate) fn read(path: &Path) -> Result<Self> {
        let is_shapefile = path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("shp"));

        let main = fs::read(path)
            .with_context(|| format!("[io] Failed to read {}", path.display()))?;
        if !is_shapefile {
            return Ok(Self::GeoJson(main));
        }

        let lower = path.with_extension("dbf");
        let dbf_path = if lower.exists() { lower } else { path.with_extension("DBF") };
        let dbf = fs::read(&dbf_path)
            .with_context(|| format!("[io] Failed to read {}", dbf_path.display()))?;
        Ok(Self::Shapefile { shp: main, dbf })
    }

    /// Hex SHA-256 over every file the features are parsed from.
    pub(crate) fn sha256(&self) -> String {
        let mut hasher = Sha256::new();
        match self {
            Self::GeoJson(bytes) => hasher.update(bytes),
            Self::Shapefile { shp, dbf } => {
                for part in [shp, dbf] {
                    hasher.update((part.len() as u64).to_le_bytes());
                    hasher.update(part);
                }
            }
        }
        hex::encode(hasher.finalize())
    }

    /// Parse the held bytes into boundary features.
    pub(crate) fn features(&self, name_property: Option<&str>) -> Result<Vec<RawFeature>> {
        match self {
            Self::GeoJson(bytes) => geojson::read_geojson_bytes(bytes, name_property),
            Self::Shapefile { shp: shapes, dbf } => shp::read_shapefile_bytes(shapes, dbf, name_property),
        }
    }
}

/// Look up a feature name: the configured property if given, otherwise the first present candidate.
pub(crate) fn feature_name(name_property: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    match name_property {
        Some(property) => lookup(property),
        None => NAME_PROPERTIES.iter().find_map(|&property| lookup(property)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapefile_without_dbf_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counties.shp");
        shp::write_test_shapefile(&path, "Erie County");
        fs::remove_file(path.with_extension("dbf")).unwrap();

        let err = BoundarySource::read(&path).unwrap_err();
        assert!(format!("{err:#}").to_lowercase().contains("counties.dbf"));
    }

    #[test]
    fn shapefile_is_read_with_its_dbf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counties.shp");
        shp::write_test_shapefile(&path, "Erie County");

        let source = BoundarySource::read(&path).unwrap();
        assert!(matches!(source, BoundarySource::Shapefile { .. }));
        let features = source.features(None).unwrap();
        assert_eq!(features[0].name.as_deref(), Some("Erie County"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = BoundarySource::read(Path::new("/definitely/not/here.geojson")).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.geojson"));
    }
}
