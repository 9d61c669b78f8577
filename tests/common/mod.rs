// Synthetic county fixtures shared by the integration tests.
#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

/// Axis-aligned county rectangle: (name, [min_lon, min_lat, max_lon, max_lat]).
pub type County = (&'static str, [f64; 4]);

pub const MANHATTAN: [f64; 4] = [-74.05, 40.68, -73.90, 40.88];
pub const LONG_ISLAND: [f64; 4] = [-73.75, 40.55, -73.40, 41.00];
pub const WESTERN: [f64; 4] = [-79.10, 42.40, -78.40, 43.10];
pub const ADIRONDACK: [f64; 4] = [-74.80, 43.30, -74.10, 43.90];

/// Four well-separated counties covering every rate-composition branch.
pub const DATASET_A: &[County] = &[
    ("New York County", MANHATTAN),
    ("Nassau County", LONG_ISLAND),
    ("Erie County", WESTERN),
    ("Hamilton County", ADIRONDACK),
];

/// Same footprints, different names.
pub const DATASET_B: &[County] = &[
    ("Kings County", MANHATTAN),
    ("Suffolk County", LONG_ISLAND),
    ("Oneida County", WESTERN),
    ("Essex County", ADIRONDACK),
];

/// One interior point (lat, lon) per fixture rectangle, in dataset order.
pub const INTERIOR_POINTS: [(f64, f64); 4] = [
    (40.7128, -74.0060),
    (40.75, -73.60),
    (42.90, -78.80),
    (43.60, -74.50),
];

pub fn geojson(counties: &[County]) -> String {
    let features = counties.iter()
        .map(|(name, [x0, y0, x1, y1])| {
            format!(
                r#"{{"type":"Feature","properties":{{"NAME":"{name}"}},"geometry":{{"type":"Polygon","coordinates":[[[{x0},{y0}],[{x1},{y0}],[{x1},{y1}],[{x0},{y1}],[{x0},{y0}]]]}}}}"#
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    format!(r#"{{"type":"FeatureCollection","features":[{features}]}}"#)
}

pub fn write_dataset(dir: &Path, file: &str, counties: &[County]) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, geojson(counties)).unwrap();
    path
}
