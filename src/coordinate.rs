use geo::Coord;
use serde::Serialize;

use crate::error::{Result, TaxError};

/// A validated WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Validate a latitude/longitude pair: both finite, latitude in [-90, 90], longitude in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(TaxError::InvalidInput(format!("latitude {latitude} is outside [-90, 90]")));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(TaxError::InvalidInput(format!("longitude {longitude} is outside [-180, 180]")));
        }
        Ok(Self { latitude, longitude })
    }

    #[inline] pub fn latitude(&self) -> f64 { self.latitude }

    #[inline] pub fn longitude(&self) -> f64 { self.longitude }

    /// Point in (lon, lat) order, matching how boundary polygons are loaded.
    #[inline]
    pub(crate) fn to_coord(self) -> Coord<f64> {
        Coord { x: self.longitude, y: self.latitude }
    }
}
