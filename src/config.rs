//! Deployment constants: tax rates, jurisdiction tables and load tolerances.

use std::{collections::BTreeMap, fs, path::Path};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaxError};

/// Outward buffer applied to every county polygon, in degrees (≈100 m).
pub const DEFAULT_BUFFER_DEGREES: f64 = 0.0009;

/// Douglas-Peucker tolerance applied after buffering, in degrees (≈10 m).
pub const DEFAULT_SIMPLIFY_DEGREES: f64 = 0.0001;

/// Human-readable labels used when composing jurisdiction lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub state: String,
    pub city: String,
    pub special_district: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            state: "New York State".to_string(),
            city: "New York City".to_string(),
            special_district: "Metropolitan Commuter Transportation District".to_string(),
        }
    }
}

/// Process-wide tax configuration. Fixed per deployment; swapped only together
/// with a boundary dataset on reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    /// State sales tax rate, applied everywhere.
    pub state_rate: Decimal,
    /// Surcharge for counties in `special_district` (MCTD).
    pub special_rate: Decimal,
    /// City surtax for counties in `city_counties`; replaces their county rate.
    pub city_rate: Decimal,
    /// County rate used when a county has no entry in `county_rates`.
    pub fallback_rate: Decimal,
    /// County name → local rate.
    pub county_rates: BTreeMap<String, Decimal>,
    /// Counties subject to the special-district surcharge.
    pub special_district: Vec<String>,
    /// Core-city counties → borough label (e.g. "Kings" → "Brooklyn").
    pub city_counties: BTreeMap<String, String>,
    pub labels: Labels,
    /// Outward buffer for boundary polygons, in degrees.
    pub buffer_tolerance: f64,
    /// Simplification tolerance for boundary polygons, in degrees.
    pub simplify_tolerance: f64,
    /// Feature property holding the county name; `None` tries the usual candidates.
    pub name_property: Option<String>,
}

impl Default for TaxConfig {
    fn default() -> Self {
        let rate = |units: i64, scale: u32| Decimal::new(units, scale);

        let county_rates = [
            ("Allegany", rate(45, 3)),
            ("Dutchess", rate(375, 4)),
            ("Erie", rate(475, 4)),
            ("Herkimer", rate(425, 4)),
            ("Nassau", rate(425, 4)),
            ("Oneida", rate(475, 4)),
            ("Ontario", rate(35, 3)),
            ("Orange", rate(375, 4)),
            ("Saratoga", rate(3, 2)),
            ("Suffolk", rate(425, 4)),
            ("Warren", rate(3, 2)),
            ("Washington", rate(3, 2)),
        ];

        let special_district = [
            "New York", "Kings", "Queens", "Bronx", "Richmond",
            "Dutchess", "Nassau", "Orange", "Putnam", "Rockland", "Suffolk", "Westchester",
        ];

        let city_counties = [
            ("New York", "Manhattan"),
            ("Kings", "Brooklyn"),
            ("Queens", "Queens"),
            ("Bronx", "Bronx"),
            ("Richmond", "Staten Island"),
        ];

        Self {
            state_rate: rate(4, 2),
            special_rate: rate(375, 5),
            city_rate: rate(45, 3),
            fallback_rate: rate(4, 2),
            county_rates: county_rates.into_iter().map(|(name, r)| (name.to_string(), r)).collect(),
            special_district: special_district.into_iter().map(str::to_string).collect(),
            city_counties: city_counties.into_iter()
                .map(|(county, borough)| (county.to_string(), borough.to_string()))
                .collect(),
            labels: Labels::default(),
            buffer_tolerance: DEFAULT_BUFFER_DEGREES,
            simplify_tolerance: DEFAULT_SIMPLIFY_DEGREES,
            name_property: None,
        }
    }
}

impl TaxConfig {
    /// Read a JSON configuration file; missing fields take their NYS defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| TaxError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Parse a JSON configuration string; missing fields take their NYS defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| TaxError::Config(format!("malformed configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every rate is non-negative and both tolerances are usable.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("state_rate", self.state_rate),
            ("special_rate", self.special_rate),
            ("city_rate", self.city_rate),
            ("fallback_rate", self.fallback_rate),
        ];
        let tables = self.county_rates.iter().map(|(county, rate)| (county.as_str(), *rate));

        for (name, rate) in named.into_iter().chain(tables) {
            if rate < Decimal::ZERO {
                return Err(TaxError::Config(format!("rate for {name} is negative: {rate}")));
            }
        }

        for (name, tol) in [("buffer_tolerance", self.buffer_tolerance), ("simplify_tolerance", self.simplify_tolerance)] {
            if !tol.is_finite() || tol < 0.0 {
                return Err(TaxError::Config(format!("{name} must be finite and non-negative, got {tol}")));
            }
        }

        Ok(())
    }
}
