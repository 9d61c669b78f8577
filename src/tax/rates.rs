use ahash::{AHashMap, AHashSet};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{config::{Labels, TaxConfig}, county::CountyId};

/// Per-jurisdiction rates applying to one point.
/// `composite_rate()` is always the sum of the four components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub state_rate: Decimal,
    pub county_rate: Decimal,
    pub city_rate: Decimal,
    pub special_rate: Decimal,
}

impl TaxBreakdown {
    /// Sum of state, county, city and special-district rates.
    #[inline]
    pub fn composite_rate(&self) -> Decimal {
        self.state_rate + self.county_rate + self.city_rate + self.special_rate
    }
}

/// A breakdown plus the ordered list of jurisdiction labels it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub breakdown: TaxBreakdown,
    pub jurisdictions: Vec<String>,
}

/// Jurisdiction rate table, keyed by normalized county identifier.
#[derive(Debug, Clone)]
pub struct RateTable {
    state_rate: Decimal,
    special_rate: Decimal,
    city_rate: Decimal,
    fallback_rate: Decimal,
    county_rates: AHashMap<String, Decimal>,
    special_district: AHashSet<String>,
    city_counties: AHashMap<String, String>, // county key -> borough label
    labels: Labels,
}

impl RateTable {
    /// Build the table from configuration, normalizing every county name.
    pub fn from_config(config: &TaxConfig) -> Self {
        fn key(name: &str) -> Option<String> {
            CountyId::new(name).map(|id| id.key().to_string())
        }

        Self {
            state_rate: config.state_rate,
            special_rate: config.special_rate,
            city_rate: config.city_rate,
            fallback_rate: config.fallback_rate,
            county_rates: config.county_rates.iter()
                .filter_map(|(name, rate)| Some((key(name)?, *rate)))
                .collect(),
            special_district: config.special_district.iter()
                .filter_map(|name| key(name))
                .collect(),
            city_counties: config.city_counties.iter()
                .filter_map(|(name, borough)| Some((key(name)?, borough.trim().to_string())))
                .collect(),
            labels: config.labels.clone(),
        }
    }

    /// Rate applied to counties without an explicit table entry.
    #[inline] pub fn fallback_rate(&self) -> Decimal { self.fallback_rate }

    /// Explicit table rate for `county`, or the fallback rate.
    pub fn county_rate(&self, county: &CountyId) -> Decimal {
        self.county_rates.get(county.key()).copied().unwrap_or(self.fallback_rate)
    }

    /// Whether `county` carries the special-district surcharge.
    pub fn is_special_district(&self, county: &CountyId) -> bool {
        self.special_district.contains(county.key())
    }

    /// Borough label if `county` is one of the core-city counties.
    pub fn borough(&self, county: &CountyId) -> Option<&str> {
        self.city_counties.get(county.key()).map(String::as_str)
    }

    /// Compose the breakdown and jurisdiction labels for a resolved county.
    pub fn compose(&self, county: &CountyId) -> Composition {
        let mut jurisdictions = vec![self.labels.state.clone()];

        let (county_rate, city_rate) = match self.borough(county) {
            Some(borough) => {
                jurisdictions.push(self.labels.city.clone());
                jurisdictions.push(format!("{borough} (Borough)"));
                (Decimal::ZERO, self.city_rate)
            }
            None => {
                jurisdictions.push(format!("{} County", county.name()));
                (self.county_rate(county), Decimal::ZERO)
            }
        };

        let special_rate = if self.is_special_district(county) { self.special_rate } else { Decimal::ZERO };
        if special_rate > Decimal::ZERO {
            jurisdictions.push(self.labels.special_district.clone());
        }

        Composition {
            breakdown: TaxBreakdown { state_rate: self.state_rate, county_rate, city_rate, special_rate },
            jurisdictions,
        }
    }
}
