use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    coordinate::Coordinate,
    county::CountyId,
    error::Result,
    tax::{self, RateTable, TaxBreakdown},
};

/// A resolved, fully taxed order. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedRecord {
    id: Uuid,
    timestamp: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    subtotal: Decimal,
    county: CountyId,
    breakdown: TaxBreakdown,
    composite_tax_rate: Decimal,
    tax_amount: Decimal,
    total_amount: Decimal,
    jurisdictions: Vec<String>,
}

impl PricedRecord {
    /// Compose the rates for `county` and price `subtotal` against them.
    pub(crate) fn price(
        point: Coordinate,
        subtotal: Decimal,
        county: CountyId,
        rates: &RateTable,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        let composition = rates.compose(&county);
        let amounts = tax::price(subtotal, &composition.breakdown)?;

        Ok(Self {
            id: Uuid::new_v4(),
            timestamp,
            latitude: point.latitude(),
            longitude: point.longitude(),
            subtotal,
            county,
            composite_tax_rate: composition.breakdown.composite_rate(),
            breakdown: composition.breakdown,
            tax_amount: amounts.tax_amount,
            total_amount: amounts.total_amount,
            jurisdictions: composition.jurisdictions,
        })
    }

    #[inline] pub fn id(&self) -> Uuid { self.id }

    #[inline] pub fn timestamp(&self) -> DateTime<Utc> { self.timestamp }

    #[inline] pub fn latitude(&self) -> f64 { self.latitude }

    #[inline] pub fn longitude(&self) -> f64 { self.longitude }

    #[inline] pub fn subtotal(&self) -> Decimal { self.subtotal }

    #[inline] pub fn county(&self) -> &CountyId { &self.county }

    #[inline] pub fn breakdown(&self) -> &TaxBreakdown { &self.breakdown }

    #[inline] pub fn composite_tax_rate(&self) -> Decimal { self.composite_tax_rate }

    #[inline] pub fn tax_amount(&self) -> Decimal { self.tax_amount }

    #[inline] pub fn total_amount(&self) -> Decimal { self.total_amount }

    /// Jurisdiction labels, state first.
    #[inline] pub fn jurisdictions(&self) -> &[String] { &self.jurisdictions }
}

/// Why a row could not be priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    #[serde(rename = "malformed numeric input")]
    MalformedNumeric,
    #[serde(rename = "malformed timestamp")]
    MalformedTimestamp,
    #[serde(rename = "outside jurisdiction")]
    OutsideJurisdiction,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::MalformedNumeric => "malformed numeric input",
            RejectReason::MalformedTimestamp => "malformed timestamp",
            RejectReason::OutsideJurisdiction => "outside jurisdiction",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row that could not be priced, with its source row number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    pub row: usize,
    pub reason: RejectReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RejectedRecord {
    pub fn new(row: usize, reason: RejectReason, detail: Option<String>) -> Self {
        Self { row, reason, detail }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::config::TaxConfig;

    #[test]
    fn priced_record_carries_composition() {
        let rates = RateTable::from_config(&TaxConfig::default());
        let point = Coordinate::new(40.7128, -74.0060).unwrap();
        let county = CountyId::new("New York").unwrap();
        let now = Utc::now();

        let record = PricedRecord::price(point, dec!(100.00), county, &rates, now).unwrap();
        assert_eq!(record.composite_tax_rate(), dec!(0.08875));
        assert_eq!(record.composite_tax_rate(), record.breakdown().composite_rate());
        assert_eq!(record.tax_amount(), dec!(8.88));
        assert_eq!(record.total_amount(), dec!(108.88));
        assert_eq!(record.timestamp(), now);
        assert_eq!(record.jurisdictions(), &[
            "New York State".to_string(),
            "New York City".to_string(),
            "Manhattan (Borough)".to_string(),
            "Metropolitan Commuter Transportation District".to_string(),
        ]);
    }

    #[test]
    fn identifiers_are_unique() {
        let rates = RateTable::from_config(&TaxConfig::default());
        let point = Coordinate::new(42.9, -78.8).unwrap();
        let county = CountyId::new("Erie").unwrap();

        let a = PricedRecord::price(point, dec!(1), county.clone(), &rates, Utc::now()).unwrap();
        let b = PricedRecord::price(point, dec!(1), county, &rates, Utc::now()).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn reasons_serialize_as_text() {
        let rejected = RejectedRecord::new(2, RejectReason::MalformedNumeric, None);
        assert_eq!(
            serde_json::to_string(&rejected).unwrap(),
            r#"{"row":2,"reason":"malformed numeric input"}"#,
        );
        assert_eq!(RejectReason::OutsideJurisdiction.to_string(), "outside jurisdiction");
    }
}
