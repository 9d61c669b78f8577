use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    coordinate::Coordinate,
    record::{RejectReason, RejectedRecord},
    tax::parse_subtotal,
};

/// One unvalidated order row, as text fields from an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub subtotal: Option<String>,
    pub timestamp: Option<String>,
}

impl RawRow {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>, subtotal: impl Into<String>) -> Self {
        Self {
            latitude: Some(latitude.into()),
            longitude: Some(longitude.into()),
            subtotal: Some(subtotal.into()),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Validate the row. `row` is the number reported if validation fails.
    pub(crate) fn parse(&self, row: usize) -> Result<ParsedRow, RejectedRecord> {
        let numeric = |detail: String| RejectedRecord::new(row, RejectReason::MalformedNumeric, Some(detail));

        let latitude = parse_float("latitude", self.latitude.as_deref()).map_err(numeric)?;
        let longitude = parse_float("longitude", self.longitude.as_deref()).map_err(numeric)?;
        let point = Coordinate::new(latitude, longitude).map_err(|e| numeric(e.to_string()))?;

        let subtotal = match self.subtotal.as_deref().map(str::trim) {
            None | Some("") => return Err(numeric("subtotal is missing".to_string())),
            Some(text) => parse_subtotal(text).map_err(|e| numeric(e.to_string()))?,
        };

        let timestamp = match self.timestamp.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(
                DateTime::parse_from_rfc3339(text)
                    .map_err(|e| RejectedRecord::new(
                        row,
                        RejectReason::MalformedTimestamp,
                        Some(format!("timestamp '{text}': {e}")),
                    ))?
                    .with_timezone(&Utc),
            ),
        };

        Ok(ParsedRow { point, subtotal, timestamp })
    }
}

/// A row whose fields passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ParsedRow {
    pub point: Coordinate,
    pub subtotal: Decimal,
    pub timestamp: Option<DateTime<Utc>>,
}

fn parse_float(field: &str, text: Option<&str>) -> Result<f64, String> {
    let text = text.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(format!("{field} is missing"));
    }
    text.parse::<f64>().map_err(|_| format!("{field} '{text}' is not a number"))
}
