use chrono::Utc;
use rayon::prelude::*;
use tracing::debug;

use crate::{
    engine::Snapshot,
    record::{PricedRecord, RejectReason, RejectedRecord},
};
use super::{ImportReport, RawRow};

/// Errors listed individually in an import report before the summary entry.
pub const MAX_REPORTED_ERRORS: usize = 50;

/// Knobs for one enrichment call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichOptions {
    /// Added to the 1-based row number of every rejected row,
    /// e.g. 1 when the caller's file has a header line.
    pub header_offset: usize,
    pub max_reported_errors: usize,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self { header_offset: 0, max_reported_errors: MAX_REPORTED_ERRORS }
    }
}

impl EnrichOptions {
    #[inline]
    fn row_number(&self, idx: usize) -> usize {
        idx + 1 + self.header_offset
    }
}

/// Priced and rejected rows from one enrichment call, each in source-row order.
#[derive(Debug, Clone)]
pub struct Enrichment {
    priced: Vec<PricedRecord>,
    rejected: Vec<RejectedRecord>,
    max_reported_errors: usize,
}

impl Default for Enrichment {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), MAX_REPORTED_ERRORS)
    }
}

impl Enrichment {
    pub(crate) fn new(priced: Vec<PricedRecord>, rejected: Vec<RejectedRecord>, max_reported_errors: usize) -> Self {
        Self { priced, rejected, max_reported_errors }
    }

    #[inline] pub fn priced(&self) -> &[PricedRecord] { &self.priced }

    #[inline] pub fn rejected(&self) -> &[RejectedRecord] { &self.rejected }

    pub fn into_parts(self) -> (Vec<PricedRecord>, Vec<RejectedRecord>) {
        (self.priced, self.rejected)
    }

    /// Error report listing at most `max_reported_errors` rejected rows, as set by the options.
    pub fn report(&self) -> ImportReport {
        ImportReport::new(self, self.max_reported_errors)
    }
}

/// Turn raw rows into priced records against one snapshot.
///
/// Rows are validated in parallel, resolved with a single batched index pass,
/// then priced in parallel. Per-row failures end up in `rejected`; nothing here
/// returns an error or touches state outside the result.
pub fn enrich(snapshot: &Snapshot, rows: &[RawRow], options: &EnrichOptions) -> Enrichment {
    let parsed = rows.par_iter().enumerate()
        .map(|(i, row)| {
            let row_no = options.row_number(i);
            row.parse(row_no).map(|parsed| (row_no, parsed))
        })
        .collect::<Vec<_>>();

    let (valid, mut rejected) = parsed.into_iter()
        .fold((Vec::new(), Vec::new()), |(mut valid, mut rejected), parsed| {
            match parsed {
                Ok(row) => valid.push(row),
                Err(record) => rejected.push(record),
            }
            (valid, rejected)
        });

    let points = valid.iter().map(|(_, row)| row.point).collect::<Vec<_>>();
    let counties = snapshot.resolve_batch(&points);

    let outcomes = valid.par_iter().zip(counties.par_iter())
        .map(|((row_no, row), county)| {
            let Some(county) = county else {
                return Err(RejectedRecord::new(*row_no, RejectReason::OutsideJurisdiction, None));
            };
            let timestamp = row.timestamp.unwrap_or_else(Utc::now);
            PricedRecord::price(row.point, row.subtotal, (*county).clone(), snapshot.rates(), timestamp)
                .map_err(|e| RejectedRecord::new(*row_no, RejectReason::MalformedNumeric, Some(e.to_string())))
        })
        .collect::<Vec<_>>();

    let mut priced = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Ok(record) => priced.push(record),
            Err(record) => rejected.push(record),
        }
    }
    rejected.sort_by_key(|record| record.row);

    debug!(
        rows = rows.len(),
        parsed = valid.len(),
        priced = priced.len(),
        rejected = rejected.len(),
        "[pipeline] enrichment finished",
    );

    Enrichment::new(priced, rejected, options.max_reported_errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};
    use rust_decimal_macros::dec;

    use std::sync::Arc;

    use crate::{
        config::TaxConfig, county::CountyId, geom::{BoundaryPolygon, SpatialIndex},
        store::DatasetInfo,
    };

    fn make_test_snapshot() -> Snapshot {
        let manhattan = BoundaryPolygon::new(
            CountyId::new("New York County").unwrap(),
            MultiPolygon(vec![polygon![
                (x: -74.05, y: 40.68), (x: -73.90, y: 40.68), (x: -73.90, y: 40.88), (x: -74.05, y: 40.88),
            ]]),
            0.0,
            0.0,
        ).unwrap();
        let info = DatasetInfo {
            path: "memory".into(),
            sha256: String::new(),
            polygons: 1,
            skipped: 0,
            loaded_at: Utc::now(),
        };
        Snapshot::new(SpatialIndex::build(vec![manhattan]), Arc::new(TaxConfig::default()), info)
    }

    #[test]
    fn malformed_row_is_rejected_and_others_priced() {
        let snapshot = make_test_snapshot();
        let rows = vec![
            RawRow::new("40.7128", "-74.0060", "100.00"),
            RawRow::new("not-a-number", "-74.0060", "5"),
            RawRow::new("40.75", "-73.98", "20"),
        ];

        let enrichment = enrich(&snapshot, &rows, &EnrichOptions::default());
        assert_eq!(enrichment.priced().len(), 2);
        assert_eq!(enrichment.rejected().len(), 1);
        assert_eq!(enrichment.rejected()[0].row, 2);
        assert_eq!(enrichment.rejected()[0].reason, RejectReason::MalformedNumeric);

        assert_eq!(enrichment.priced()[0].subtotal(), dec!(100.00));
        assert_eq!(enrichment.priced()[0].tax_amount(), dec!(8.88));
        assert_eq!(enrichment.priced()[1].subtotal(), dec!(20));
    }

    #[test]
    fn unresolved_rows_are_outside_jurisdiction() {
        let snapshot = make_test_snapshot();
        let rows = vec![
            RawRow::new("0", "0", "10"),
            RawRow::new("40.7128", "-74.0060", "10"),
            RawRow::new("x", "0", "10"),
        ];

        let options = EnrichOptions { header_offset: 1, ..Default::default() };
        let (priced, rejected) = enrich(&snapshot, &rows, &options).into_parts();
        assert_eq!(priced.len(), 1);
        assert_eq!(rejected, vec![
            RejectedRecord::new(2, RejectReason::OutsideJurisdiction, None),
            RejectedRecord { row: 4, reason: RejectReason::MalformedNumeric, detail: rejected[1].detail.clone() },
        ]);
    }

    #[test]
    fn row_timestamp_is_kept() {
        let snapshot = make_test_snapshot();
        let rows = vec![RawRow::new("40.7128", "-74.0060", "1").with_timestamp("2023-06-01T00:00:00Z")];
        let enrichment = enrich(&snapshot, &rows, &EnrichOptions::default());
        assert_eq!(enrichment.priced()[0].timestamp().to_rfc3339(), "2023-06-01T00:00:00+00:00");
    }

    #[test]
    fn empty_input_gives_empty_result() {
        let enrichment = enrich(&make_test_snapshot(), &[], &EnrichOptions::default());
        assert!(enrichment.priced().is_empty());
        assert!(enrichment.rejected().is_empty());
        assert_eq!(enrichment.report().total_processed, 0);
    }

    #[test]
    fn report_honours_the_configured_error_limit() {
        let snapshot = make_test_snapshot();
        let rows = (0..5).map(|_| RawRow::new("0", "0", "1")).collect::<Vec<_>>();

        let options = EnrichOptions { max_reported_errors: 2, ..Default::default() };
        let report = enrich(&snapshot, &rows, &options).report();
        assert_eq!(report.error_count, 5);
        assert_eq!(report.errors.len(), 3);
        assert_eq!(report.errors[0].row, Some(1));
        assert_eq!(report.errors[1].row, Some(2));
        assert_eq!(report.errors[2].row, None);

        let report = enrich(&snapshot, &rows, &EnrichOptions::default()).report();
        assert_eq!(report.errors.len(), 5);
    }

    #[test]
    fn output_cardinality_matches_input() {
        let snapshot = make_test_snapshot();
        let rows = (0..500)
            .map(|i| {
                let lat = 40.60 + (i as f64) * 0.0008;
                RawRow::new(lat.to_string(), "-73.95", format!("{i}.99"))
            })
            .collect::<Vec<_>>();

        let enrichment = enrich(&snapshot, &rows, &EnrichOptions::default());
        assert_eq!(enrichment.priced().len() + enrichment.rejected().len(), rows.len());
        assert!(enrichment.rejected().windows(2).all(|w| w[0].row < w[1].row));
        assert!(enrichment.rejected().iter().all(|r| r.reason == RejectReason::OutsideJurisdiction));
    }
}
