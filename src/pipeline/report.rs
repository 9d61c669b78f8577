use serde::Serialize;

use crate::record::RejectedRecord;
use super::Enrichment;

/// Summary of one bulk import: counts plus a bounded list of row errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub total_processed: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<ReportEntry>,
}

/// One line of the error report. The trailing summary entry has no row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub row: Option<usize>,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ImportReport {
    /// Build a report from an enrichment result, listing at most `limit` errors
    /// followed by a summary of how many were left out.
    pub fn new(enrichment: &Enrichment, limit: usize) -> Self {
        let rejected = enrichment.rejected();
        let mut errors = rejected.iter().take(limit).map(ReportEntry::from).collect::<Vec<_>>();
        if rejected.len() > limit {
            errors.push(ReportEntry {
                row: None,
                reason: format!("... and {} more", rejected.len() - limit),
                detail: None,
            });
        }

        Self {
            total_processed: enrichment.priced().len() + rejected.len(),
            success_count: enrichment.priced().len(),
            error_count: rejected.len(),
            errors,
        }
    }
}

impl From<&RejectedRecord> for ReportEntry {
    fn from(record: &RejectedRecord) -> Self {
        Self { row: Some(record.row), reason: record.reason.to_string(), detail: record.detail.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RejectReason;

    fn rejected(n: usize) -> Enrichment {
        Enrichment::new(
            vec![],
            (1..=n).map(|row| RejectedRecord::new(row, RejectReason::OutsideJurisdiction, None)).collect(),
            50,
        )
    }

    #[test]
    fn short_reports_are_complete() {
        let report = ImportReport::new(&rejected(3), 50);
        assert_eq!(report.total_processed, 3);
        assert_eq!(report.error_count, 3);
        assert_eq!(report.errors.len(), 3);
        assert_eq!(report.errors[2], ReportEntry { row: Some(3), reason: "outside jurisdiction".into(), detail: None });
    }

    #[test]
    fn long_reports_are_capped_with_summary() {
        let report = rejected(120).report();
        assert_eq!(report.error_count, 120);
        assert_eq!(report.errors.len(), 51);
        assert_eq!(report.errors[49].row, Some(50));
        assert_eq!(report.errors[50].row, None);
        assert_eq!(report.errors[50].reason, "... and 70 more");
    }

    #[test]
    fn exactly_at_limit_has_no_summary() {
        let report = ImportReport::new(&rejected(50), 50);
        assert_eq!(report.errors.len(), 50);
        assert!(report.errors.iter().all(|e| e.row.is_some()));
    }
}
