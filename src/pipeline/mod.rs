//! Batch enrichment: raw order rows in, priced records and a row-level error report out.

mod enrich;
mod report;
mod row;

pub use enrich::{enrich, EnrichOptions, Enrichment, MAX_REPORTED_ERRORS};
pub use report::{ImportReport, ReportEntry};
pub use row::RawRow;
