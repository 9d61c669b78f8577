//! NYS sales-tax determination: county resolution by point-in-polygon and composite rate pricing.
//!
//! An [`Engine`] holds the current boundary [`Snapshot`]. Single orders go through
//! [`Engine::lookup`]; batches through [`Engine::enrich`], which returns priced
//! records alongside a row-level [`ImportReport`].

mod config;
mod coordinate;
mod county;
mod engine;
mod error;
mod geom;
mod io;
mod pipeline;
mod record;
mod store;
mod tax;

#[doc(inline)]
pub use config::{Labels, TaxConfig, DEFAULT_BUFFER_DEGREES, DEFAULT_SIMPLIFY_DEGREES};

#[doc(inline)]
pub use coordinate::Coordinate;

#[doc(inline)]
pub use county::CountyId;

#[doc(inline)]
pub use engine::{Engine, Snapshot};

#[doc(inline)]
pub use error::{Result, TaxError};

#[doc(inline)]
pub use geom::{BoundaryPolygon, Candidates, SpatialIndex};

#[doc(inline)]
pub use io::csv::{read_order_rows, read_order_rows_bytes};

#[doc(inline)]
pub use pipeline::{enrich, EnrichOptions, Enrichment, ImportReport, RawRow, ReportEntry, MAX_REPORTED_ERRORS};

#[doc(inline)]
pub use record::{PricedRecord, RejectReason, RejectedRecord};

#[doc(inline)]
pub use store::{load as load_boundaries, DatasetInfo, EmptyDataset, LoadedBoundaries};

#[doc(inline)]
pub use tax::{parse_subtotal, price, subtotal_from_f64, Amounts, Composition, RateTable, TaxBreakdown};
