use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the tax engine to its callers.
#[derive(Debug, Error)]
pub enum TaxError {
    /// Boundary dataset is missing, unreadable, malformed, or has no usable polygons.
    #[error("boundary dataset {path} could not be loaded: {reason}")]
    Dataset { path: PathBuf, reason: String },

    /// The point does not fall inside any loaded county polygon.
    #[error("coordinates ({latitude}, {longitude}) are outside the taxing jurisdiction")]
    OutsideJurisdiction { latitude: f64, longitude: f64 },

    /// Non-finite or negative subtotal, or a coordinate that cannot be used.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A resolve or enrich call arrived before any boundary snapshot was installed.
    #[error("spatial index is not ready; load a boundary dataset first")]
    IndexNotReady,

    /// Configuration file could not be read or failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TaxError {
    pub(crate) fn dataset(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Dataset { path: path.into(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, TaxError>;
