//! CSV reading operations.

use std::{fs::File, io::Cursor, path::Path};

use anyhow::{bail, Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, CsvReader}};

use crate::pipeline::RawRow;

const LATITUDE: &[&str] = &["latitude", "lat"];
const LONGITUDE: &[&str] = &["longitude", "lon", "lng"];
const SUBTOTAL: &[&str] = &["subtotal", "amount"];
const TIMESTAMP: &[&str] = &["timestamp"];

/// Reads an order table from the CSV file at `path`.
pub fn read_order_rows(path: &Path) -> Result<Vec<RawRow>> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    let df = CsvReader::new(file)
        .with_options(text_options())
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {}", path.display()))?;
    rows_from_dataframe(&df)
}

/// Reads an order table from CSV bytes (e.g. an uploaded file body).
pub fn read_order_rows_bytes(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let df = CsvReader::new(Cursor::new(bytes))
        .with_options(text_options())
        .finish()
        .context("[io::csv::read] Failed to read CSV from bytes")?;
    rows_from_dataframe(&df)
}

/// Every column is read as text; numeric validation belongs to the enrichment pipeline.
fn text_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
}

/// Convert a string DataFrame into rows, matching column names case-insensitively.
fn rows_from_dataframe(df: &DataFrame) -> Result<Vec<RawRow>> {
    /// Values of the first column whose name matches one of `aliases`.
    fn text_column(df: &DataFrame, aliases: &[&str]) -> Result<Option<Vec<Option<String>>>> {
        let Some(name) = df.get_column_names().into_iter()
            .find(|name| aliases.contains(&name.trim().to_lowercase().as_str()))
            .map(|name| name.to_string())
        else { return Ok(None) };

        let values = df.column(&name)?.str()?.into_iter()
            .map(|value| value.map(str::to_string))
            .collect();
        Ok(Some(values))
    }

    let required = |aliases: &[&str]| -> Result<Vec<Option<String>>> {
        match text_column(df, aliases)? {
            Some(values) => Ok(values),
            None => bail!("[io::csv::read] CSV is missing a '{}' column", aliases[0]),
        }
    };

    let latitude = required(LATITUDE)?;
    let longitude = required(LONGITUDE)?;
    let subtotal = required(SUBTOTAL)?;
    let timestamp = text_column(df, TIMESTAMP)?.unwrap_or_else(|| vec![None; df.height()]);

    Ok(latitude.into_iter()
        .zip(longitude)
        .zip(subtotal)
        .zip(timestamp)
        .map(|(((latitude, longitude), subtotal), timestamp)| RawRow { latitude, longitude, subtotal, timestamp })
        .collect())
}
