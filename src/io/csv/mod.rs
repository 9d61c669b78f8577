//! CSV order-table reading.

mod read;

pub use read::*;
