//! Rate composition and decimal pricing.

mod price;
mod rates;

pub use price::{parse_subtotal, price, subtotal_from_f64, Amounts};
pub use rates::{Composition, RateTable, TaxBreakdown};
