use std::str::FromStr;

use rust_decimal::{prelude::FromPrimitive, Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::{Result, TaxError};
use super::TaxBreakdown;

/// Tax and total for one subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Amounts {
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

/// Apply the composite rate of `breakdown` to `subtotal`.
///
/// `tax_amount` is rounded half-up to cents; `total_amount` is the exact sum of
/// `subtotal` and `tax_amount`.
pub fn price(subtotal: Decimal, breakdown: &TaxBreakdown) -> Result<Amounts> {
    if subtotal < Decimal::ZERO {
        return Err(TaxError::InvalidInput(format!("subtotal must not be negative, got {subtotal}")));
    }

    let overflow = || TaxError::InvalidInput(format!("subtotal {subtotal} is too large to price"));

    let tax_amount = subtotal.checked_mul(breakdown.composite_rate())
        .ok_or_else(overflow)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let total_amount = subtotal.checked_add(tax_amount).ok_or_else(overflow)?;

    Ok(Amounts { tax_amount, total_amount })
}

/// Convert a binary float subtotal to a decimal, rejecting non-finite and negative values.
pub fn subtotal_from_f64(value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(TaxError::InvalidInput(format!("subtotal must be finite, got {value}")));
    }
    let subtotal = Decimal::from_f64(value)
        .ok_or_else(|| TaxError::InvalidInput(format!("subtotal {value} is out of range")))?;
    non_negative(subtotal)
}

/// Parse a subtotal from text (plain or scientific notation), rejecting negative values.
pub fn parse_subtotal(text: &str) -> Result<Decimal> {
    let text = text.trim();
    let subtotal = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| TaxError::InvalidInput(format!("subtotal '{text}' is not a decimal number")))?;
    non_negative(subtotal)
}

fn non_negative(subtotal: Decimal) -> Result<Decimal> {
    if subtotal < Decimal::ZERO {
        return Err(TaxError::InvalidInput(format!("subtotal must not be negative, got {subtotal}")));
    }
    Ok(subtotal)
}
