//! Quotation pricing engine
//!
//! Per-line and aggregate monetary values for a quotation's line items.
//! Uses rust_decimal for the arithmetic; f64 at the API edges, rounded
//! to 2 decimal places (half away from zero) at the boundary.
//!
//! The engine is total for any well-formed input: an empty item list
//! reduces to all-zero totals, flags gate their fields, and the
//! discount-adjustment kind contributes its reduction negatively
//! without ever producing a positive row total.

mod currency;
mod item;
mod totals;

pub use currency::{derive_displayed, format_money, to_clp};
pub use item::{compute_line, margin, LineComputation, MarginComputation};
pub use totals::{compute_totals, QuotationTotals};

use rust_decimal::prelude::*;

/// Fixed VAT rate (Chilean IVA, 19%). Not configurable.
pub const IVA_PERCENT: u32 = 19;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub(crate) fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub(crate) fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}
