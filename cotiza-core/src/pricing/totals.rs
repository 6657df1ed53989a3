//! Aggregate quotation totals

use rust_decimal::prelude::*;
use shared::models::LineItem;

use super::{compute_line, to_decimal, to_f64};

/// Quotation-level totals banner.
///
/// Identities (up to boundary rounding):
/// `subtotal == gross_subtotal − discounts` and
/// `total == subtotal + tax == Σ line_total`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotationTotals {
    /// Sum of priced-row bases (discount-adjustment rows have no base
    /// of their own in the banner; they only subtract)
    pub gross_subtotal: f64,
    /// Every reduction: per-row discounts plus adjustment rows
    pub discounts: f64,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Pure reduction over the item list; all-zero for an empty list.
/// Safe to call on every keystroke.
pub fn compute_totals(items: &[LineItem]) -> QuotationTotals {
    let mut gross = Decimal::ZERO;
    let mut discounts = Decimal::ZERO;
    let mut subtotal = Decimal::ZERO;
    let mut tax = Decimal::ZERO;
    let mut total = Decimal::ZERO;

    for item in items {
        let line = compute_line(item);
        if !item.kind.is_discount() {
            gross += to_decimal(line.base);
        }
        discounts += to_decimal(line.discount_amount);
        subtotal += to_decimal(line.net_after_discount);
        tax += to_decimal(line.tax_amount);
        total += to_decimal(line.line_total);
    }

    QuotationTotals {
        gross_subtotal: to_f64(gross),
        discounts: to_f64(discounts),
        subtotal: to_f64(subtotal),
        tax: to_f64(tax),
        total: to_f64(total),
    }
}
