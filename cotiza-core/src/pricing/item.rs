//! Per-line price calculation

use rust_decimal::prelude::*;
use shared::models::{ItemKind, LineItem};

use super::{to_decimal, to_f64, IVA_PERCENT};

/// Result of one line's price calculation.
///
/// For the discount-adjustment kind, `discount_amount` is the standalone
/// reduction (`base × percent / 100`) and `net_after_discount` /
/// `line_total` carry it negated, so that summing line totals yields the
/// quotation total directly. The row itself renders a dash in the total
/// column, never this negative number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineComputation {
    /// `unit_price × quantity`, in the display currency
    pub base: f64,
    pub discount_amount: f64,
    pub net_after_discount: f64,
    pub tax_amount: f64,
    pub line_total: f64,
}

/// Display-only margin figures for catalog-product rows.
///
/// Computed from the shadow CLP price, so a currency switch never moves
/// the reported margin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarginComputation {
    pub margin_percent: f64,
    pub profit_amount: f64,
}

/// Calculate one line's monetary values
///
/// # Calculation steps
/// 1. `base = unit_price × quantity`
/// 2. discount: gated by `has_discount`; for discount-adjustment rows
///    the amount is the row's whole point, reported standalone
/// 3. tax: 19% of the net, only when the kind carries `has_tax`
/// 4. `line_total = net + tax` (negative reduction for discount rows)
pub fn compute_line(item: &LineItem) -> LineComputation {
    let hundred = Decimal::ONE_HUNDRED;
    let base = to_decimal(item.unit_price) * Decimal::from(item.quantity);
    let pct = to_decimal(item.discount_percent);

    let discount_amount = if item.has_discount && item.discount_percent > 0.0 {
        base * pct / hundred
    } else {
        Decimal::ZERO
    };

    if item.kind.is_discount() {
        // The whole row is a reduction: no own total, no tax.
        let reduction = -discount_amount;
        return LineComputation {
            base: to_f64(base),
            discount_amount: to_f64(discount_amount),
            net_after_discount: to_f64(reduction),
            tax_amount: 0.0,
            line_total: to_f64(reduction),
        };
    }

    let net = base - discount_amount;
    let tax = if item.kind.has_tax() {
        net * Decimal::from(IVA_PERCENT) / hundred
    } else {
        Decimal::ZERO
    };

    LineComputation {
        base: to_f64(base),
        discount_amount: to_f64(discount_amount),
        net_after_discount: to_f64(net),
        tax_amount: to_f64(tax),
        line_total: to_f64(net + tax),
    }
}

/// Margin figures for a line, or `None` when the concept does not apply
/// (services and discount adjustments render "not applicable").
pub fn margin(item: &LineItem) -> Option<MarginComputation> {
    let cost = match &item.kind {
        ItemKind::Product { cost_price, .. } => cost_price.unwrap_or(0.0),
        _ => return None,
    };

    if cost <= 0.0 {
        return Some(MarginComputation::default());
    }

    let cost = to_decimal(cost);
    let shadow = to_decimal(item.unit_price_clp);
    let diff = shadow - cost;

    Some(MarginComputation {
        margin_percent: to_f64(diff / cost * Decimal::ONE_HUNDRED),
        profit_amount: to_f64(diff * Decimal::from(item.quantity)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(kind: ItemKind, price: f64, quantity: i32) -> LineItem {
        LineItem {
            id: 1,
            section: None,
            kind,
            name: "Test".to_string(),
            description: None,
            quantity,
            unit_price: price,
            unit_price_clp: price,
            has_discount: false,
            discount_percent: 0.0,
        }
    }

    #[test]
    fn test_taxed_line() {
        // 1000 × 2 = 2000 base, 19% IVA = 380, total 2380
        let item = make_item(ItemKind::Service { has_tax: true }, 1000.0, 2);
        let calc = compute_line(&item);

        assert_eq!(calc.base, 2000.0);
        assert_eq!(calc.discount_amount, 0.0);
        assert_eq!(calc.net_after_discount, 2000.0);
        assert_eq!(calc.tax_amount, 380.0);
        assert_eq!(calc.line_total, 2380.0);
    }

    #[test]
    fn test_untaxed_line() {
        let item = make_item(ItemKind::Service { has_tax: false }, 1000.0, 2);
        let calc = compute_line(&item);

        assert_eq!(calc.tax_amount, 0.0);
        assert_eq!(calc.line_total, 2000.0);
    }

    #[test]
    fn test_discount_gated_by_flag() {
        // Non-zero percentage but has_discount = false: ignored entirely
        let mut item = make_item(ItemKind::Service { has_tax: true }, 1000.0, 1);
        item.discount_percent = 100.0;
        let calc = compute_line(&item);

        assert_eq!(calc.discount_amount, 0.0);
        assert_eq!(calc.line_total, 1190.0);
    }

    #[test]
    fn test_discounted_line() {
        // 1000 base, 10% = 100 off, 19% on 900 = 171, total 1071
        let mut item = make_item(ItemKind::Service { has_tax: true }, 1000.0, 1);
        item.has_discount = true;
        item.discount_percent = 10.0;
        let calc = compute_line(&item);

        assert_eq!(calc.discount_amount, 100.0);
        assert_eq!(calc.net_after_discount, 900.0);
        assert_eq!(calc.tax_amount, 171.0);
        assert_eq!(calc.line_total, 1071.0);
    }

    #[test]
    fn test_discount_adjustment_row() {
        // 5000 basis, 10% = 500 standalone reduction, no tax ever
        let mut item = make_item(ItemKind::Discount, 5000.0, 1);
        item.has_discount = true;
        item.discount_percent = 10.0;
        let calc = compute_line(&item);

        assert_eq!(calc.base, 5000.0);
        assert_eq!(calc.discount_amount, 500.0);
        assert_eq!(calc.tax_amount, 0.0);
        assert_eq!(calc.line_total, -500.0);
    }

    #[test]
    fn test_margin_from_shadow_price() {
        let mut item = make_item(
            ItemKind::Product {
                cost_price: Some(700.0),
                profit_percent: None,
                sku: None,
                image_url: None,
                has_tax: true,
            },
            1000.0,
            2,
        );
        // Foreign currency active: displayed price differs but the
        // shadow CLP price stays the margin basis.
        item.unit_price = 1.05;
        item.unit_price_clp = 1000.0;

        let m = margin(&item).unwrap();
        assert_eq!(m.margin_percent, 42.86);
        assert_eq!(m.profit_amount, 600.0);
    }

    #[test]
    fn test_margin_not_applicable() {
        let discount = make_item(ItemKind::Discount, 5000.0, 1);
        assert!(margin(&discount).is_none());

        let service = make_item(ItemKind::Service { has_tax: true }, 1000.0, 1);
        assert!(margin(&service).is_none());
    }

    #[test]
    fn test_margin_without_cost_price() {
        let item = make_item(
            ItemKind::Product {
                cost_price: None,
                profit_percent: None,
                sku: None,
                image_url: None,
                has_tax: true,
            },
            1000.0,
            1,
        );
        assert_eq!(margin(&item).unwrap(), MarginComputation::default());
    }
}
