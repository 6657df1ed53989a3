//! Currency derivation and display formatting
//!
//! The shadow CLP price is the source of truth; displayed prices derive
//! from it (`clp` when CLP is active, `clp ÷ rate` when USD is active)
//! and the reverse derivation is only used when the user edits a price.
//! Rounding happens at format time, never in the stored values, so a
//! currency round-trip cannot compound error.

use rust_decimal::prelude::*;
use shared::models::Currency;

use super::{to_decimal, to_f64};

/// Displayed unit price for a shadow CLP price under the active currency.
///
/// `rate` must be validated (> 0) by the caller before a USD derivation;
/// this is enforced at the editor boundary, not here.
pub fn derive_displayed(shadow_clp: f64, currency: Currency, rate: f64) -> f64 {
    match currency {
        Currency::Clp => shadow_clp,
        Currency::Usd => {
            let d = to_decimal(shadow_clp) / to_decimal(rate);
            // Unrounded: callers format with 2 decimals at render time
            d.to_f64().unwrap_or_default()
        }
    }
}

/// Normalize a user-entered displayed price back to CLP
pub fn to_clp(displayed: f64, currency: Currency, rate: f64) -> f64 {
    match currency {
        Currency::Clp => displayed,
        Currency::Usd => to_f64(to_decimal(displayed) * to_decimal(rate)),
    }
}

/// Format a monetary amount for display.
///
/// CLP renders as an integer with `.` thousands separators (`$2.380`);
/// USD renders with two decimals, `,` decimal mark (`US$1.234,56`).
pub fn format_money(amount: f64, currency: Currency) -> String {
    match currency {
        Currency::Clp => format!("${}", group_thousands(amount.round() as i64)),
        Currency::Usd => {
            let cents = (amount * 100.0).round() as i64;
            let sign = if cents < 0 { "-" } else { "" };
            let cents = cents.abs();
            format!(
                "{}US${},{:02}",
                sign,
                group_thousands(cents / 100),
                cents % 100
            )
        }
    }
}

fn group_thousands(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let digits = value.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    format!("{}{}", sign, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clp_formatting() {
        assert_eq!(format_money(2380.0, Currency::Clp), "$2.380");
        assert_eq!(format_money(1250000.0, Currency::Clp), "$1.250.000");
        assert_eq!(format_money(0.0, Currency::Clp), "$0");
        assert_eq!(format_money(-500.0, Currency::Clp), "$-500");
    }

    #[test]
    fn test_usd_formatting() {
        assert_eq!(format_money(1.05, Currency::Usd), "US$1,05");
        assert_eq!(format_money(1234.56, Currency::Usd), "US$1.234,56");
        assert_eq!(format_money(-500.0, Currency::Usd), "-US$500,00");
    }

    #[test]
    fn test_usd_derivation() {
        // 1000 CLP at rate 950 ≈ 1.05 at two decimals
        let displayed = derive_displayed(1000.0, Currency::Usd, 950.0);
        assert!((displayed - 1.0526).abs() < 0.001);
        assert_eq!(format_money(displayed, Currency::Usd), "US$1,05");
    }

    #[test]
    fn test_round_trip_preserves_shadow() {
        for rate in [1.0, 37.5, 812.33, 950.0, 1400.0] {
            let shadow = 125000.0;
            let displayed = derive_displayed(shadow, Currency::Usd, rate);
            let back = to_clp(displayed, Currency::Usd, rate);
            assert!(
                (back - shadow).abs() < 0.01,
                "rate {rate}: {back} != {shadow}"
            );
        }
    }

    #[test]
    fn test_clp_derivation_is_identity() {
        assert_eq!(derive_displayed(12345.0, Currency::Clp, 950.0), 12345.0);
        assert_eq!(to_clp(12345.0, Currency::Clp, 950.0), 12345.0);
    }
}
