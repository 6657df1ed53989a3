//! Download filename helpers

use chrono::{DateTime, Local};

/// Replace characters a filesystem may reject, keeping letters (accents
/// included), digits and a few separators
pub fn sanitize_filename(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        let ok = ch.is_alphanumeric() || ch == '-' || ch == '_' || ch == '.' || ch == ' ';
        out.push(if ok { ch } else { '_' });
    }
    let trimmed = out.trim().to_string();
    if trimmed.is_empty() {
        "documento".to_string()
    } else {
        trimmed
    }
}

/// `COT-00042 - <customer>.pdf`, falling back to "Borrador" while no
/// folio has been assigned
pub fn quotation_pdf_filename(folio: Option<i64>, customer_name: &str) -> String {
    let code = match folio {
        Some(folio) => format!("COT-{:05}", folio),
        None => "Borrador".to_string(),
    };
    let customer = sanitize_filename(customer_name);
    if customer == "documento" {
        format!("{code}.pdf")
    } else {
        format!("{code} - {customer}.pdf")
    }
}

/// `Visitas_YYYYMMDD_HHMMSS.xlsx`
pub fn visits_xlsx_filename(now: DateTime<Local>) -> String {
    format!("Visitas_{}.xlsx", now.format("%Y%m%d_%H%M%S"))
}
