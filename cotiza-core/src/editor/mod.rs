//! Quotation editor
//!
//! The in-memory quotation document plus its mutation surface. The UI
//! shell owns exactly one editor per editing session; every change goes
//! through an explicit transition here so the whole editing flow is
//! unit-testable without rendering anything.

mod document;
mod validate;

pub use document::{NewItem, QuotationEditor};
pub use validate::validate_for_save;

use thiserror::Error;

/// Editor-level error type
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Section not found: {0}")]
    SectionNotFound(i64),

    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    /// Deleting the last remaining section is blocked; deleting any
    /// other section silently deletes its items, so callers must warn
    /// before confirming.
    #[error("A quotation must keep at least one section")]
    LastSection,

    #[error("Exchange rate must be positive, got {0}")]
    InvalidRate(f64),
}
