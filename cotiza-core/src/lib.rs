//! Cotiza core: quotation editor, pricing engine and visit aggregation
//!
//! The pricing engine is a pure reduction callable on every keystroke,
//! the editor is an in-memory document with explicit transitions, and
//! the visit aggregation functions fold a fetched record list into the
//! count tables the workbook export writes out.

pub mod editor;
pub mod logger;
pub mod pricing;
pub mod visits;

pub use editor::{validate_for_save, EditorError, NewItem, QuotationEditor};
pub use pricing::{compute_line, compute_totals, LineComputation, QuotationTotals};
