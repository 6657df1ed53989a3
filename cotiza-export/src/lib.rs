//! Cotiza Export - document generation
//!
//! Turns a quotation snapshot into a print-ready PDF and a visit list
//! into a multi-sheet XLSX workbook, both returned as in-memory bytes
//! ready for download or preview.

pub mod error;
pub mod filename;
pub mod pdf;
pub mod xlsx;

pub use error::{ExportError, ExportResult};
pub use filename::{quotation_pdf_filename, sanitize_filename, visits_xlsx_filename};
pub use pdf::QuotationPdf;
pub use xlsx::VisitWorkbook;
