//! Export error types

use thiserror::Error;

/// Export error type
///
/// Callers surface every variant as one generic "could not generate
/// file" message; the variants exist for logging. No partial file is
/// ever offered on error.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Quotation has no items to render
    #[error("La cotización no tiene ítems")]
    EmptyQuotation,

    /// PDF assembly failed
    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),

    /// Workbook assembly failed
    #[error("Workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Byte serialization failed
    #[error("Serialization error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else
    #[error("Export failed: {0}")]
    Internal(String),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;
