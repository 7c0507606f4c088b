//! Error types for the mtn-core library.

use serde::Serialize;
use thiserror::Error;

/// Main error type for the mtn library.
#[derive(Error, Debug)]
pub enum MtnError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Why a notice could not be turned into rows.
///
/// The first three are gates checked in order; `NoRows` is only reported
/// after the table header was located.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Title marker 移模通知单（外调） not present.
    #[error("title marker 移模通知单（外调） not found, text is not a mould transfer notice")]
    TitleNotFound,

    /// No date could be resolved near 模具移模时间.
    #[error("could not extract a YYYY-MM-DD date near label 模具移模时间")]
    DateNotFound,

    /// Table header labels not found.
    #[error("table header not found (零件图号/模具名称/模具编号/模具厂家/移至地方/封样单号)")]
    HeaderNotFound,

    /// Every strategy returned zero rows.
    #[error("no table rows could be recovered")]
    NoRows,
}

/// A failed parse, carrying the normalized input for diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct ParseFailure {
    /// Which gate rejected the document.
    pub kind: FailureKind,
    /// Whitespace-normalized input text.
    pub raw_text: String,
}

impl ParseFailure {
    pub fn new(kind: FailureKind, raw_text: impl Into<String>) -> Self {
        Self {
            kind,
            raw_text: raw_text.into(),
        }
    }

    /// Human-readable reason.
    pub fn reason(&self) -> String {
        self.kind.to_string()
    }
}

/// Result type for the mtn library.
pub type Result<T> = std::result::Result<T, MtnError>;
