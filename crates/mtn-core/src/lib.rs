//! Core library for mould transfer notice import.
//!
//! This crate provides:
//! - Line reconstruction from positioned PDF text fragments
//! - Table recovery for 美菱移模通知单（外调） with several competing strategies
//! - Field normalization for part, mould and seal sample numbers
//! - Masked diagnostics for documents that fail to import
//! - PDF fragment extraction (feature `native`)

pub mod diagnostics;
pub mod error;
pub mod layout;
pub mod models;
pub mod notice;
#[cfg(feature = "native")]
pub mod pdf;

pub use diagnostics::{mask, NoticeDiagnostics};
pub use error::{FailureKind, MtnError, ParseFailure, PdfError, Result};
pub use layout::{DocumentText, LayoutReconstructor, PositionedFragment};
pub use models::config::{DiagnosticsConfig, LayoutConfig, MtnConfig, PdfConfig};
pub use models::notice::{Field, MouldTransferNotice, ParseReport, ParseResult, RowRecord};
pub use notice::{MouldTransferParser, NoticeParser, Strategy};
#[cfg(feature = "native")]
pub use pdf::{FragmentSource, PdfExtractor};
