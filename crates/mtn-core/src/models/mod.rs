//! Data models and configuration.

pub mod config;
pub mod notice;

pub use config::{DiagnosticsConfig, LayoutConfig, MtnConfig, PdfConfig};
pub use notice::{Field, MouldTransferNotice, ParseReport, ParseResult, RowRecord};
