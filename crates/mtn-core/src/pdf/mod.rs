//! PDF fragment source.

mod collector;
mod extractor;

pub use collector::FragmentCollector;
pub use extractor::PdfExtractor;

use crate::error::PdfError;
use crate::layout::PositionedFragment;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for sources of positioned text.
pub trait FragmentSource {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Positioned fragments, one list per page.
    fn extract_fragments(&self) -> Result<Vec<Vec<PositionedFragment>>>;
}
