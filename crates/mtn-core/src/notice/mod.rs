//! Mould transfer notice parsing.

mod parser;
pub mod rules;
pub mod selector;
pub mod strategies;

pub use parser::MouldTransferParser;
pub use selector::{Candidate, Candidates};
pub use strategies::Strategy;

use crate::layout::{LayoutReconstructor, PositionedFragment};
use crate::models::notice::ParseResult;

/// Trait for notice parsers.
pub trait NoticeParser {
    /// Parse a notice from extracted text.
    fn parse_text(&self, text: &str) -> ParseResult;

    /// Parse a notice from positioned fragments, one list per page.
    fn parse_fragments(&self, pages: &[Vec<PositionedFragment>]) -> ParseResult {
        let document = LayoutReconstructor::default().reconstruct(pages);
        self.parse_text(&document.to_text())
    }
}
