//! Rule-based recognizers for mould transfer notices.

pub mod dates;
pub mod fields;
pub mod header;
pub mod patterns;
pub mod seal;
pub mod text;
pub mod title;

pub use dates::{find_move_date, parse_date, DateExtractor, MOVE_DATE_LABEL};
pub use fields::{
    canonical_mould_no, canonical_seal_no, clean_mould_name, extract_part_no, is_likely_part_no,
    normalize_mould_no, normalize_row, normalize_seal_no,
};
pub use header::{locate_header, HeaderMatch, TableHeader};
pub use seal::{collect_seal_numbers, join_seal_split_lines, SealCollector};
pub use text::{normalize_text, split_lines};
pub use title::is_mould_transfer_notice;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
