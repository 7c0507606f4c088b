//! Row recovery strategies.
//!
//! Each strategy is a pure function from lines (or raw text) to candidate
//! rows. The selector decides which candidate becomes the result.

pub mod column_oriented;
pub mod global_scan;
pub mod row_oriented;

use serde::Serialize;

pub use column_oriented::{anchor_groups, header_lists};
pub use global_scan::global_scan;
pub use row_oriented::row_oriented;

/// The strategy that produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One row per printed line.
    RowOriented,
    /// Column-wise output split by header labels.
    ColumnHeaderLists,
    /// Column-wise output anchored on mould numbers.
    ColumnAnchors,
    /// Part/mould pairs found anywhere in the table section.
    GlobalScan,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Strategy::RowOriented => "row-oriented",
            Strategy::ColumnHeaderLists => "column header lists",
            Strategy::ColumnAnchors => "column anchors",
            Strategy::GlobalScan => "global scan",
        };
        f.write_str(name)
    }
}
