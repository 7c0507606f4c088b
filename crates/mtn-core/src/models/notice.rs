//! Mould transfer notice data models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FailureKind, ParseFailure};

/// The six table columns of a mould transfer notice, in printed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// 零件图号
    PartNo,
    /// 模具名称
    MouldName,
    /// 模具编号
    MouldNo,
    /// 模具厂家
    MouldFactory,
    /// 移至地方 / 移至地点
    MoveTo,
    /// 封样单号 / 封样号
    SealSampleNo,
}

impl Field {
    /// All fields in column order.
    pub const ALL: [Field; 6] = [
        Field::PartNo,
        Field::MouldName,
        Field::MouldNo,
        Field::MouldFactory,
        Field::MoveTo,
        Field::SealSampleNo,
    ];
}

/// One recovered table row.
///
/// Every field is a string and may be empty when the document omits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRecord {
    /// Dense 1-based position in the output.
    pub index: u32,

    /// Part drawing number, e.g. `C23122.21.1`.
    pub part_no: String,

    /// Mould name, usually a short CJK word.
    pub mould_name: String,

    /// Mould number, `ML` followed by digits.
    pub mould_no: String,

    /// Current mould manufacturer.
    pub mould_factory: String,

    /// Destination the mould moves to.
    pub move_to: String,

    /// Seal sample number, `ML-<code>-<YYYYMMDD>-<seq>`.
    pub seal_sample_no: String,
}

impl RowRecord {
    /// Create an empty row with a provisional index.
    pub fn with_index(index: u32) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::PartNo => &self.part_no,
            Field::MouldName => &self.mould_name,
            Field::MouldNo => &self.mould_no,
            Field::MouldFactory => &self.mould_factory,
            Field::MoveTo => &self.move_to,
            Field::SealSampleNo => &self.seal_sample_no,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::PartNo => &mut self.part_no,
            Field::MouldName => &mut self.mould_name,
            Field::MouldNo => &mut self.mould_no,
            Field::MouldFactory => &mut self.mould_factory,
            Field::MoveTo => &mut self.move_to,
            Field::SealSampleNo => &mut self.seal_sample_no,
        }
    }

    /// Number of non-empty fields.
    pub fn filled_count(&self) -> usize {
        Field::ALL
            .iter()
            .filter(|f| !self.get(**f).is_empty())
            .count()
    }

    /// Check if the row carries no data at all.
    pub fn is_blank(&self) -> bool {
        self.filled_count() == 0
    }
}

/// A successfully parsed notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouldTransferNotice {
    /// Date printed next to 模具移模时间, serialized as `YYYY-MM-DD`.
    pub document_date: NaiveDate,

    /// Table rows in document order.
    pub rows: Vec<RowRecord>,

    /// Whitespace-normalized input text.
    pub raw_text: String,
}

/// Outcome of a parse call: a notice or a typed failure.
pub type ParseResult = std::result::Result<MouldTransferNotice, ParseFailure>;

/// Serializable view of a [`ParseResult`] for JSON and JS consumers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParseReport {
    Success {
        #[serde(rename = "documentDate")]
        document_date: String,
        rows: Vec<RowRecord>,
        #[serde(rename = "rawText")]
        raw_text: String,
    },
    Failure {
        error: FailureKind,
        reason: String,
        #[serde(rename = "rawText")]
        raw_text: String,
    },
}

impl From<&ParseResult> for ParseReport {
    fn from(result: &ParseResult) -> Self {
        match result {
            Ok(notice) => ParseReport::Success {
                document_date: notice.document_date.format("%Y-%m-%d").to_string(),
                rows: notice.rows.clone(),
                raw_text: notice.raw_text.clone(),
            },
            Err(failure) => ParseReport::Failure {
                error: failure.kind,
                reason: failure.reason(),
                raw_text: failure.raw_text.clone(),
            },
        }
    }
}
