//! Masked diagnostics for notices that fail to import.
//!
//! Summaries are safe to paste into bug reports: digits become `#` and ASCII
//! letters become `A`, so part numbers and seal numbers keep their shape but
//! not their value.

use std::fmt;

use serde::Serialize;

use crate::models::config::DiagnosticsConfig;
use crate::models::notice::{ParseResult, RowRecord};
use crate::notice::rules::dates::MOVE_DATE_LABEL;
use crate::notice::rules::text::remove_whitespace;
use crate::notice::rules::title::is_mould_transfer_notice;

/// Marker used to locate the title context.
const TITLE_MARKER: &str = "移模通知单";

/// Clip to `limit` characters, mask digits and ASCII letters, collapse whitespace.
pub fn mask(text: &str, limit: usize) -> String {
    let masked: String = text
        .chars()
        .take(limit)
        .map(|c| match c {
            c if c.is_ascii_digit() => '#',
            c if c.is_ascii_alphabetic() => 'A',
            c => c,
        })
        .collect();
    masked.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Characters around the first occurrence of `marker`.
fn context(compact: &str, marker: &str, before: usize, after: usize) -> Option<String> {
    let byte_idx = compact.find(marker)?;
    let chars: Vec<char> = compact.chars().collect();
    let idx = compact[..byte_idx].chars().count();
    let start = idx.saturating_sub(before);
    let end = (idx + after).min(chars.len());
    Some(chars[start..end].iter().collect())
}

/// A row with every field masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedRow {
    pub index: u32,
    pub part_no: String,
    pub mould_name: String,
    pub mould_no: String,
    pub mould_factory: String,
    pub move_to: String,
    pub seal_sample_no: String,
}

impl From<&RowRecord> for MaskedRow {
    fn from(row: &RowRecord) -> Self {
        Self {
            index: row.index,
            part_no: mask(&row.part_no, 32),
            mould_name: mask(&row.mould_name, 60),
            mould_no: mask(&row.mould_no, 32),
            mould_factory: mask(&row.mould_factory, 20),
            move_to: mask(&row.move_to, 20),
            seal_sample_no: mask(&row.seal_sample_no, 40),
        }
    }
}

/// Masked summary of one parse attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeDiagnostics {
    /// Length of the extracted text in characters.
    pub text_length: usize,
    pub title_hit: bool,
    pub date_label_hit: bool,
    pub parse_ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sample_rows: Vec<MaskedRow>,
}

impl NoticeDiagnostics {
    /// Summarize `text` and the result of parsing it.
    pub fn new(text: &str, result: &ParseResult, config: &DiagnosticsConfig) -> Self {
        let compact = remove_whitespace(text);
        let mut diagnostics = Self {
            text_length: text.chars().count(),
            title_hit: is_mould_transfer_notice(text),
            date_label_hit: compact.contains(MOVE_DATE_LABEL),
            parse_ok: result.is_ok(),
            error: None,
            title_context: None,
            date_context: None,
            document_date: None,
            rows: None,
            sample_rows: Vec::new(),
        };

        match result {
            Ok(notice) => {
                diagnostics.document_date =
                    Some(notice.document_date.format("%Y-%m-%d").to_string());
                diagnostics.rows = Some(notice.rows.len());
                diagnostics.sample_rows = notice
                    .rows
                    .iter()
                    .take(config.sample_rows)
                    .map(MaskedRow::from)
                    .collect();
            }
            Err(failure) => {
                let masked_context = |marker: &str| {
                    context(&compact, marker, config.context_before, config.context_after)
                        .map(|c| mask(&c, config.mask_limit))
                };
                diagnostics.error = Some(failure.reason());
                diagnostics.title_context = masked_context(TITLE_MARKER);
                diagnostics.date_context = masked_context(MOVE_DATE_LABEL);
            }
        }

        diagnostics
    }
}

impl fmt::Display for NoticeDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "textLength: {}", self.text_length)?;
        writeln!(f, "titleHit: {}", self.title_hit)?;
        writeln!(f, "hasMoveDateLabel: {}", self.date_label_hit)?;
        write!(f, "parseOk: {}", self.parse_ok)?;

        if let Some(error) = &self.error {
            write!(f, "\nerror: {}", error)?;
        }
        if let Some(ctx) = &self.title_context {
            write!(f, "\ntitleContext: {}", ctx)?;
        }
        if let Some(ctx) = &self.date_context {
            write!(f, "\ndateContext: {}", ctx)?;
        }
        if let Some(date) = &self.document_date {
            write!(f, "\nmouldMoveDate: {}", date)?;
        }
        if let Some(rows) = self.rows {
            write!(f, "\nrows: {}", rows)?;
            let sample = serde_json::to_string(&self.sample_rows).map_err(|_| fmt::Error)?;
            write!(f, "\nsampleRows: {}", sample)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::notice::{MouldTransferParser, NoticeParser};

    const NOTICE: &str = "美菱移模通知单（外调）\n模具移模时间2024-05-10\n\
                          零件图号 模具名称 模具编号 模具厂家 移至地方 封样单号\n\
                          1 C23122.21.1 把手座 ML01230271 红旗 ML-FYJYD-20240510-1000123";

    #[test]
    fn test_mask() {
        assert_eq!(mask("C23122.21.1", 32), "A#####.##.#");
        assert_eq!(mask("  把手  座\n红旗 ", 220), "把手 座 红旗");
    }

    #[test]
    fn test_mask_clips_before_masking() {
        assert_eq!(mask("ML01230271", 4), "AA##");
        assert_eq!(mask("把手座", 0), "");
    }

    #[test]
    fn test_context_window() {
        assert_eq!(context("一二三ABC四五", "ABC", 2, 4), Some("二三ABC四".to_string()));
        assert_eq!(context("ABC", "X", 2, 4), None);
    }

    #[test]
    fn test_success_summary() {
        let result = MouldTransferParser::new().parse_text(NOTICE);
        let diag = NoticeDiagnostics::new(NOTICE, &result, &DiagnosticsConfig::default());

        assert!(diag.title_hit);
        assert!(diag.date_label_hit);
        assert!(diag.parse_ok);
        assert_eq!(diag.document_date.as_deref(), Some("2024-05-10"));
        assert_eq!(diag.rows, Some(1));
        assert_eq!(diag.sample_rows[0].part_no, "A#####.##.#");
        assert_eq!(diag.sample_rows[0].mould_no, "AA########");
        assert_eq!(diag.sample_rows[0].seal_sample_no, "AA-AAAAA-########-#######");
        assert_eq!(diag.error, None);
    }

    #[test]
    fn test_failure_summary_has_masked_context() {
        let text = NOTICE.replace("2024-05-10", "待定");
        let result = MouldTransferParser::new().parse_text(&text);
        let diag = NoticeDiagnostics::new(&text, &result, &DiagnosticsConfig::default());

        assert!(!diag.parse_ok);
        assert!(diag.error.is_some());
        assert!(diag.sample_rows.is_empty());

        let date_context = diag.date_context.unwrap();
        assert!(date_context.contains("模具移模时间待定"));
        assert!(!date_context.chars().any(|c| c.is_ascii_digit()));
        assert!(diag.title_context.unwrap().starts_with("美菱移模通知单"));
    }

    #[test]
    fn test_display_lines() {
        let result = MouldTransferParser::new().parse_text("其他文件");
        let rendered =
            NoticeDiagnostics::new("其他文件", &result, &DiagnosticsConfig::default()).to_string();

        assert!(rendered.starts_with("textLength: 4\ntitleHit: false"));
        assert!(rendered.contains("parseOk: false"));
        assert!(rendered.contains("error: title marker"));
        assert!(!rendered.contains("rows:"));
    }
}
