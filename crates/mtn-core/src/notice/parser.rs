//! Mould transfer notice parser.

use tracing::{debug, info};

use crate::error::{FailureKind, ParseFailure};
use crate::layout::{LayoutReconstructor, PositionedFragment};
use crate::models::config::LayoutConfig;
use crate::models::notice::{MouldTransferNotice, ParseResult};

use super::rules::{
    find_move_date, is_mould_transfer_notice, locate_header, normalize_text, split_lines,
};
use super::selector::{finalize, Candidates};
use super::NoticeParser;

/// Parser for 美菱移模通知单（外调） documents.
///
/// Stateless apart from layout settings; one instance can be shared across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct MouldTransferParser {
    /// Layout settings used when parsing positioned fragments.
    layout: LayoutConfig,
}

impl MouldTransferParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set layout reconstruction settings.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }
}

impl NoticeParser for MouldTransferParser {
    fn parse_text(&self, text: &str) -> ParseResult {
        let raw_text = normalize_text(text);
        info!("Parsing mould transfer notice ({} chars)", raw_text.chars().count());

        if !is_mould_transfer_notice(&raw_text) {
            debug!("Title marker not found");
            return Err(ParseFailure::new(FailureKind::TitleNotFound, raw_text));
        }

        let lines = split_lines(&raw_text);

        let Some(document_date) = find_move_date(&raw_text, &lines) else {
            debug!("No date near the move date label");
            return Err(ParseFailure::new(FailureKind::DateNotFound, raw_text));
        };
        debug!("Document date: {}", document_date);

        let Some(header) = locate_header(&lines) else {
            debug!("Table header not found");
            return Err(ParseFailure::new(FailureKind::HeaderNotFound, raw_text));
        };
        debug!("Table header at line {} ({:?})", header.line_index, header.kind);

        let Some(winner) = Candidates::generate(&raw_text, &lines, &header).select() else {
            debug!("No strategy recovered any rows");
            return Err(ParseFailure::new(FailureKind::NoRows, raw_text));
        };
        debug!("Selected {} with {} rows", winner.strategy, winner.rows.len());

        let rows = finalize(winner, &raw_text);
        info!("Parsed {} rows dated {}", rows.len(), document_date);

        Ok(MouldTransferNotice {
            document_date,
            rows,
            raw_text,
        })
    }

    fn parse_fragments(&self, pages: &[Vec<PositionedFragment>]) -> ParseResult {
        let document = LayoutReconstructor::new(self.layout.clone()).reconstruct(pages);
        self.parse_text(&document.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use crate::models::notice::RowRecord;

    const SINGLE_ROW: &str = "美菱移模通知单（外调）\n\
        模具移模时间2024-05-10\n\
        零件图号 模具名称 模具编号 模具厂家 移至地方 封样单号\n\
        1 C23122.21.1 把手座 ML01230271 红旗 ML-FYJYD-20240510-1000123";

    const COLUMN_WISE: &str = "美菱移模通知单（外调）\n\
        模具移模时间 2024-05-10\n\
        零件图号\nC11111.1.1\nC22222.2.2\n\
        模具名称\n把手座\n推杆座\n\
        模具编号\nML0001\nML0002\n\
        模具厂家\n红旗\n红旗\n\
        移至地方\n合肥\n合肥\n\
        封样单号\nML-A1-20240510-1\nML-A1-20240510-2";

    fn parse(text: &str) -> ParseResult {
        MouldTransferParser::new().parse_text(text)
    }

    fn failure_kind(text: &str) -> FailureKind {
        parse(text).unwrap_err().kind
    }

    #[test]
    fn test_single_row_notice() {
        let notice = parse(SINGLE_ROW).unwrap();

        assert_eq!(notice.document_date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert_eq!(notice.rows.len(), 1);

        let row = &notice.rows[0];
        assert_eq!(row.index, 1);
        assert_eq!(row.part_no, "C23122.21.1");
        assert_eq!(row.mould_name, "把手座");
        assert_eq!(row.mould_no, "ML01230271");
        assert!(row.mould_factory == "红旗" || row.move_to == "红旗");
        assert_eq!(row.seal_sample_no, "ML-FYJYD-20240510-1000123");
    }

    #[test]
    fn test_raw_text_is_normalized() {
        let notice = parse(&SINGLE_ROW.replace('\n', "\r\n")).unwrap();
        assert!(!notice.raw_text.contains('\r'));
    }

    #[test]
    fn test_title_gate_runs_first() {
        let text = SINGLE_ROW.replace("美菱移模通知单（外调）", "美菱采购订单");
        let failure = parse(&text).unwrap_err();

        assert_eq!(failure.kind, FailureKind::TitleNotFound);
        assert!(failure.raw_text.contains("模具移模时间"));
    }

    #[test]
    fn test_missing_date() {
        let text = SINGLE_ROW.replace("模具移模时间2024-05-10", "模具移模时间 待定");
        assert_eq!(failure_kind(&text), FailureKind::DateNotFound);
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            failure_kind("美菱移模通知单(外调)\n模具移模时间 2024/5/10\n把手座"),
            FailureKind::HeaderNotFound
        );
    }

    #[test]
    fn test_no_rows() {
        let text = "美菱移模通知单（外调）\n模具移模时间2024-05-10\n\
                    零件图号 模具名称 模具编号 模具厂家 移至地方 封样单号\n备注：无";
        assert_eq!(failure_kind(text), FailureKind::NoRows);
    }

    #[test]
    fn test_header_found_by_part_no_label() {
        let text = "美菱移模通知单（外调）\n\
                    模具移模时间 2024-05-10\n\
                    零件图号 C23122.21.1 把手座 ML01230271 红旗 合肥\n\
                    C22222.2.2 推杆座 ML0002 红旗 合肥";
        let notice = parse(text).unwrap();

        assert_eq!(notice.rows.len(), 2);
        assert_eq!(notice.rows[0].part_no, "C23122.21.1");
        assert_eq!(notice.rows[0].mould_name, "把手座");
        assert_eq!(notice.rows[0].mould_no, "ML01230271");
        assert_eq!(notice.rows[0].mould_factory, "红旗");
        assert_eq!(notice.rows[0].move_to, "合肥");
        assert_eq!(notice.rows[1].index, 2);
        assert_eq!(notice.rows[1].part_no, "C22222.2.2");
        assert_eq!(notice.rows[1].mould_no, "ML0002");
    }

    #[test]
    fn test_unclassifiable_lines_fall_back_to_global_scan() {
        let text = "美菱移模通知单（外调）\n\
                    模具移模时间 2024-05-10\n\
                    零件图号 模具名称 模具编号 模具厂家 移至地方 封样单号\n\
                    序 C11111.1.1 把手 ML0001 红旗 合肥 ML-A1-20240510-1\n\
                    序 C22222.2.2 推杆 ML0002 红旗 合肥 ML-A1-20240510-2";
        let notice = parse(text).unwrap();

        let expected = vec![
            RowRecord {
                index: 1,
                part_no: "C11111.1.1".to_string(),
                mould_name: "把手".to_string(),
                mould_no: "ML0001".to_string(),
                mould_factory: "红旗".to_string(),
                move_to: "合肥".to_string(),
                seal_sample_no: "ML-A1-20240510-1".to_string(),
            },
            RowRecord {
                index: 2,
                part_no: "C22222.2.2".to_string(),
                mould_name: "推杆".to_string(),
                mould_no: "ML0002".to_string(),
                mould_factory: "红旗".to_string(),
                move_to: "合肥".to_string(),
                seal_sample_no: "ML-A1-20240510-2".to_string(),
            },
        ];
        assert_eq!(notice.rows, expected);
    }

    #[test]
    fn test_index_line_after_named_row_keeps_both_rows() {
        let text = "美菱移模通知单（外调）\n\
                    模具移模时间 2024-05-10\n\
                    零件图号 模具名称 模具编号 模具厂家 移至地方 封样单号\n\
                    1\nC11111.1.1\n把手座\n2\n推杆座\nML0002\n红旗";
        let notice = parse(text).unwrap();

        assert_eq!(notice.rows.len(), 2);
        assert_eq!(notice.rows[0].part_no, "C11111.1.1");
        assert_eq!(notice.rows[0].mould_name, "把手座");
        assert_eq!(notice.rows[1].mould_name, "推杆座");
        assert_eq!(notice.rows[1].mould_no, "ML0002");
    }

    #[test]
    fn test_column_wise_document_uses_column_rows() {
        let notice = parse(COLUMN_WISE).unwrap();

        let expected = vec![
            RowRecord {
                index: 1,
                part_no: "C11111.1.1".to_string(),
                mould_name: "把手座".to_string(),
                mould_no: "ML0001".to_string(),
                mould_factory: "红旗".to_string(),
                move_to: "合肥".to_string(),
                seal_sample_no: "ML-A1-20240510-1".to_string(),
            },
            RowRecord {
                index: 2,
                part_no: "C22222.2.2".to_string(),
                mould_name: "推杆座".to_string(),
                mould_no: "ML0002".to_string(),
                mould_factory: "红旗".to_string(),
                move_to: "合肥".to_string(),
                seal_sample_no: "ML-A1-20240510-2".to_string(),
            },
        ];
        assert_eq!(notice.rows, expected);
    }

    #[test]
    fn test_indices_are_dense_regardless_of_printed_index() {
        let text = "美菱移模通知单（外调）\n模具移模时间2024-05-10\n\
                    零件图号 模具名称 模具编号 模具厂家 移至地方 封样单号\n\
                    7 C11111.1.1 把手 ML0001 红旗\n\
                    9 C22222.2.2 推杆 ML0002 红旗";
        let notice = parse(text).unwrap();

        let indices: Vec<u32> = notice.rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(parse(SINGLE_ROW), parse(SINGLE_ROW));
        assert_eq!(parse(COLUMN_WISE), parse(COLUMN_WISE));
    }

    #[test]
    fn test_parse_fragments() {
        let frag = |text: &str, x: f64, y: f64| {
            PositionedFragment::new(text, x, y, 8.0 * text.chars().count() as f64)
        };
        let page = vec![
            frag("美菱移模通知单（外调）", 100.0, 800.0),
            frag("模具移模时间", 10.0, 780.0),
            frag("2024-05-10", 60.0, 780.5),
            frag("零件图号 模具名称 模具编号 模具厂家 移至地方 封样单号", 10.0, 760.0),
            frag("1", 10.0, 740.0),
            frag("C23122.21.1", 20.0, 740.0),
            frag("把手座", 120.0, 740.0),
            frag("ML01230271", 160.0, 740.0),
            frag("红旗", 260.0, 740.0),
            frag("ML-FYJYD-20240510-1000123", 300.0, 740.0),
        ];

        let notice = MouldTransferParser::new()
            .with_layout(LayoutConfig::default())
            .parse_fragments(&[page])
            .unwrap();

        assert_eq!(notice.rows.len(), 1);
        assert_eq!(notice.rows[0].part_no, "C23122.21.1");
        assert_eq!(notice.rows[0].mould_no, "ML01230271");
    }

    #[test]
    fn test_shared_across_threads() {
        let parser = MouldTransferParser::new();
        let results: Vec<ParseResult> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| parser.parse_text(SINGLE_ROW)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(results.iter().all(|r| *r == results[0]));
    }

    #[test]
    fn test_never_panics_on_garbage() {
        for text in [
            "",
            "\u{e000}\u{e001}",
            "美菱移模通知单（外调）\n模具移模时间2024-05-10\n零件图号\n\n\n",
            "零件图号 ML ML- 1 。",
        ] {
            let _ = parse(text);
        }
    }
}
