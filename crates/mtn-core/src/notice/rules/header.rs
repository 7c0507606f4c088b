//! Table header location and header-label recognition.

use crate::models::notice::Field;

use super::text::compress_spaces;

pub const PART_NO_LABEL: &str = "零件图号";
pub const MOULD_NAME_LABEL: &str = "模具名称";
pub const MOULD_NO_LABEL: &str = "模具编号";
pub const MOULD_FACTORY_LABEL: &str = "模具厂家";
pub const MOVE_TO_LABELS: [&str; 2] = ["移至地方", "移至地点"];
pub const SEAL_LABELS: [&str; 2] = ["封样单号", "封样号"];

/// Compact form used for label comparison: whitespace, leading `#` and
/// colons removed.
pub fn compact_line(line: &str) -> String {
    let no_space: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    no_space
        .trim_start_matches('#')
        .chars()
        .filter(|c| *c != ':' && *c != '：')
        .collect()
}

fn contains_any(s: &str, keys: &[&str]) -> bool {
    keys.iter().any(|k| s.contains(k))
}

/// All six column labels are present.
pub fn is_table_header_compact(compact: &str) -> bool {
    compact.contains(PART_NO_LABEL)
        && compact.contains(MOULD_NAME_LABEL)
        && compact.contains(MOULD_NO_LABEL)
        && compact.contains(MOULD_FACTORY_LABEL)
        && contains_any(compact, &MOVE_TO_LABELS)
        && contains_any(compact, &SEAL_LABELS)
}

/// A line that is only table labels and carries no row data.
pub fn is_header_label_line(line: &str) -> bool {
    let c = compact_line(line);
    if c.is_empty() {
        return false;
    }
    if is_table_header_compact(&c) {
        return true;
    }
    let labels = [PART_NO_LABEL, MOULD_NAME_LABEL, MOULD_NO_LABEL, MOULD_FACTORY_LABEL];
    if labels.contains(&c.as_str()) {
        return true;
    }
    let short = c.chars().count() <= 6;
    short && (contains_any(&c, &MOVE_TO_LABELS) || contains_any(&c, &SEAL_LABELS))
}

/// The column a label line switches to in column-wise layouts.
///
/// The four plain labels must match exactly; destination and seal labels
/// may carry extra text.
pub fn column_label(compact: &str) -> Option<Field> {
    match compact {
        PART_NO_LABEL => Some(Field::PartNo),
        MOULD_NAME_LABEL => Some(Field::MouldName),
        MOULD_NO_LABEL => Some(Field::MouldNo),
        MOULD_FACTORY_LABEL => Some(Field::MouldFactory),
        c if contains_any(c, &MOVE_TO_LABELS) => Some(Field::MoveTo),
        c if contains_any(c, &SEAL_LABELS) => Some(Field::SealSampleNo),
        _ => None,
    }
}

/// Remove label tokens and colons from a header line, keeping any data
/// that shares the line.
pub fn strip_header_tokens(line: &str) -> String {
    let mut s = line.trim_start_matches(|c: char| c == '#' || c.is_whitespace()).to_string();
    let labels = [PART_NO_LABEL, MOULD_NAME_LABEL, MOULD_NO_LABEL, MOULD_FACTORY_LABEL]
        .into_iter()
        .chain(MOVE_TO_LABELS)
        .chain(SEAL_LABELS);
    for label in labels {
        s = s.replace(label, " ");
    }
    s = s.replace([':', '：'], " ");
    compress_spaces(&s)
}

/// How the header line was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMatch {
    /// All six labels on one line.
    FullRow,
    /// Only 零件图号 was found; other labels may be interleaved with data.
    PartNoLabel,
}

/// Position of the table header within the document lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHeader {
    /// Index of the header line.
    pub line_index: usize,
    /// Data left on the header line after label removal.
    pub tail: String,
    pub kind: HeaderMatch,
}

impl TableHeader {
    /// Data lines: the non-empty header tail, then every following line.
    pub fn data_lines(&self, lines: &[String]) -> Vec<String> {
        let mut out = Vec::with_capacity(lines.len().saturating_sub(self.line_index));
        if !self.tail.is_empty() {
            out.push(self.tail.clone());
        }
        out.extend(lines.iter().skip(self.line_index + 1).cloned());
        out
    }

    /// Lines from the header line onward, labels included.
    pub fn table_lines<'a>(&self, lines: &'a [String]) -> &'a [String] {
        &lines[self.line_index.min(lines.len())..]
    }
}

/// Find the table header line.
pub fn locate_header(lines: &[String]) -> Option<TableHeader> {
    let found = lines
        .iter()
        .position(|l| is_table_header_compact(&compact_line(l)))
        .map(|i| (i, HeaderMatch::FullRow))
        .or_else(|| {
            lines
                .iter()
                .position(|l| compact_line(l).contains(PART_NO_LABEL))
                .map(|i| (i, HeaderMatch::PartNoLabel))
        });

    found.map(|(line_index, kind)| TableHeader {
        line_index,
        tail: strip_header_tokens(&lines[line_index]),
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_compact_line() {
        assert_eq!(compact_line("## 零件 图号："), "零件图号");
        assert_eq!(compact_line(" 移至 地点 : "), "移至地点");
    }

    #[test]
    fn test_header_label_lines() {
        assert!(is_header_label_line("零件图号"));
        assert!(is_header_label_line("#模具 编号"));
        assert!(is_header_label_line("移至地方"));
        assert!(is_header_label_line("封样单号："));
        assert!(is_header_label_line(
            "零件图号 模具名称 模具编号 模具厂家 移至地点 封样号"
        ));
        assert!(!is_header_label_line("零件图号 C23122.21.1"));
        assert!(!is_header_label_line("封样单号 ML-FYJYD-20240510-1"));
        assert!(!is_header_label_line(""));
    }

    #[test]
    fn test_column_label() {
        assert_eq!(column_label("模具厂家"), Some(Field::MouldFactory));
        assert_eq!(column_label("移至地点(仓库)"), Some(Field::MoveTo));
        assert_eq!(column_label("模具名称备注"), None);
    }

    #[test]
    fn test_strip_header_tokens() {
        assert_eq!(
            strip_header_tokens("# 零件图号 模具名称 模具编号 模具厂家 移至地方 封样单号： 1 C1"),
            "1 C1"
        );
    }

    #[test]
    fn test_locate_full_header() {
        let lines = owned(&[
            "美菱移模通知单（外调）",
            "零件图号 模具名称 模具编号 模具厂家 移至地方 封样单号",
            "1 C23122.21.1 把手座",
        ]);
        let header = locate_header(&lines).unwrap();

        assert_eq!(header.line_index, 1);
        assert_eq!(header.kind, HeaderMatch::FullRow);
        assert_eq!(header.data_lines(&lines), owned(&["1 C23122.21.1 把手座"]));
        assert_eq!(header.table_lines(&lines).len(), 2);
    }

    #[test]
    fn test_locate_fallback_keeps_tail() {
        let lines = owned(&["标题", "零件图号 C23122.21.1", "模具名称"]);
        let header = locate_header(&lines).unwrap();

        assert_eq!(header.kind, HeaderMatch::PartNoLabel);
        assert_eq!(header.data_lines(&lines), owned(&["C23122.21.1", "模具名称"]));
    }

    #[test]
    fn test_locate_none() {
        assert_eq!(locate_header(&owned(&["模具名称", "模具编号"])), None);
    }
}
