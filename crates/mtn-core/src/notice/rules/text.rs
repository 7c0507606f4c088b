//! Text normalization shared by every parsing stage.

use super::patterns::{CHECKBOX_PREFIX, CJK_WORD, HAS_CJK, PRIVATE_USE, PURE_DIGITS};

/// Markers after which no table data follows.
pub const TERMINATORS: [&str; 2] = ["附件", "报告审批意见"];

/// Remove carriage returns; map NBSP and tabs to spaces.
///
/// Runs of spaces are kept since they carry column gaps.
pub fn normalize_text(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '\r')
        .map(|c| match c {
            '\u{00a0}' | '\t' => ' ',
            other => other,
        })
        .collect()
}

/// Split normalized text into right-trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collapse whitespace runs to single spaces and trim.
pub fn compress_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove all whitespace.
pub fn remove_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn strip_checkbox_prefix(line: &str) -> String {
    CHECKBOX_PREFIX.replace(line, "").into_owned()
}

/// Replace the first occurrence of `needle` with a single space.
pub fn blank_out(haystack: &str, needle: &str) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }
    haystack.replacen(needle, " ", 1)
}

pub fn is_terminator(line: &str) -> bool {
    TERMINATORS.iter().any(|t| line.contains(t))
}

pub fn is_pure_digits(s: &str) -> bool {
    PURE_DIGITS.is_match(s.trim())
}

/// Lines carrying private-use glyphs are font garbage.
pub fn is_junk_line(s: &str) -> bool {
    PRIVATE_USE.is_match(s)
}

pub fn is_cjk_word(s: &str) -> bool {
    CJK_WORD.is_match(s.trim())
}

pub fn has_cjk(s: &str) -> bool {
    HAS_CJK.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("a\r\nb\u{00a0}c\td"), "a\nb c d");
    }

    #[test]
    fn test_split_lines_drops_blank() {
        let lines = split_lines("one  \n\n   \ntwo");
        assert_eq!(lines, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_compress_and_remove_whitespace() {
        assert_eq!(compress_spaces("  a   b \n c "), "a b c");
        assert_eq!(remove_whitespace(" 模具 移模 时间 "), "模具移模时间");
    }

    #[test]
    fn test_checkbox_and_terminators() {
        assert_eq!(strip_checkbox_prefix("☐ 1 C1"), "1 C1");
        assert!(is_terminator("附件：检验报告"));
        assert!(!is_terminator("把手座"));
    }

    #[test]
    fn test_glyph_classes() {
        assert!(is_cjk_word("红旗"));
        assert!(!is_cjk_word("红旗1"));
        assert!(has_cjk("C1把手"));
        assert!(is_junk_line("\u{e001}"));
        assert!(is_pure_digits(" 12 "));
    }
}
