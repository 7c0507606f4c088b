//! Seal sample number recovery.

use super::patterns::{
    ENDS_WITH_DATE_DIGITS, SEAL_LAST_HYPHEN_LOST, SEAL_NO, SEAL_NO_HYPHENS, SEAL_PREFIX_LINE,
    SEAL_SEQUENCE_LINE, SEAL_SPLIT_DATE, SEAL_SUFFIX_LINE,
};
use super::fields::normalize_seal_no;
use super::text::compress_spaces;
use super::FieldExtractor;

/// Find the first seal number in `s`, returned as written.
pub fn find_seal(s: &str) -> Option<&str> {
    SEAL_NO.captures(s).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

/// Join seal numbers that the extractor broke across two lines.
///
/// Handles `ML-CODE-YYYYMM` + `DD-SEQ` and `ML-CODE-YYYYMMDD` + `-SEQ`.
pub fn join_seal_split_lines(lines: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        let cur = &lines[i];
        if let Some(next) = lines.get(i + 1) {
            if is_seal_continuation(cur, next) {
                out.push(compress_spaces(&format!("{}{}", cur, next)));
                i += 2;
                continue;
            }
        }
        out.push(cur.clone());
        i += 1;
    }
    out
}

fn is_seal_continuation(cur: &str, next: &str) -> bool {
    if !SEAL_PREFIX_LINE.is_match(cur) {
        return false;
    }
    SEAL_SUFFIX_LINE.is_match(next)
        || (ENDS_WITH_DATE_DIGITS.is_match(cur) && SEAL_SEQUENCE_LINE.is_match(next))
}

/// Collects seal numbers across a whole document, tolerating lost hyphens.
pub struct SealCollector;

impl SealCollector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SealCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for SealCollector {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        self.extract_all(text).into_iter().next()
    }

    /// Distinct normalized seal numbers in first-seen order.
    fn extract_all(&self, text: &str) -> Vec<String> {
        let blob = compress_spaces(text);
        let mut found: Vec<String> = Vec::new();

        for caps in SEAL_NO.captures_iter(&blob) {
            found.push(normalize_seal_no(&caps[1]));
        }

        for caps in SEAL_SPLIT_DATE.captures_iter(&blob) {
            found.push(assemble(&caps[2], &format!("{}{}", &caps[3], &caps[4]), &caps[5]));
        }

        for caps in SEAL_NO_HYPHENS.captures_iter(&blob) {
            found.push(assemble(&caps[1], &format!("{}{}", &caps[2], &caps[3]), &caps[4]));
        }

        for caps in SEAL_LAST_HYPHEN_LOST.captures_iter(&blob) {
            found.push(assemble(&caps[1], &caps[2], &caps[3]));
        }

        let mut seen: Vec<String> = Vec::with_capacity(found.len());
        for seal in found {
            if !seal.is_empty() && !seen.contains(&seal) {
                seen.push(seal);
            }
        }
        seen
    }
}

fn assemble(code: &str, date: &str, seq: &str) -> String {
    normalize_seal_no(&format!("ML-{}-{}-{}", code.trim(), date.trim(), seq.trim()))
}

/// Collect every seal number in the text.
pub fn collect_seal_numbers(text: &str) -> Vec<String> {
    SealCollector::new().extract_all(text)
}
