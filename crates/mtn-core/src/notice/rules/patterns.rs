//! Regex patterns for mould transfer notice extraction.
//!
//! Word boundaries are written as `(?-u:\b)` so that CJK text next to an
//! ASCII token still counts as a boundary.

use lazy_static::lazy_static;
use regex::Regex;

/// Hyphen variants seen in extracted text: ASCII, fullwidth, em dash,
/// en dash, non-breaking hyphen, minus sign.
pub const HYPHEN_CLASS: &str = r"[-\x{FF0D}\x{2014}\x{2013}\x{2011}\x{2212}]";

/// Separator between seal number parts when hyphens may be lost.
const SEAL_SEP: &str = r"(?:\s*[-\x{FF0D}\x{2014}\x{2013}\x{2011}\x{2212}]\s*|\s+)";

fn with_hyphens(pattern: &str) -> String {
    pattern.replace("{H}", HYPHEN_CLASS).replace("{SEP}", SEAL_SEP)
}

lazy_static! {
    // Dates

    // `2024-05-10` (dates::tests::test_iso_date)
    pub static ref DATE_ISO: Regex = Regex::new(
        r"(?-u:\b)([0-9]{4})-([0-9]{2})-([0-9]{2})(?-u:\b)"
    ).unwrap();

    // `2024/1/5`, `2024 - 1 - 5`, `2024.1.5` (dates::tests::test_loose_date)
    pub static ref DATE_LOOSE: Regex = Regex::new(
        r"([0-9]{4})\s*[-/.]\s*([0-9]{1,2})\s*[-/.]\s*([0-9]{1,2})"
    ).unwrap();

    // `2024年1月5日`, trailing 日 optional (dates::tests::test_cn_date)
    pub static ref DATE_CN: Regex = Regex::new(
        r"([0-9]{4})\s*年\s*([0-9]{1,2})\s*月\s*([0-9]{1,2})\s*日?"
    ).unwrap();

    // Label glued to an ISO date in whitespace-free text (dates::tests::test_compact_label)
    pub static ref DATE_LABEL_COMPACT: Regex = Regex::new(
        r"模具移模时间([0-9]{4}-[0-9]{2}-[0-9]{2})"
    ).unwrap();

    // Label then up to 80 characters, line breaks included, then a date
    // (dates::tests::test_label_across_lines)
    pub static ref DATE_LABEL_NEARBY: Regex = Regex::new(
        r"模具\s*移模\s*时间(?s:.){0,80}?([0-9]{4}\s*[-/]\s*[0-9]{1,2}\s*[-/]\s*[0-9]{1,2})"
    ).unwrap();

    // Mould and seal numbers

    // `ML01230271`, `ML 0123` (fields::tests::test_normalize_mould_no)
    pub static ref MOULD_NO: Regex = Regex::new(r"(ML\s*[0-9]+)").unwrap();

    // Canonical mould number after whitespace removal.
    pub static ref MOULD_NO_STRICT: Regex = Regex::new(r"^ML[0-9]+$").unwrap();

    // `ML-FYJYD-20240510-1000123` with any hyphen variant and loose spacing
    // (seal::tests::test_find_seal_with_hyphen_variants)
    pub static ref SEAL_NO: Regex = Regex::new(&with_hyphens(
        r"(ML\s*{H}\s*[A-Z0-9]+\s*{H}\s*[0-9]{8}\s*{H}\s*[0-9]+)"
    )).unwrap();

    // Canonical seal number after normalization.
    pub static ref SEAL_NO_STRICT: Regex = Regex::new(
        r"^ML-[A-Z0-9]+-[0-9]{8}-[0-9]+$"
    ).unwrap();

    // `ML FYJYD 202405 10 1000123`: date split after the month
    // (seal::tests::test_collect_split_date)
    pub static ref SEAL_SPLIT_DATE: Regex = Regex::new(&with_hyphens(
        r"(ML){SEP}([A-Z0-9]+){SEP}([0-9]{6})\s*([0-9]{2}){SEP}([0-9]+)"
    )).unwrap();

    // All hyphens lost, long sequence number (seal::tests::test_collect_without_hyphens)
    pub static ref SEAL_NO_HYPHENS: Regex = Regex::new(&with_hyphens(
        r"(?-u:\b)ML{SEP}([A-Z0-9]+){SEP}([0-9]{6})\s*([0-9]{2}){SEP}([0-9]{6,})(?-u:\b)"
    )).unwrap();

    // `ML-FYJYD-20240510 1000123`: last hyphen lost (seal::tests::test_collect_last_hyphen_lost)
    pub static ref SEAL_LAST_HYPHEN_LOST: Regex = Regex::new(&with_hyphens(
        r"(?-u:\b)ML{SEP}([A-Z0-9]+){SEP}([0-9]{8})\s+([0-9]{5,})(?-u:\b)"
    )).unwrap();

    // Line opening a seal number that continues on the next line.
    pub static ref SEAL_PREFIX_LINE: Regex = Regex::new(&with_hyphens(
        r"(?i)^\s*ML\s*{H}"
    )).unwrap();

    // `10-1000123` on its own line (seal::tests::test_join_day_suffix)
    pub static ref SEAL_SUFFIX_LINE: Regex = Regex::new(&with_hyphens(
        r"^\s*[0-9]{2}\s*{H}\s*[0-9]+\s*$"
    )).unwrap();

    // `-1000123` or `1000123` on its own line (seal::tests::test_join_sequence_suffix)
    pub static ref SEAL_SEQUENCE_LINE: Regex = Regex::new(&with_hyphens(
        r"^\s*{H}?\s*[0-9]+\s*$"
    )).unwrap();

    pub static ref ENDS_WITH_DATE_DIGITS: Regex = Regex::new(r"[0-9]{8}\s*$").unwrap();

    // Part numbers

    // `C23122.21.1` (fields::tests::test_extract_part_no)
    pub static ref PART_NO_C: Regex = Regex::new(
        r"(?-u:\b)(C[0-9][A-Za-z0-9_.]*[A-Za-z0-9_])(?-u:\b)"
    ).unwrap();

    // `B22197.21.1.3`, `25025.5.12`
    pub static ref PART_NO_LOOSE: Regex = Regex::new(
        r"(?-u:\b)([A-Z]?[0-9][A-Za-z0-9_.]*[A-Za-z0-9_])(?-u:\b)"
    ).unwrap();

    // `C23122.21.` with a dangling dot
    pub static ref PART_NO_DANGLING: Regex = Regex::new(
        r"([A-Z]?[0-9][A-Za-z0-9_.]+)\.(?:\s|$)"
    ).unwrap();

    // `2.1`, `21.1.3`: second half of a part number split over two lines
    pub static ref PART_SUFFIX_TOKEN: Regex = Regex::new(r"^[0-9]+(?:\.[0-9]+)+$").unwrap();

    // `1`, `1.2`, `12.3.4`: index-like values that are never part numbers
    pub static ref INDEX_LIKE: Regex = Regex::new(r"^[0-9]{1,3}(?:\.[0-9]{1,3})*$").unwrap();

    // `10-1000123`
    pub static ref DAY_SEQUENCE: Regex = Regex::new(&with_hyphens(r"^[0-9]{2}{H}[0-9]+$")).unwrap();

    // Row structure

    // `1.`, `☐ 2`, `3、` (row_oriented::tests::test_index_only_line)
    pub static ref INDEX_ONLY_LINE: Regex = Regex::new(
        r"^\s*(?:[□☐✓✔✅]?\s*)?([0-9]+)\s*[.、]?\s*$"
    ).unwrap();

    // `1 C23122...`, `1. C23122...`, `1、C23122...` (tests::test_new_row_prefix)
    pub static ref NEW_ROW_PREFIX: Regex = Regex::new(
        r"^\s*([0-9]{1,3})(?:[.、]\s+|、|\s+)"
    ).unwrap();

    pub static ref CHECKBOX_PREFIX: Regex = Regex::new(r"^\s*[□☐✓✔✅]\s*").unwrap();

    pub static ref LEADING_HASHES: Regex = Regex::new(r"^[#\s]+").unwrap();

    pub static ref WIDE_GAP: Regex = Regex::new(r"\s{2,}").unwrap();

    // `1 C23122.21.1` sharing the first wide-gap column
    pub static ref INDEX_AND_VALUE: Regex = Regex::new(r"^([0-9]+)\s+(\S.*)$").unwrap();

    // Prefix text, mould number, tail (column_oriented::tests::test_anchor_groups)
    pub static ref MOULD_NO_SPLIT: Regex = Regex::new(r"^(.*?)(ML\s*[0-9]+)\s*(.*)$").unwrap();

    // Glyph classes

    // Private-use glyphs left behind by symbol fonts.
    pub static ref PRIVATE_USE: Regex = Regex::new(r"[\x{E000}-\x{F8FF}]").unwrap();

    pub static ref CJK_WORD: Regex = Regex::new(r"^[\x{4e00}-\x{9fa5}]+$").unwrap();

    pub static ref HAS_CJK: Regex = Regex::new(r"[\x{4e00}-\x{9fa5}]").unwrap();

    pub static ref PURE_DIGITS: Regex = Regex::new(r"^[0-9]+$").unwrap();

    pub static ref DATE_DIGITS: Regex = Regex::new(r"^[0-9]{8}$").unwrap();

    // Mould name contamination

    // Seal-like fragment leaked into a name (fields::tests::test_clean_mould_name_drops_leaks)
    pub static ref NAME_SEAL_FRAGMENT: Regex = Regex::new(&with_hyphens(
        r"(?i)ML\s*{H}\s*[A-Z0-9]+\s*{H}\s*[0-9]{6,8}\s*{H}\s*[0-9]+"
    )).unwrap();

    pub static ref NAME_DAY_SEQUENCE: Regex = Regex::new(&with_hyphens(
        r"(?-u:\b)[0-9]{2}\s*{H}\s*[0-9]+(?-u:\b)"
    )).unwrap();

    pub static ref LEADING_INDEX: Regex = Regex::new(r"^[0-9]+\s+").unwrap();

    pub static ref ISOLATED_INDEX: Regex = Regex::new(r"\s+[0-9]+\s+").unwrap();

    // `ML-` inside a name (selector::tests::test_suspicious_rows)
    pub static ref SUSPICIOUS_MOULD_HYPHEN: Regex = Regex::new(&with_hyphens(
        r"(?i)ML\s*{H}"
    )).unwrap();

    // A mould number inside a name (selector::tests::test_suspicious_rows)
    pub static ref SUSPICIOUS_MOULD_NO: Regex = Regex::new(r"(?i)ML\s*[0-9]+").unwrap();

    // `10-1000123` inside a name
    pub static ref SUSPICIOUS_DAY_SEQUENCE: Regex = Regex::new(&with_hyphens(
        r"[0-9]{2}\s*{H}\s*[0-9]{6,}"
    )).unwrap();

    // Global scan: part number, lazy gap, mould number
    // (global_scan::tests::test_scan_two_rows)
    pub static ref PART_TO_MOULD: Regex = Regex::new(
        r"(?-u:\b)([A-Z]?[0-9][A-Za-z0-9_.]*[A-Za-z0-9_])(?s:.){0,220}?(?-u:\b)(ML\s*[0-9]+)(?-u:\b)"
    ).unwrap();
}
