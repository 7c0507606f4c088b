//! Field normalizers and part-number heuristics.

use std::collections::HashSet;

use crate::models::notice::RowRecord;

use super::patterns::{
    DAY_SEQUENCE, DATE_DIGITS, INDEX_LIKE, ISOLATED_INDEX, LEADING_INDEX, MOULD_NO_STRICT,
    NAME_DAY_SEQUENCE, NAME_SEAL_FRAGMENT, PART_NO_C, PART_NO_DANGLING, PART_NO_LOOSE,
    PART_SUFFIX_TOKEN, PRIVATE_USE, SEAL_NO_STRICT,
};
use super::text::{compress_spaces, has_cjk, normalize_text, remove_whitespace};

/// Longest mould name still preferred as a standalone CJK token.
const MAX_NAME_CHARS: usize = 16;

/// Remove whitespace from a mould number.
pub fn normalize_mould_no(s: &str) -> String {
    remove_whitespace(s)
}

/// Remove whitespace from a seal number and map hyphen variants to `-`.
pub fn normalize_seal_no(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '\u{FF0D}' | '\u{2014}' | '\u{2013}' | '\u{2011}' | '\u{2212}' => '-',
            other => other,
        })
        .collect()
}

/// Normalized mould number, or empty when it is not `ML` + digits.
pub fn canonical_mould_no(s: &str) -> String {
    let v = normalize_mould_no(s);
    if MOULD_NO_STRICT.is_match(&v) { v } else { String::new() }
}

/// Normalized seal number, or empty when it does not have the strict shape.
pub fn canonical_seal_no(s: &str) -> String {
    let v = normalize_seal_no(s);
    if SEAL_NO_STRICT.is_match(&v) { v } else { String::new() }
}

/// Find the first part-number-shaped token.
///
/// `C`-prefixed numbers win over other shapes; a trailing dangling dot is
/// tolerated.
pub fn extract_part_no(line: &str) -> Option<String> {
    let s = compress_spaces(line);
    [&*PART_NO_C, &*PART_NO_LOOSE, &*PART_NO_DANGLING]
        .into_iter()
        .find_map(|re| re.captures(&s).map(|caps| caps[1].to_string()))
}

/// Plausibility check separating part numbers from indices, mould numbers
/// and seal fragments.
pub fn is_likely_part_no(value: &str) -> bool {
    let s = value.trim();
    if s.is_empty() {
        return false;
    }
    if s.to_ascii_uppercase().starts_with("ML") {
        return false;
    }
    if INDEX_LIKE.is_match(s) || DAY_SEQUENCE.is_match(s) {
        return false;
    }
    if s.chars().count() < 5 {
        return false;
    }
    if !s.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    s.chars().any(|c| c.is_ascii_alphabetic()) || s.contains('.')
}

/// First half of a part number broken after a dot, e.g. `B22197.21.`.
pub fn is_part_prefix_token(value: &str) -> bool {
    let v = value.trim();
    !v.is_empty() && v.chars().any(|c| c.is_ascii_alphabetic()) && v.ends_with('.')
}

/// Second half of a split part number, e.g. `2.1`.
pub fn is_part_suffix_token(value: &str) -> bool {
    PART_SUFFIX_TOKEN.is_match(value.trim())
}

pub fn join_split_part_no(prefix: &str, suffix: &str) -> String {
    remove_whitespace(&format!("{}{}", prefix.trim(), suffix.trim()))
}

/// Eight digits, typically a stray date.
pub fn is_date_digits(value: &str) -> bool {
    DATE_DIGITS.is_match(value.trim())
}

/// Format normalization applied to every candidate row.
///
/// Text fields are whitespace-compressed; mould and seal numbers are
/// canonicalized and cleared when malformed.
pub fn normalize_row(row: &RowRecord) -> RowRecord {
    RowRecord {
        index: row.index,
        part_no: compress_spaces(&row.part_no),
        mould_name: compress_spaces(&row.mould_name),
        mould_no: canonical_mould_no(&row.mould_no),
        mould_factory: compress_spaces(&row.mould_factory),
        move_to: compress_spaces(&row.move_to),
        seal_sample_no: canonical_seal_no(&row.seal_sample_no),
    }
}

/// Strip values of other columns that leaked into the mould name.
///
/// Returns an empty string when nothing usable is left.
pub fn clean_mould_name(row: &RowRecord) -> String {
    let original = normalize_text(&row.mould_name);
    if original.trim().is_empty() {
        return String::new();
    }

    let known: Vec<String> = [&row.mould_no, &row.mould_factory, &row.move_to, &row.seal_sample_no]
        .into_iter()
        .map(|v| compress_spaces(v))
        .filter(|v| !v.is_empty())
        .collect();
    let known_set: HashSet<&str> = known.iter().map(String::as_str).collect();

    let mut s = compress_spaces(&PRIVATE_USE.replace_all(&original, " "));
    for value in &known {
        s = s.replace(value.as_str(), " ");
    }

    s = NAME_SEAL_FRAGMENT.replace_all(&s, " ").into_owned();
    s = NAME_DAY_SEQUENCE.replace_all(&s, " ").into_owned();
    s = LEADING_INDEX.replace(&s, "").into_owned();
    s = ISOLATED_INDEX.replace_all(&s, " ").into_owned();

    let index = row.index.to_string();
    let mut tokens: Vec<&str> = Vec::new();
    for token in s.split_whitespace() {
        if token == index || known_set.contains(token) || super::text::is_pure_digits(token) {
            continue;
        }
        if tokens.last() == Some(&token) {
            continue;
        }
        tokens.push(token);
    }

    let preferred = tokens
        .iter()
        .find(|t| has_cjk(t) && t.chars().count() <= MAX_NAME_CHARS);

    match preferred {
        Some(token) => token.to_string(),
        None => tokens.join(" "),
    }
}
