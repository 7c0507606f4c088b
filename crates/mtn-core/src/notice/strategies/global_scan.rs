//! Global fallback scanner.
//!
//! Ignores line structure entirely and looks for `part number ... mould
//! number` pairs in the flattened table section.

use regex::Captures;

use crate::models::notice::RowRecord;
use crate::notice::rules::fields::{is_likely_part_no, normalize_mould_no, normalize_seal_no};
use crate::notice::rules::header::PART_NO_LABEL;
use crate::notice::rules::patterns::PART_TO_MOULD;
use crate::notice::rules::seal::find_seal;
use crate::notice::rules::text::{compress_spaces, TERMINATORS};

/// Characters after a mould number searched for factory, destination and seal.
const TRAILING_CHARS: usize = 240;

/// Text from the first 零件图号 up to the earliest terminator.
pub fn table_section(raw_text: &str) -> &str {
    let tail = match raw_text.find(PART_NO_LABEL) {
        Some(start) => &raw_text[start..],
        None => raw_text,
    };
    let end = TERMINATORS
        .iter()
        .filter_map(|t| tail.find(t))
        .min()
        .unwrap_or(tail.len());
    &tail[..end]
}

/// Next pair whose part number passes the plausibility check.
fn next_pair<'t>(s: &'t str, mut pos: usize) -> Option<Captures<'t>> {
    while pos <= s.len() {
        let caps = PART_TO_MOULD.captures_at(s, pos)?;
        let part = caps.get(1)?;
        if is_likely_part_no(part.as_str()) {
            return Some(caps);
        }
        pos = part.end();
    }
    None
}

/// Byte offset `n` characters after `start`, clamped to the end of `s`.
fn advance_chars(s: &str, start: usize, n: usize) -> usize {
    s[start..]
        .char_indices()
        .nth(n)
        .map_or(s.len(), |(i, _)| start + i)
}

/// Scan the raw text for rows.
pub fn global_scan(raw_text: &str) -> Vec<RowRecord> {
    let s = compress_spaces(table_section(raw_text));
    let mut rows: Vec<RowRecord> = Vec::new();
    let mut pos = 0;

    while let Some(caps) = next_pair(&s, pos) {
        let (Some(whole), Some(part), Some(mould)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            break;
        };

        // Trailing text stops at the next row or after a fixed window.
        let next_start = next_pair(&s, whole.end())
            .and_then(|next| next.get(1))
            .map_or(s.len(), |m| m.start());
        let window_end = advance_chars(&s, mould.end(), TRAILING_CHARS).min(next_start);
        let trailing = &s[mould.end()..window_end.max(mould.end())];

        let (seal, tail) = match find_seal(trailing) {
            Some(seal) => {
                let cut = trailing.find(seal).unwrap_or(trailing.len());
                (normalize_seal_no(seal), &trailing[..cut])
            }
            None => (String::new(), trailing),
        };

        let mut tail_tokens = tail.split_whitespace();
        let mould_factory = tail_tokens.next().unwrap_or_default().to_string();
        let move_to = tail_tokens.collect::<Vec<_>>().join(" ");

        rows.push(RowRecord {
            index: rows.len() as u32 + 1,
            part_no: part.as_str().to_string(),
            mould_name: compress_spaces(&s[part.end()..mould.start()]),
            mould_no: normalize_mould_no(mould.as_str()),
            mould_factory,
            move_to,
            seal_sample_no: seal,
        });

        pos = whole.end();
    }

    rows
}
