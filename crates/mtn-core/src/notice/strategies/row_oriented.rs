//! Row-oriented generator.
//!
//! Assumes the extractor emitted the table row by row. Each data line is
//! classified and fed to a two-state scanner: a printed index or a fresh
//! part number opens a row, other lines fill the open row's empty fields.

use tracing::trace;

use crate::models::notice::RowRecord;
use crate::notice::rules::fields::{
    extract_part_no, is_likely_part_no, is_part_prefix_token, is_part_suffix_token,
    join_split_part_no, normalize_mould_no, normalize_seal_no,
};
use crate::notice::rules::header::is_header_label_line;
use crate::notice::rules::patterns::{
    INDEX_AND_VALUE, INDEX_ONLY_LINE, MOULD_NO, NEW_ROW_PREFIX, SEAL_PREFIX_LINE, WIDE_GAP,
};
use crate::notice::rules::seal::{find_seal, join_seal_split_lines};
use crate::notice::rules::text::{
    blank_out, compress_spaces, is_pure_digits, is_terminator, strip_checkbox_prefix,
};

/// Classification of one data line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// 附件 or 报告审批意见: the table is over.
    Terminator,
    /// Column labels only.
    HeaderLabel,
    /// A bare printed index such as `3.`.
    IndexOnly { index: u32 },
    /// A printed index followed by row data.
    NewRow { index: u32, rest: String },
    /// Row data starting with a plausible part number, no index.
    PartNo { part_no: String },
    /// Anything else.
    Continuation,
}

/// Scanner state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Building(RowRecord),
}

/// Classify a data line.
pub fn classify(line: &str) -> LineKind {
    if is_terminator(line) {
        return LineKind::Terminator;
    }
    if is_header_label_line(line) {
        return LineKind::HeaderLabel;
    }

    let cleaned = strip_checkbox_prefix(line);

    if let Some(caps) = INDEX_ONLY_LINE.captures(&cleaned) {
        return match caps[1].parse() {
            Ok(index) => LineKind::IndexOnly { index },
            Err(_) => LineKind::Continuation,
        };
    }

    if let Some(caps) = NEW_ROW_PREFIX.captures(&cleaned) {
        let rest_start = caps.get(0).map_or(0, |m| m.end());
        if let Ok(index) = caps[1].parse() {
            return LineKind::NewRow {
                index,
                rest: cleaned[rest_start..].to_string(),
            };
        }
    }

    if let Some(token) = extract_part_no(&cleaned) {
        let first = first_column(&cleaned).unwrap_or_default();
        let candidate = if first.is_empty() || first.contains(char::is_whitespace) {
            token
        } else {
            first
        };
        if is_likely_part_no(&candidate) {
            return LineKind::PartNo { part_no: candidate };
        }
    }

    LineKind::Continuation
}

/// First column of a line: wide gaps delimit columns when there are at
/// least two, otherwise single spaces do. An index sharing the first column
/// is split off.
fn first_column(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let cols: Vec<&str> = WIDE_GAP.split(trimmed).filter(|c| !c.is_empty()).collect();
    if cols.len() >= 2 {
        return match INDEX_AND_VALUE.captures(cols[0]) {
            Some(caps) => Some(caps[1].to_string()),
            None => Some(cols[0].to_string()),
        };
    }
    trimmed.split_whitespace().next().map(str::to_string)
}

fn has_wide_gaps(line: &str) -> bool {
    WIDE_GAP.is_match(line.trim())
}

/// The open row has a part number and no other field yet.
fn only_part_no(row: &RowRecord) -> bool {
    !row.part_no.is_empty()
        && row.mould_name.is_empty()
        && row.mould_no.is_empty()
        && row.mould_factory.is_empty()
        && row.move_to.is_empty()
        && row.seal_sample_no.is_empty()
}

/// Build a row from the data on one line.
///
/// Seal, mould number and part number are pulled out by pattern; the
/// remaining tokens are name, factory and destination from the right.
pub fn single_line_row(
    index: u32,
    text: &str,
    known_part: Option<&str>,
    wide_gaps: bool,
) -> RowRecord {
    let mut row = RowRecord::with_index(index);
    let mut s = strip_checkbox_prefix(text).trim().to_string();

    if let Some(seal) = find_seal(&s).map(str::to_string) {
        row.seal_sample_no = normalize_seal_no(&seal);
        s = blank_out(&s, &seal);
    }

    if let Some(mould) = MOULD_NO.captures(&s).map(|caps| caps[1].to_string()) {
        row.mould_no = normalize_mould_no(&mould);
        s = blank_out(&s, &mould);
    }

    match known_part {
        Some(part) => row.part_no = part.to_string(),
        None => {
            if let Some(part) = extract_part_no(&s).filter(|p| is_likely_part_no(p)) {
                s = blank_out(&s, &part);
                row.part_no = part;
            }
        }
    }

    let tokens: Vec<String> = if wide_gaps {
        WIDE_GAP
            .split(s.trim())
            .map(compress_spaces)
            .filter(|t| !t.is_empty())
            .collect()
    } else {
        s.split_whitespace().map(str::to_string).collect()
    };

    match tokens.len() {
        0 => {}
        1 => row.mould_name = tokens[0].clone(),
        2 => {
            row.mould_name = tokens[0].clone();
            row.mould_factory = tokens[1].clone();
        }
        n => {
            row.mould_name = tokens[..n - 2].join(" ");
            row.mould_factory = tokens[n - 2].clone();
            row.move_to = tokens[n - 1].clone();
        }
    }

    row
}

/// Fill empty fields of `row` from a continuation line.
///
/// Before the mould number is known, leftover text extends the name; after
/// it, leftovers fill factory, then destination, then extend the name.
pub fn fill_missing_fields(row: &mut RowRecord, line: &str) {
    let mut s = compress_spaces(&strip_checkbox_prefix(line));
    if s.is_empty() {
        return;
    }

    for known in [&row.seal_sample_no, &row.mould_no, &row.part_no] {
        if !known.is_empty() {
            s = compress_spaces(&blank_out(&s, known));
        }
    }

    if row.seal_sample_no.is_empty() {
        if let Some(seal) = find_seal(&s).map(str::to_string) {
            row.seal_sample_no = normalize_seal_no(&seal);
            s = compress_spaces(&blank_out(&s, &seal));
        }
    }

    if row.mould_no.is_empty() {
        if let Some(mould) = MOULD_NO.captures(&s).map(|caps| caps[1].to_string()) {
            row.mould_no = normalize_mould_no(&mould);
            s = compress_spaces(&blank_out(&s, &mould));
        }
    }

    if row.part_no.is_empty() {
        if let Some(part) = extract_part_no(&s).filter(|p| is_likely_part_no(p)) {
            s = compress_spaces(&blank_out(&s, &part));
            row.part_no = part;
        }
    }

    if s.is_empty() {
        return;
    }

    if row.mould_no.is_empty() {
        if is_pure_digits(&s) || s == row.index.to_string() {
            return;
        }
        append_name(row, &s);
    } else if row.mould_factory.is_empty() {
        row.mould_factory = s;
    } else if row.move_to.is_empty() {
        row.move_to = s;
    } else {
        append_name(row, &s);
    }
}

fn append_name(row: &mut RowRecord, s: &str) {
    row.mould_name = if row.mould_name.is_empty() {
        s.to_string()
    } else {
        compress_spaces(&format!("{} {}", row.mould_name, s))
    };
}

/// Advance the scanner by one classified line.
fn transition(
    state: ScanState,
    kind: LineKind,
    line: &str,
    done: &mut Vec<RowRecord>,
) -> ScanState {
    match (state, kind) {
        (state, LineKind::Terminator | LineKind::HeaderLabel) => state,

        (ScanState::Building(mut row), LineKind::IndexOnly { .. }) if only_part_no(&row) => {
            fill_missing_fields(&mut row, line);
            ScanState::Building(row)
        }

        (state, LineKind::IndexOnly { index }) => {
            close(state, done);
            ScanState::Building(RowRecord::with_index(index))
        }

        (state, LineKind::NewRow { index, rest }) => {
            close(state, done);
            let row = single_line_row(index, &rest, None, has_wide_gaps(&rest));
            ScanState::Building(row)
        }

        (ScanState::Building(mut row), LineKind::PartNo { part_no })
            if !starts_new_row(&row, &part_no) =>
        {
            fill_missing_fields(&mut row, line);
            ScanState::Building(row)
        }

        (state, LineKind::PartNo { part_no }) => {
            close(state, done);
            let cleaned = strip_checkbox_prefix(line);
            let text = blank_out(&cleaned, &part_no);
            let index = done.len() as u32 + 1;
            let row = single_line_row(index, &text, Some(&part_no), has_wide_gaps(&cleaned));
            ScanState::Building(row)
        }

        (ScanState::Building(mut row), LineKind::Continuation) => {
            fill_missing_fields(&mut row, line);
            ScanState::Building(row)
        }

        (ScanState::Idle, LineKind::Continuation) => ScanState::Idle,
    }
}

fn starts_new_row(row: &RowRecord, part_no: &str) -> bool {
    !row.part_no.is_empty() && (row.part_no != part_no || !row.seal_sample_no.is_empty())
}

fn close(state: ScanState, done: &mut Vec<RowRecord>) {
    if let ScanState::Building(row) = state {
        done.push(row);
    }
}

/// Merge rows whose part number was split into a prefix row and a suffix
/// row, e.g. `B22197.21.` followed by `2.1`.
pub fn merge_split_part_rows(rows: Vec<RowRecord>) -> Vec<RowRecord> {
    let mut out: Vec<RowRecord> = Vec::with_capacity(rows.len());
    let mut iter = rows.into_iter().peekable();

    while let Some(cur) = iter.next() {
        let mergeable = iter.peek().is_some_and(|next| {
            let cur_mould = normalize_mould_no(&cur.mould_no);
            let next_mould = normalize_mould_no(&next.mould_no);
            is_part_prefix_token(&cur.part_no)
                && is_part_suffix_token(&next.part_no)
                && (cur_mould.is_empty() || next_mould.is_empty() || cur_mould == next_mould)
        });

        if !mergeable {
            out.push(cur);
            continue;
        }

        if let Some(next) = iter.peek_mut() {
            next.part_no = join_split_part_no(&cur.part_no, &next.part_no);
            if next.seal_sample_no.is_empty() {
                next.seal_sample_no = cur.seal_sample_no.clone();
            }
            if next.mould_no.is_empty() {
                next.mould_no = cur.mould_no.clone();
            }
            if next.mould_factory.is_empty() {
                next.mould_factory = cur.mould_factory.clone();
            }
            if next.move_to.is_empty() {
                next.move_to = cur.move_to.clone();
            }
            if next.mould_name.is_empty() && !SEAL_PREFIX_LINE.is_match(&cur.mould_name) {
                next.mould_name = cur.mould_name.clone();
            }
        }
    }

    out
}

/// Recover rows from data lines laid out row by row.
pub fn row_oriented(data_lines: &[String]) -> Vec<RowRecord> {
    let lines = join_seal_split_lines(data_lines);
    let mut done: Vec<RowRecord> = Vec::new();
    let mut state = ScanState::Idle;

    for line in &lines {
        let kind = classify(line);
        trace!("{:?} <- {:?}", kind, line);
        if kind == LineKind::Terminator {
            break;
        }
        state = transition(state, kind, line, &mut done);
    }
    close(state, &mut done);

    merge_split_part_rows(done)
        .into_iter()
        .filter(|row| !row.is_blank())
        .collect()
}
