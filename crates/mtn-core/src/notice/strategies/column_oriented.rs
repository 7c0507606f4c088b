//! Column-oriented reconstruction.
//!
//! Some extractors emit the table column by column: every part number,
//! then every mould name, and so on. Two modes rebuild rows from that
//! order. Header lists follow the column labels; anchor groups hang values
//! on each mould number when labels are unreliable.

use tracing::{debug, trace};

use crate::models::notice::{Field, RowRecord};
use crate::notice::rules::fields::{
    extract_part_no, is_date_digits, is_likely_part_no, is_part_prefix_token,
    is_part_suffix_token, join_split_part_no, normalize_mould_no, normalize_seal_no,
};
use crate::notice::rules::header::{column_label, compact_line, is_header_label_line};
use crate::notice::rules::patterns::{
    ENDS_WITH_DATE_DIGITS, LEADING_HASHES, MOULD_NO_SPLIT, SEAL_SEQUENCE_LINE,
};
use crate::notice::rules::seal::{find_seal, join_seal_split_lines};
use crate::notice::rules::text::{
    compress_spaces, has_cjk, is_cjk_word, is_junk_line, is_pure_digits, is_terminator,
    strip_checkbox_prefix,
};

/// Longest pure-CJK line treated as a factory or destination value.
const MAX_PLACE_CHARS: usize = 4;

/// Longest line treated as a standalone mould name.
const MAX_NAME_CHARS: usize = 16;

/// Values collected under each column label.
#[derive(Debug, Default)]
struct ColumnLists {
    part_no: Vec<String>,
    mould_name: Vec<String>,
    mould_no: Vec<String>,
    mould_factory: Vec<String>,
    move_to: Vec<String>,
    seal_sample_no: Vec<String>,
    /// The last part number is a prefix still waiting for its suffix.
    open_part_prefix: bool,
}

impl ColumnLists {
    fn list_mut(&mut self, field: Field) -> &mut Vec<String> {
        match field {
            Field::PartNo => &mut self.part_no,
            Field::MouldName => &mut self.mould_name,
            Field::MouldNo => &mut self.mould_no,
            Field::MouldFactory => &mut self.mould_factory,
            Field::MoveTo => &mut self.move_to,
            Field::SealSampleNo => &mut self.seal_sample_no,
        }
    }

    fn push_part(&mut self, value: String) {
        if is_part_prefix_token(&value) {
            self.part_no.push(value);
            self.open_part_prefix = true;
            return;
        }
        if self.open_part_prefix && is_part_suffix_token(&value) {
            if let Some(last) = self.part_no.last_mut() {
                *last = join_split_part_no(last, &value);
                self.open_part_prefix = false;
                return;
            }
        }
        self.part_no.push(value);
        self.open_part_prefix = false;
    }

    fn push_seal(&mut self, value: String) {
        if let Some(last) = self.seal_sample_no.last_mut() {
            let continues = last.to_ascii_uppercase().starts_with("ML")
                && ENDS_WITH_DATE_DIGITS.is_match(last)
                && SEAL_SEQUENCE_LINE.is_match(&value);
            if continues {
                *last = compress_spaces(&format!("{}{}", last, value));
                return;
            }
        }
        self.seal_sample_no.push(value);
    }

    fn row_count(&self) -> usize {
        [
            self.part_no.len(),
            self.mould_name.len(),
            self.mould_no.len(),
            self.mould_factory.len(),
            self.move_to.len(),
            self.seal_sample_no.len(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    fn into_rows(self) -> Vec<RowRecord> {
        let cell = |list: &[String], i: usize| {
            list.get(i).map(|v| compress_spaces(v)).unwrap_or_default()
        };
        let mut rows: Vec<RowRecord> = Vec::new();

        for i in 0..self.row_count() {
            let row = RowRecord {
                index: rows.len() as u32 + 1,
                part_no: cell(&self.part_no, i),
                mould_name: cell(&self.mould_name, i),
                mould_no: normalize_mould_no(&cell(&self.mould_no, i)),
                mould_factory: cell(&self.mould_factory, i),
                move_to: cell(&self.move_to, i),
                seal_sample_no: normalize_seal_no(&cell(&self.seal_sample_no, i)),
            };

            // Stray dates and ids produce rows without any identifying column.
            if row.part_no.is_empty() && row.mould_no.is_empty() && row.mould_name.is_empty() {
                continue;
            }
            if is_date_digits(&row.part_no) && row.mould_no.is_empty() {
                continue;
            }
            rows.push(row);
        }

        rows
    }
}

/// At least half of the rows, rounded up, carry both part and mould numbers.
pub fn is_trusted(rows: &[RowRecord]) -> bool {
    if rows.is_empty() {
        return false;
    }
    let complete = rows
        .iter()
        .filter(|r| !r.part_no.is_empty() && !r.mould_no.is_empty())
        .count();
    complete >= rows.len().div_ceil(2)
}

/// Rebuild rows from per-label value lists.
///
/// `table_lines` starts at the header line. Untrusted results are
/// discarded.
pub fn header_lists(table_lines: &[String]) -> Vec<RowRecord> {
    let mut lists = ColumnLists::default();
    let mut current: Option<Field> = None;

    for raw in table_lines {
        if raw.is_empty() {
            continue;
        }
        if is_terminator(raw) {
            break;
        }

        let cleaned = LEADING_HASHES
            .replace(&compress_spaces(&strip_checkbox_prefix(raw)), "")
            .into_owned();
        let compact = compact_line(&cleaned);
        if compact.is_empty() {
            continue;
        }

        if let Some(field) = column_label(&compact) {
            trace!("Column switch to {:?}", field);
            current = Some(field);
            continue;
        }

        let Some(field) = current else {
            continue;
        };

        // Index column values and font garbage.
        if is_pure_digits(&cleaned) || is_junk_line(&cleaned) {
            continue;
        }

        match field {
            Field::PartNo => lists.push_part(cleaned),
            Field::SealSampleNo => lists.push_seal(cleaned),
            other => lists.list_mut(other).push(cleaned),
        }
    }

    let rows = lists.into_rows();
    if !is_trusted(&rows) {
        if !rows.is_empty() {
            debug!("Discarding {} untrusted header-list rows", rows.len());
        }
        return Vec::new();
    }
    rows
}

/// Rebuild rows anchored on mould numbers.
///
/// Seals, part numbers, places and names are pooled in document order and
/// handed to the anchored rows by position.
pub fn anchor_groups(data_lines: &[String]) -> Vec<RowRecord> {
    let lines = join_seal_split_lines(data_lines);

    let mut names: Vec<String> = Vec::new();
    let mut places: Vec<String> = Vec::new();
    let mut seals: Vec<String> = Vec::new();
    let mut parts: Vec<String> = Vec::new();
    let mut rows: Vec<RowRecord> = Vec::new();

    let mut pending_prefix: Option<String> = None;
    let mut pending_name: Option<String> = None;

    for raw in &lines {
        if raw.is_empty() {
            continue;
        }
        if is_terminator(raw) {
            break;
        }
        if is_header_label_line(raw) || is_junk_line(raw) {
            continue;
        }

        let line = compress_spaces(&strip_checkbox_prefix(raw));
        if line.is_empty() {
            continue;
        }

        if let Some(seal) = find_seal(&line) {
            seals.push(normalize_seal_no(seal));
            continue;
        }

        if is_part_prefix_token(&line) {
            pending_prefix = Some(line);
            continue;
        }
        if is_part_suffix_token(&line) {
            if let Some(prefix) = pending_prefix.take() {
                parts.push(join_split_part_no(&prefix, &line));
                continue;
            }
        }

        if let Some(part) = extract_part_no(&line).filter(|p| is_likely_part_no(p)) {
            parts.push(part);
            continue;
        }

        if let Some(caps) = MOULD_NO_SPLIT.captures(&line) {
            let prefix = compress_spaces(&caps[1]);
            let tail = compress_spaces(&caps[3]);
            let mut row = RowRecord {
                mould_no: normalize_mould_no(&caps[2]),
                ..RowRecord::default()
            };
            if !prefix.is_empty() && !is_header_label_line(&prefix) {
                row.mould_name = prefix;
            }
            if !tail.is_empty() && is_cjk_word(&tail) {
                row.mould_factory = tail;
            }
            if row.mould_name.is_empty() {
                if let Some(name) = pending_name.take() {
                    row.mould_name = name;
                }
            }
            rows.push(row);
            continue;
        }

        // Factory and destination often appear as repeated short CJK words.
        if is_cjk_word(&line) && line.chars().count() <= MAX_PLACE_CHARS {
            let open_rows = rows.len();
            match rows.last_mut() {
                Some(last) if !last.mould_no.is_empty() && last.mould_factory.is_empty() => {
                    last.mould_factory = line;
                }
                Some(last)
                    if !last.mould_no.is_empty()
                        && last.move_to.is_empty()
                        && places.len() < open_rows =>
                {
                    last.move_to = line;
                }
                _ => places.push(line),
            }
            continue;
        }

        if line.chars().count() <= MAX_NAME_CHARS && has_cjk(&line) && !line.contains("通知单") {
            pending_name = Some(line.clone());
            names.push(line);
        }
    }

    if rows.is_empty() {
        return Vec::new();
    }

    let mut name_pool = names.into_iter();
    for row in rows.iter_mut().filter(|r| r.mould_name.is_empty()) {
        if let Some(name) = name_pool.next() {
            row.mould_name = name;
        }
    }

    for (i, row) in rows.iter_mut().enumerate() {
        if row.move_to.is_empty() {
            if let Some(place) = places.get(i).or(places.first()) {
                row.move_to = place.clone();
            }
        }
        if row.seal_sample_no.is_empty() {
            row.seal_sample_no = seals.get(i).cloned().unwrap_or_default();
        }
        if row.part_no.is_empty() {
            row.part_no = parts.get(i).cloned().unwrap_or_default();
        }
    }

    rows.into_iter()
        .filter(|r| !r.part_no.is_empty() || !r.mould_no.is_empty() || !r.mould_name.is_empty())
        .enumerate()
        .map(|(i, mut r)| {
            r.index = i as u32 + 1;
            r
        })
        .collect()
}
