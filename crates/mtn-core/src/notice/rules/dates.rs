//! Date extraction for the 模具移模时间 field.

use chrono::NaiveDate;
use regex::Captures;
use tracing::trace;

use super::patterns::{DATE_CN, DATE_ISO, DATE_LABEL_COMPACT, DATE_LABEL_NEARBY, DATE_LOOSE};
use super::text::remove_whitespace;
use super::FieldExtractor;

/// Label preceding the document date.
pub const MOVE_DATE_LABEL: &str = "模具移模时间";

/// How many lines around the label are searched for a date.
const LABEL_WINDOW: isize = 3;

/// Extracts calendar dates written as ISO, loose separated or CN forms.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = NaiveDate;

    /// First valid date, trying ISO, then loose separators, then 年月日.
    fn extract(&self, text: &str) -> Option<NaiveDate> {
        [&*DATE_ISO, &*DATE_LOOSE, &*DATE_CN]
            .into_iter()
            .find_map(|re| re.captures_iter(text).find_map(|caps| date_from_captures(&caps)))
    }

    fn extract_all(&self, text: &str) -> Vec<NaiveDate> {
        let mut results: Vec<NaiveDate> = Vec::new();
        for re in [&*DATE_ISO, &*DATE_LOOSE, &*DATE_CN] {
            for date in re.captures_iter(text).filter_map(|caps| date_from_captures(&caps)) {
                if !results.contains(&date) {
                    results.push(date);
                }
            }
        }
        results
    }
}

fn date_from_captures(caps: &Captures<'_>) -> Option<NaiveDate> {
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a single date in any supported form.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    DateExtractor::new().extract(text)
}

/// Resolve the document date next to 模具移模时间.
///
/// Tries the label glued to an ISO date, then the label followed by a date
/// within 80 characters, then dates on the lines around the label line.
pub fn find_move_date(raw_text: &str, lines: &[String]) -> Option<NaiveDate> {
    let compact = remove_whitespace(raw_text);
    if let Some(date) = DATE_LABEL_COMPACT
        .captures(&compact)
        .and_then(|caps| parse_date(caps.get(1)?.as_str()))
    {
        trace!("Move date from compact label: {}", date);
        return Some(date);
    }

    if let Some(date) = DATE_LABEL_NEARBY
        .captures(raw_text)
        .and_then(|caps| parse_date(caps.get(1)?.as_str()))
    {
        trace!("Move date near label: {}", date);
        return Some(date);
    }

    let label_idx = lines
        .iter()
        .position(|l| remove_whitespace(l).contains(MOVE_DATE_LABEL))? as isize;

    let extractor = DateExtractor::new();
    let mut candidates: Vec<(usize, bool, NaiveDate)> = Vec::new();
    for offset in -LABEL_WINDOW..=LABEL_WINDOW {
        let idx = label_idx + offset;
        if idx < 0 {
            continue;
        }
        let Some(line) = lines.get(idx as usize) else {
            continue;
        };
        if let Some(date) = extractor.extract(line) {
            // Lines after the label win ties.
            candidates.push((offset.unsigned_abs(), offset < 0, date));
        }
    }

    candidates.sort_by_key(|(distance, before, _)| (*distance, *before));
    let date = candidates.first().map(|(_, _, date)| *date);
    if let Some(date) = date {
        trace!("Move date from nearby line: {}", date);
    }
    date
}
