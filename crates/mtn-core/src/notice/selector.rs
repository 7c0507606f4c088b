//! Strategy selection and final row cleanup.

use tracing::debug;

use crate::models::notice::{Field, RowRecord};

use super::rules::fields::{canonical_seal_no, clean_mould_name, normalize_row};
use super::rules::header::TableHeader;
use super::rules::patterns::{
    SUSPICIOUS_DAY_SEQUENCE, SUSPICIOUS_MOULD_HYPHEN, SUSPICIOUS_MOULD_NO,
};
use super::rules::seal::collect_seal_numbers;
use super::rules::text::normalize_text;
use super::strategies::{anchor_groups, global_scan, header_lists, row_oriented, Strategy};

/// Rows produced by one strategy, format-normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub strategy: Strategy,
    pub rows: Vec<RowRecord>,
}

impl Candidate {
    pub fn new(strategy: Strategy, rows: Vec<RowRecord>) -> Self {
        Self {
            strategy,
            rows: rows.iter().map(normalize_row).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of non-empty fields over all rows.
    pub fn score(&self) -> usize {
        completeness_score(&self.rows)
    }

    pub fn suspicious_count(&self) -> usize {
        self.rows.iter().filter(|r| is_suspicious_row(r)).count()
    }
}

pub fn completeness_score(rows: &[RowRecord]) -> usize {
    rows.iter().map(RowRecord::filled_count).sum()
}

/// A row whose mould name is missing or shows other columns' content.
pub fn is_suspicious_row(row: &RowRecord) -> bool {
    let name = normalize_text(&row.mould_name);
    if name.is_empty() {
        return true;
    }
    let leaked = |field: Field| {
        let value = row.get(field);
        !value.is_empty() && name.contains(value)
    };
    leaked(Field::MouldFactory)
        || leaked(Field::MoveTo)
        || SUSPICIOUS_MOULD_HYPHEN.is_match(&name)
        || SUSPICIOUS_MOULD_NO.is_match(&name)
        || SUSPICIOUS_DAY_SEQUENCE.is_match(&name)
}

/// Every strategy's output for one document.
#[derive(Debug, Clone)]
pub struct Candidates {
    pub row_oriented: Candidate,
    pub header_lists: Candidate,
    pub anchor_groups: Candidate,
    pub global_scan: Candidate,
}

impl Candidates {
    /// Run all strategies over the located table.
    pub fn generate(raw_text: &str, lines: &[String], header: &TableHeader) -> Self {
        let data_lines = header.data_lines(lines);
        let table_lines = header.table_lines(lines);

        Self {
            row_oriented: Candidate::new(Strategy::RowOriented, row_oriented(&data_lines)),
            header_lists: Candidate::new(Strategy::ColumnHeaderLists, header_lists(table_lines)),
            anchor_groups: Candidate::new(Strategy::ColumnAnchors, anchor_groups(&data_lines)),
            global_scan: Candidate::new(Strategy::GlobalScan, global_scan(raw_text)),
        }
    }

    /// Pick the winning candidate.
    ///
    /// A clean row-oriented result is kept. When it has suspicious rows, the
    /// best column candidate replaces it only if it scores higher, or scores
    /// the same with fewer suspicious rows. Without row-oriented rows the
    /// trusted header lists are used, then the global scan.
    pub fn select(self) -> Option<Candidate> {
        let Candidates {
            row_oriented,
            header_lists,
            anchor_groups,
            global_scan,
        } = self;

        debug!(
            "Candidates: row-oriented {}/{}, header lists {}/{}, anchors {}/{}, global {}/{}",
            row_oriented.rows.len(),
            row_oriented.score(),
            header_lists.rows.len(),
            header_lists.score(),
            anchor_groups.rows.len(),
            anchor_groups.score(),
            global_scan.rows.len(),
            global_scan.score()
        );

        if row_oriented.is_empty() {
            return [header_lists, global_scan].into_iter().find(|c| !c.is_empty());
        }

        let suspicious = row_oriented.suspicious_count();
        if suspicious == 0 {
            return Some(row_oriented);
        }

        let best_column = [header_lists, anchor_groups]
            .into_iter()
            .filter(|c| !c.is_empty())
            .reduce(|best, c| if ranks_above(&c, &best) { c } else { best });

        match best_column {
            Some(column)
                if column.score() > row_oriented.score()
                    || (column.score() == row_oriented.score()
                        && column.suspicious_count() < suspicious) =>
            {
                Some(column)
            }
            _ => Some(row_oriented),
        }
    }
}

/// Higher score wins; equal scores go to fewer suspicious rows.
fn ranks_above(a: &Candidate, b: &Candidate) -> bool {
    a.score() > b.score() || (a.score() == b.score() && a.suspicious_count() < b.suspicious_count())
}

/// Backfill seals, clean mould names and assign indices `1..N`.
pub fn finalize(candidate: Candidate, raw_text: &str) -> Vec<RowRecord> {
    let seals = collect_seal_numbers(raw_text);

    candidate
        .rows
        .into_iter()
        .enumerate()
        .map(|(i, mut row)| {
            if row.seal_sample_no.is_empty() {
                if let Some(seal) = seals.get(i) {
                    row.seal_sample_no = canonical_seal_no(seal);
                }
            }
            let cleaned = clean_mould_name(&row);
            if !cleaned.is_empty() {
                row.mould_name = cleaned;
            }
            row.index = i as u32 + 1;
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(part: &str, name: &str, mould: &str, factory: &str, to: &str, seal: &str) -> RowRecord {
        RowRecord {
            index: 0,
            part_no: part.to_string(),
            mould_name: name.to_string(),
            mould_no: mould.to_string(),
            mould_factory: factory.to_string(),
            move_to: to.to_string(),
            seal_sample_no: seal.to_string(),
        }
    }

    fn candidates(
        row: Vec<RowRecord>,
        lists: Vec<RowRecord>,
        anchors: Vec<RowRecord>,
        global: Vec<RowRecord>,
    ) -> Candidates {
        Candidates {
            row_oriented: Candidate::new(Strategy::RowOriented, row),
            header_lists: Candidate::new(Strategy::ColumnHeaderLists, lists),
            anchor_groups: Candidate::new(Strategy::ColumnAnchors, anchors),
            global_scan: Candidate::new(Strategy::GlobalScan, global),
        }
    }

    #[test]
    fn test_suspicious_rows() {
        assert!(is_suspicious_row(&row("C1", "", "", "", "", "")));
        assert!(is_suspicious_row(&row("C1", "把手 红旗", "", "红旗", "", "")));
        assert!(is_suspicious_row(&row("C1", "把手 合肥", "", "", "合肥", "")));
        assert!(is_suspicious_row(&row("C1", "把手 ML－FY", "", "", "", "")));
        assert!(is_suspicious_row(&row("C11111.1.1", "把手 ML0002", "ML0001", "", "", "")));
        assert!(is_suspicious_row(&row("C1", "把手ml 12", "", "", "", "")));
        assert!(is_suspicious_row(&row("C1", "把手 10-1000123", "", "", "", "")));
        assert!(!is_suspicious_row(&row("C1", "把手", "ML1", "红旗", "合肥", "")));
    }

    #[test]
    fn test_score_counts_fields() {
        let c = Candidate::new(
            Strategy::RowOriented,
            vec![row("C1", "把手", "ML1", "", "", ""), row("", "", "", "红旗", "", "")],
        );
        assert_eq!(c.score(), 4);
    }

    #[test]
    fn test_candidate_normalizes_formats() {
        let c = Candidate::new(
            Strategy::GlobalScan,
            vec![row("C1", " 把手  座 ", "ML 12", "", "", "ML－A-20240510-1")],
        );
        assert_eq!(c.rows[0].mould_name, "把手 座");
        assert_eq!(c.rows[0].mould_no, "ML12");
        assert_eq!(c.rows[0].seal_sample_no, "ML-A-20240510-1");
    }

    #[test]
    fn test_clean_row_oriented_wins() {
        let chosen = candidates(
            vec![row("C1", "把手", "ML1", "", "", "")],
            vec![row("C1", "把手", "ML1", "红旗", "合肥", "")],
            vec![],
            vec![],
        )
        .select()
        .unwrap();
        assert_eq!(chosen.strategy, Strategy::RowOriented);
    }

    #[test]
    fn test_clean_column_candidate_beats_suspicious_rows() {
        // same completeness; the column candidate has no contamination
        let chosen = candidates(
            vec![row("C1", "把手 红旗", "ML1", "红旗", "", "")],
            vec![row("C1", "把手", "ML1", "红旗", "", "")],
            vec![],
            vec![],
        )
        .select()
        .unwrap();
        assert_eq!(chosen.strategy, Strategy::ColumnHeaderLists);
    }

    #[test]
    fn test_less_complete_column_candidate_loses() {
        let chosen = candidates(
            vec![row("C1", "", "ML1", "红旗", "合肥", "")],
            vec![],
            vec![row("", "", "ML1", "", "", "")],
            vec![],
        )
        .select()
        .unwrap();
        assert_eq!(chosen.strategy, Strategy::RowOriented);
    }

    #[test]
    fn test_best_column_candidate_is_compared() {
        let chosen = candidates(
            vec![row("C1", "", "ML1", "", "", "")],
            vec![row("C1", "把手", "ML1", "", "", "")],
            vec![row("C1", "把手", "ML1", "红旗", "", "")],
            vec![],
        )
        .select()
        .unwrap();
        assert_eq!(chosen.strategy, Strategy::ColumnAnchors);
    }

    #[test]
    fn test_empty_row_oriented_falls_back() {
        let scanned = || vec![row("C2", "", "ML2", "", "", "")];

        let lists = candidates(vec![], vec![row("C1", "", "ML1", "", "", "")], vec![], scanned());
        assert_eq!(lists.select().unwrap().strategy, Strategy::ColumnHeaderLists);

        let global = candidates(vec![], vec![], vec![row("C3", "", "ML3", "", "", "")], scanned());
        assert_eq!(global.select().unwrap().strategy, Strategy::GlobalScan);

        assert_eq!(candidates(vec![], vec![], vec![], vec![]).select(), None);
    }

    #[test]
    fn test_finalize_backfills_and_reindexes() {
        let candidate = Candidate::new(
            Strategy::RowOriented,
            vec![
                row("C1", "3 把手 红旗", "ML1", "红旗", "", ""),
                row("C2", "推杆", "ML2", "", "", "ML-B-20240511-9"),
            ],
        );
        let rows = finalize(candidate, "ML-A-20240510-1 ML-B-20240511-9");

        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].mould_name, "把手");
        assert_eq!(rows[0].seal_sample_no, "ML-A-20240510-1");
        assert_eq!(rows[1].index, 2);
        assert_eq!(rows[1].seal_sample_no, "ML-B-20240511-9");
    }
}
