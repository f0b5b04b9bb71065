use serde::Serialize;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Missing-value handling: drop every row with at least one missing cell
// ---------------------------------------------------------------------------

/// What [`drop_missing_rows`] removed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CleaningReport {
    /// Row count before cleaning.
    pub original_rows: usize,
    /// 0-based row numbers (in the uploaded table) that were dropped.
    pub dropped_rows: Vec<usize>,
}

impl CleaningReport {
    pub fn dropped(&self) -> usize {
        self.dropped_rows.len()
    }

    pub fn remaining(&self) -> usize {
        self.original_rows - self.dropped_rows.len()
    }

    /// True when nothing had to be removed.
    pub fn is_noop(&self) -> bool {
        self.dropped_rows.is_empty()
    }

    /// Short human-readable list of dropped rows, elided after `limit` entries.
    pub fn describe_rows(&self, limit: usize) -> String {
        let shown: Vec<String> = self
            .dropped_rows
            .iter()
            .take(limit)
            .map(|r| r.to_string())
            .collect();
        let mut text = shown.join(", ");
        if self.dropped_rows.len() > limit {
            text.push_str(&format!(" … (+{} more)", self.dropped_rows.len() - limit));
        }
        text
    }
}

/// Drop, in place, every row that has a missing value in any column.
///
/// A dataset without missing cells is left untouched.
pub fn drop_missing_rows(dataset: &mut Dataset) -> CleaningReport {
    let original_rows = dataset.len();
    let keep: Vec<bool> = (0..original_rows)
        .map(|row| !dataset.row_has_missing(row))
        .collect();
    let dropped_rows: Vec<usize> = keep
        .iter()
        .enumerate()
        .filter(|(_, k)| !**k)
        .map(|(i, _)| i)
        .collect();

    if !dropped_rows.is_empty() {
        dataset.retain_rows(&keep);
        log::warn!(
            "Dropped {} of {} rows containing missing values",
            dropped_rows.len(),
            original_rows
        );
    }

    CleaningReport {
        original_rows,
        dropped_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    #[test]
    fn test_clean_without_missing_is_noop() {
        let mut ds = read_csv("a,b\n1,2\n3,4\n".as_bytes()).unwrap();
        let before = ds.clone();
        let report = drop_missing_rows(&mut ds);
        assert!(report.is_noop());
        assert_eq!(ds, before);
        assert_eq!(report.remaining(), 2);
    }

    #[test]
    fn test_clean_drops_rows_with_missing() {
        let mut ds = read_csv("a,b,c\n1,,3\n4,5,6\n7,8,\n,,\n9,9,9\n".as_bytes()).unwrap();
        let report = drop_missing_rows(&mut ds);

        assert_eq!(report.original_rows, 5);
        assert_eq!(report.dropped_rows, vec![0, 2, 3]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.missing_cells(), 0);
    }

    #[test]
    fn test_clean_can_empty_the_table() {
        let mut ds = read_csv("a,b\n1,\n,2\n".as_bytes()).unwrap();
        let report = drop_missing_rows(&mut ds);
        assert_eq!(report.remaining(), 0);
        assert!(ds.is_empty());
    }

    #[test]
    fn test_describe_rows_elides() {
        let report = CleaningReport {
            original_rows: 10,
            dropped_rows: vec![1, 2, 3, 4],
        };
        assert_eq!(report.describe_rows(2), "1, 2 … (+2 more)");
        assert_eq!(report.describe_rows(10), "1, 2, 3, 4");
    }
}
