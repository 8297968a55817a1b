//! Rate snapshot table

use crate::Category;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Name of the timestamp column in the source sheet
pub const TIMESTAMP_COLUMN: &str = "Timestamp";

/// One timestamped record of rates across all categories
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRow {
    pub timestamp: NaiveDateTime,
    /// Indexed by [`Category::index`]. `None` when the cell was empty.
    pub rates: [Option<f64>; Category::COUNT],
}

impl SnapshotRow {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            rates: [None; Category::COUNT],
        }
    }

    /// Set a rate (builder style)
    pub fn with_rate(mut self, category: Category, value: f64) -> Self {
        self.rates[category.index()] = Some(value);
        self
    }

    pub fn rate(&self, category: Category) -> Option<f64> {
        self.rates[category.index()]
    }
}

/// Snapshot rows ordered by timestamp, oldest first.
///
/// The last row is the current observation and the one before it the
/// previous observation. A table with a single row uses that row for both.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RateTable {
    rows: Vec<SnapshotRow>,
}

impl RateTable {
    /// Build a table, sorting rows by timestamp.
    ///
    /// The sort is stable: rows sharing a timestamp keep their input order.
    pub fn new(mut rows: Vec<SnapshotRow>) -> Self {
        rows.sort_by_key(|r| r.timestamp);
        Self { rows }
    }

    /// The "no data available" sentinel
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[SnapshotRow] {
        &self.rows
    }

    /// Most recent row
    pub fn latest(&self) -> Option<&SnapshotRow> {
        self.rows.last()
    }

    /// Row before the most recent one, or the most recent one if it is alone
    pub fn previous(&self) -> Option<&SnapshotRow> {
        match self.rows.len() {
            0 => None,
            1 => self.rows.first(),
            n => self.rows.get(n - 2),
        }
    }

    /// Last `n` rows, oldest first
    pub fn recent(&self, n: usize) -> &[SnapshotRow] {
        let start = self.rows.len().saturating_sub(n);
        &self.rows[start..]
    }

    /// Rows from newest to oldest
    pub fn newest_first(&self) -> impl Iterator<Item = &SnapshotRow> {
        self.rows.iter().rev()
    }

    /// `(timestamp, value)` points for one category, skipping empty cells
    pub fn series(&self, category: Category) -> Vec<(NaiveDateTime, f64)> {
        self.rows
            .iter()
            .filter_map(|r| r.rate(category).map(|v| (r.timestamp, v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_rows_sorted_on_build() {
        let table = RateTable::new(vec![
            SnapshotRow::new(ts(3, 9)).with_rate(Category::Marla05, 3.0),
            SnapshotRow::new(ts(1, 9)).with_rate(Category::Marla05, 1.0),
            SnapshotRow::new(ts(2, 9)).with_rate(Category::Marla05, 2.0),
        ]);

        let stamps: Vec<_> = table.rows().iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, vec![ts(1, 9), ts(2, 9), ts(3, 9)]);
        assert_eq!(table.latest().unwrap().rate(Category::Marla05), Some(3.0));
        assert_eq!(table.previous().unwrap().rate(Category::Marla05), Some(2.0));
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let table = RateTable::new(vec![
            SnapshotRow::new(ts(1, 9)).with_rate(Category::Kanal01, 10.0),
            SnapshotRow::new(ts(1, 9)).with_rate(Category::Kanal01, 11.0),
        ]);
        assert_eq!(table.latest().unwrap().rate(Category::Kanal01), Some(11.0));
    }

    #[test]
    fn test_single_row_previous_aliases_latest() {
        let table = RateTable::new(vec![SnapshotRow::new(ts(1, 9))]);
        assert_eq!(table.previous(), table.latest());
    }

    #[test]
    fn test_empty_table() {
        let table = RateTable::empty();
        assert!(table.is_empty());
        assert!(table.latest().is_none());
        assert!(table.previous().is_none());
        assert!(table.recent(10).is_empty());
    }

    #[test]
    fn test_recent_and_newest_first() {
        let rows: Vec<_> = (1..=12).map(|d| SnapshotRow::new(ts(d, 8))).collect();
        let table = RateTable::new(rows);

        let recent = table.recent(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].timestamp, ts(3, 8));
        assert_eq!(recent[9].timestamp, ts(12, 8));
        assert_eq!(table.recent(50).len(), 12);

        let first = table.newest_first().next().unwrap();
        assert_eq!(first.timestamp, ts(12, 8));
    }

    #[test]
    fn test_series_skips_empty_cells() {
        let table = RateTable::new(vec![
            SnapshotRow::new(ts(1, 9)).with_rate(Category::Marla10, 90.0),
            SnapshotRow::new(ts(2, 9)),
            SnapshotRow::new(ts(3, 9)).with_rate(Category::Marla10, 92.0),
        ]);
        assert_eq!(
            table.series(Category::Marla10),
            vec![(ts(1, 9), 90.0), (ts(3, 9), 92.0)]
        );
    }
}
