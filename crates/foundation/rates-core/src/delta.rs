//! Latest-vs-previous deltas per category

use crate::{Category, RateTable};
use serde::Serialize;

/// Deltas are rounded to this many decimal places so that float noise
/// (`52.1 - 50.0`) neither shows up on screen nor flips the sign state.
const DELTA_PRECISION: f64 = 1e6;

/// How a delta is highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaState {
    /// Rate went up
    Favorable,
    /// Rate went down
    Unfavorable,
    /// No change, or nothing to compare
    Neutral,
}

impl DeltaState {
    pub fn classify(delta: f64) -> Self {
        if delta > 0.0 {
            DeltaState::Favorable
        } else if delta < 0.0 {
            DeltaState::Unfavorable
        } else {
            DeltaState::Neutral
        }
    }
}

/// Current value, previous value and their difference for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDelta {
    pub category: Category,
    pub current: Option<f64>,
    pub previous: Option<f64>,
    /// `current - previous`; `None` if either side is missing
    pub delta: Option<f64>,
    pub state: DeltaState,
}

impl CategoryDelta {
    pub fn new(category: Category, current: Option<f64>, previous: Option<f64>) -> Self {
        let delta = match (current, previous) {
            (Some(c), Some(p)) => Some(round_delta(c - p)),
            _ => None,
        };
        let state = delta.map(DeltaState::classify).unwrap_or(DeltaState::Neutral);
        Self {
            category,
            current,
            previous,
            delta,
            state,
        }
    }
}

fn round_delta(raw: f64) -> f64 {
    let rounded = (raw * DELTA_PRECISION).round() / DELTA_PRECISION;
    // normalise -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Compute one delta per tracked category, in display order.
///
/// An empty table yields no deltas.
pub fn compute_deltas(table: &RateTable) -> Vec<CategoryDelta> {
    let (Some(current), Some(previous)) = (table.latest(), table.previous()) else {
        return Vec::new();
    };

    Category::ALL
        .iter()
        .map(|&c| CategoryDelta::new(c, current.rate(c), previous.rate(c)))
        .collect()
}

/// Render a rate the way it was entered (`52`, `52.5`)
pub fn format_rate(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}", v),
        None => "n/a".to_string(),
    }
}

/// Render a delta with an explicit sign (`+2`, `-1.5`, `+0`)
pub fn format_delta(delta: Option<f64>) -> String {
    match delta {
        Some(d) => format!("{:+}", d),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SnapshotRow;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn full_row(day: u32, base: f64) -> SnapshotRow {
        Category::ALL
            .iter()
            .enumerate()
            .fold(SnapshotRow::new(ts(day)), |row, (i, &c)| {
                row.with_rate(c, base + i as f64)
            })
    }

    #[test]
    fn test_two_rows_marla_example() {
        let table = RateTable::new(vec![
            SnapshotRow::new(ts(1)).with_rate(Category::Marla05, 50.0),
            SnapshotRow::new(ts(2)).with_rate(Category::Marla05, 52.0),
        ]);
        let deltas = compute_deltas(&table);
        let marla = &deltas[Category::Marla05.index()];

        assert_eq!(marla.delta, Some(2.0));
        assert_eq!(marla.state, DeltaState::Favorable);
        assert_eq!(format_delta(marla.delta), "+2");
        assert_eq!(format_rate(marla.current), "52");
    }

    #[test]
    fn test_delta_is_last_minus_second_last() {
        let table = RateTable::new(vec![
            full_row(1, 10.0),
            full_row(3, 30.0),
            full_row(2, 40.0),
        ]);
        // sorted: day 1 (10), day 2 (40), day 3 (30)
        let deltas = compute_deltas(&table);
        assert_eq!(deltas.len(), Category::COUNT);
        for d in &deltas {
            assert_eq!(d.delta, Some(-10.0));
            assert_eq!(d.state, DeltaState::Unfavorable);
        }
    }

    #[test]
    fn test_single_row_zero_delta() {
        let table = RateTable::new(vec![full_row(1, 100.0)]);
        for d in compute_deltas(&table) {
            assert_eq!(d.delta, Some(0.0));
            assert_eq!(d.state, DeltaState::Neutral);
            assert_eq!(format_delta(d.delta), "+0");
        }
    }

    #[test]
    fn test_empty_table_no_deltas() {
        assert!(compute_deltas(&RateTable::empty()).is_empty());
    }

    #[test]
    fn test_missing_cell_is_neutral() {
        let table = RateTable::new(vec![
            SnapshotRow::new(ts(1)).with_rate(Category::Kanal02, 200.0),
            SnapshotRow::new(ts(2)),
        ]);
        let d = &compute_deltas(&table)[Category::Kanal02.index()];
        assert_eq!(d.current, None);
        assert_eq!(d.delta, None);
        assert_eq!(d.state, DeltaState::Neutral);
        assert_eq!(format_delta(d.delta), "n/a");
        assert_eq!(format_rate(d.current), "n/a");
    }

    #[test]
    fn test_float_noise_rounded() {
        let d = CategoryDelta::new(Category::Marla08, Some(52.1), Some(50.0));
        assert_eq!(format_delta(d.delta), "+2.1");

        let d = CategoryDelta::new(Category::Marla08, Some(0.3), Some(0.1 + 0.2));
        assert_eq!(d.delta, Some(0.0));
        assert_eq!(d.state, DeltaState::Neutral);
    }

    #[test]
    fn test_classify() {
        assert_eq!(DeltaState::classify(0.5), DeltaState::Favorable);
        assert_eq!(DeltaState::classify(-0.5), DeltaState::Unfavorable);
        assert_eq!(DeltaState::classify(0.0), DeltaState::Neutral);
    }
}
