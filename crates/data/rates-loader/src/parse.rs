//! CSV text to [`RateTable`]

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rates_core::{Category, Error, RateTable, Result, SnapshotRow, TIMESTAMP_COLUMN};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    // Google Forms response sheets
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Column positions resolved from the header row
#[derive(Debug, Clone, PartialEq)]
struct ColumnMap {
    timestamp: usize,
    categories: [usize; Category::COUNT],
}

impl ColumnMap {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |label: &str| {
            headers
                .iter()
                .position(|h| h.trim() == label)
                .ok_or_else(|| Error::MissingColumn(label.to_string()))
        };

        let timestamp = find(TIMESTAMP_COLUMN)?;
        let mut categories = [0; Category::COUNT];
        for category in Category::ALL {
            categories[category.index()] = find(category.label())?;
        }
        Ok(Self {
            timestamp,
            categories,
        })
    }
}

/// Parse a CSV document into a sorted table.
///
/// Every tracked category must have a column. Blank lines are skipped;
/// empty cells become missing values.
pub fn parse_table(text: &str) -> Result<RateTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::Csv(e.to_string()))?
        .clone();
    let columns = ColumnMap::resolve(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| Error::Csv(e.to_string()))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let raw_ts = record.get(columns.timestamp).unwrap_or("");
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| Error::InvalidTimestamp {
            line,
            value: raw_ts.to_string(),
        })?;

        let mut row = SnapshotRow::new(timestamp);
        for category in Category::ALL {
            let cell = record.get(columns.categories[category.index()]).unwrap_or("");
            row.rates[category.index()] = parse_rate(cell).map_err(|_| Error::InvalidRate {
                line,
                category,
                value: cell.to_string(),
            })?;
        }
        rows.push(row);
    }

    Ok(RateTable::new(rows))
}

/// Parse the timestamp formats a published sheet is likely to contain
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Empty cell → `None`. Thousands separators are accepted.
fn parse_rate(cell: &str) -> std::result::Result<Option<f64>, ()> {
    if cell.is_empty() {
        return Ok(None);
    }
    let cleaned: String = cell.chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const HEADER: &str = "Timestamp,05 Marla,08 Marla,10 Marla,01 Kanal,02 Kanal,04 Marla Commercial,08 Marla Commercial";

    fn sheet(rows: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for r in rows {
            text.push('\n');
            text.push_str(r);
        }
        text
    }

    #[test]
    fn test_parse_and_sort() {
        let text = sheet(&[
            "1/16/2024 10:00:00,53,74,95,150,290,120,315",
            "1/14/2024 10:00:00,50,75,94,148,288,118,310",
            "1/15/2024 10:00:00,52,74,95,149,290,119,310",
        ]);
        let table = parse_table(&text).unwrap();

        assert_eq!(table.len(), 3);
        let latest = table.latest().unwrap();
        assert_eq!(latest.timestamp.day(), 16);
        assert_eq!(latest.rate(Category::Marla05), Some(53.0));
        assert_eq!(latest.rate(Category::Commercial08), Some(315.0));
        assert_eq!(table.previous().unwrap().timestamp.day(), 15);
    }

    #[test]
    fn test_column_order_and_extra_columns() {
        let text = "Email, 01 Kanal ,Timestamp,08 Marla Commercial,02 Kanal,10 Marla,08 Marla,05 Marla,04 Marla Commercial,Notes\n\
                    a@b.c,150,2024-01-15 09:30,315,290,95,74,52,120,hello";
        let table = parse_table(text).unwrap();
        let row = table.latest().unwrap();

        assert_eq!(row.rate(Category::Kanal01), Some(150.0));
        assert_eq!(row.rate(Category::Marla05), Some(52.0));
        assert_eq!(row.timestamp.hour(), 9);
        assert_eq!(row.timestamp.minute(), 30);
    }

    #[test]
    fn test_missing_category_column_fails() {
        let text = "Timestamp,05 Marla,08 Marla\n2024-01-15,1,2";
        match parse_table(text) {
            Err(Error::MissingColumn(label)) => assert_eq!(label, "10 Marla"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_timestamp_column_fails() {
        let text = "05 Marla,08 Marla,10 Marla,01 Kanal,02 Kanal,04 Marla Commercial,08 Marla Commercial\n1,2,3,4,5,6,7";
        assert!(matches!(parse_table(text), Err(Error::MissingColumn(l)) if l == "Timestamp"));
    }

    #[test]
    fn test_bad_timestamp_fails() {
        let text = sheet(&["yesterday,1,2,3,4,5,6,7"]);
        match parse_table(&text) {
            Err(Error::InvalidTimestamp { line, value }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "yesterday");
            }
            other => panic!("expected InvalidTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_rate_fails() {
        let text = sheet(&["2024-01-15,1,2,three,4,5,6,7"]);
        assert!(matches!(
            parse_table(&text),
            Err(Error::InvalidRate { category: Category::Marla10, .. })
        ));

        let text = sheet(&["2024-01-15,NaN,2,3,4,5,6,7"]);
        assert!(matches!(parse_table(&text), Err(Error::InvalidRate { .. })));
    }

    #[test]
    fn test_empty_cells_and_blank_rows() {
        let text = sheet(&[
            "2024-01-15,52,,95,\"1,250\",290,120,315",
            ",,,,,,,",
            "",
        ]);
        let table = parse_table(&text).unwrap();
        assert_eq!(table.len(), 1);

        let row = table.latest().unwrap();
        assert_eq!(row.rate(Category::Marla08), None);
        assert_eq!(row.rate(Category::Kanal01), Some(1250.0));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = parse_table(HEADER).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_timestamp_formats() {
        let cases = [
            "2024-01-15T10:05:00Z",
            "2024-01-15T10:05:00+05:00",
            "2024-01-15 10:05:00",
            "2024-01-15 10:05:00.250",
            "2024-01-15 10:05",
            "2024-01-15T10:05",
            "1/15/2024 10:05:00",
            "01/15/2024 10:05",
        ];
        for raw in cases {
            let ts = parse_timestamp(raw).unwrap_or_else(|| panic!("failed on {}", raw));
            assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 1, 15), "{}", raw);
            assert_eq!((ts.hour(), ts.minute()), (10, 5), "{}", raw);
        }

        let date_only = parse_timestamp("2024-01-15").unwrap();
        assert_eq!((date_only.hour(), date_only.minute()), (0, 0));
        assert!(parse_timestamp("1/15/2024").is_some());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("15th of January").is_none());
    }
}
