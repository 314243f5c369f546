//! Channel list loading – parses the delimited channel file into records
//! and attaches categories to produce [`ChannelEntry`] values.
//!
//! Expected columns: `number, code[, description[, category]]`. A leading
//! header row (first cell `number`) and `#` comment lines are ignored.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::category::Classifier;
use crate::error::{Result, SheetError};

/// One channel line on the printed sheet. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEntry {
    /// Display label, usually numeric. Duplicates are allowed.
    pub number: String,
    /// Short label such as a call sign.
    pub code: String,
    pub description: Option<String>,
    /// Classification used for color coding.
    pub category: String,
    /// Line in the channel file this entry came from, when it was loaded
    /// from one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_line: Option<u64>,
}

impl ChannelEntry {
    pub fn new(
        number: impl Into<String>,
        code: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            code: code.into(),
            description: None,
            category: category.into(),
            source_line: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Numeric value of `number`, if it is an unsigned integer.
    pub fn numeric(&self) -> Option<u32> {
        self.number.parse().ok()
    }
}

/// A validated row from the channel file, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecord {
    pub number: String,
    pub code: String,
    pub description: Option<String>,
    /// Explicit category column, when present and non-empty.
    pub category: Option<String>,
    /// 1-based source line.
    pub line: u64,
}

impl ChannelRecord {
    pub fn numeric(&self) -> Option<u32> {
        self.number.parse().ok()
    }
}

/// Read and parse a channel file from disk.
pub fn load_channel_file(path: &Path) -> Result<Vec<ChannelRecord>> {
    let text = fs::read_to_string(path).map_err(|e| SheetError::io(path, e))?;
    parse_channel_csv(&text)
}

/// Parse channel CSV text into validated records, in file order.
pub fn parse_channel_csv(text: &str) -> Result<Vec<ChannelRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let line = row
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 1);

        if row.iter().all(str::is_empty) {
            continue;
        }
        let number = row.get(0).unwrap_or_default();
        if records.is_empty() && number.eq_ignore_ascii_case("number") {
            continue;
        }

        let code = row.get(1).unwrap_or_default();
        if number.is_empty() {
            return Err(SheetError::MalformedEntry {
                line,
                reason: "missing channel number".to_string(),
            });
        }
        if code.is_empty() {
            return Err(SheetError::MalformedEntry {
                line,
                reason: format!("channel {number} has no code"),
            });
        }

        records.push(ChannelRecord {
            number: number.to_string(),
            code: code.to_string(),
            description: non_empty(row.get(2)),
            category: non_empty(row.get(3)),
            line,
        });
    }
    log::debug!("parsed {} channel records", records.len());
    Ok(records)
}

fn non_empty(cell: Option<&str>) -> Option<String> {
    cell.filter(|s| !s.is_empty()).map(str::to_string)
}

/// Stable sort by numeric channel number; non-numeric labels keep their
/// relative order after all numeric ones.
pub fn sort_by_number(records: &mut [ChannelRecord]) {
    records.sort_by(|a, b| match (a.numeric(), b.numeric()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Attach a category to every record. An explicit category column wins over
/// the classifier.
pub fn classify_records(records: Vec<ChannelRecord>, classifier: &Classifier) -> Vec<ChannelEntry> {
    records
        .into_iter()
        .map(|r| {
            let category = match r.category {
                Some(c) => c,
                None => classifier.classify(r.numeric(), &r.code).to_string(),
            };
            ChannelEntry {
                number: r.number,
                code: r.code,
                description: r.description,
                category,
                source_line: Some(r.line),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_header_comments_and_blank_lines() {
        let csv = "number,code,description\n# locals\n2,KCBS,CBS\n\n4,KNBC\n";
        let records = parse_channel_csv(csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].number, "2");
        assert_eq!(records[0].description.as_deref(), Some("CBS"));
        assert_eq!(records[1].code, "KNBC");
        assert_eq!(records[1].description, None);
    }

    #[test]
    fn trims_cells_and_reads_category_column() {
        let records = parse_channel_csv(" 200 , CNN , Cable News , News \n").unwrap();
        assert_eq!(records[0].number, "200");
        assert_eq!(records[0].code, "CNN");
        assert_eq!(records[0].category.as_deref(), Some("News"));
    }

    #[test]
    fn missing_code_is_malformed() {
        let err = parse_channel_csv("2,KCBS\n5\n").unwrap_err();
        match err {
            SheetError::MalformedEntry { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_number_is_malformed() {
        let err = parse_channel_csv(",KCBS\n").unwrap_err();
        assert!(matches!(err, SheetError::MalformedEntry { line: 1, .. }));
    }

    #[test]
    fn numeric_sort_is_stable_and_puts_labels_last() {
        let mut records = parse_channel_csv("10,B\nHD,X\n2,A\n10,C\n").unwrap();
        sort_by_number(&mut records);
        let codes: Vec<&str> = records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, ["A", "B", "C", "X"]);
    }

    #[test]
    fn explicit_category_beats_classifier() {
        let records = parse_channel_csv("5,KTVU,,Movies\n6,KTVX\n").unwrap();
        let entries = classify_records(records, &Classifier::default());
        assert_eq!(entries[0].category, "Movies");
        assert_eq!(entries[1].category, "Local");
    }
}
