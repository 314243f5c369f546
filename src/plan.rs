//! Placement plan – the frozen output of pagination. It records which entry
//! sits on which page, column and row, and the color it is drawn in.

use serde::{Deserialize, Serialize};

use crate::channels::ChannelEntry;
use crate::error::Result;
use crate::palette::Color;

/// A complete page assignment, consumed once by the layout stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementPlan {
    pub columns_per_page: usize,
    pub rows_per_column: usize,
    /// Ordered list of pages; never empty.
    pub pages: Vec<PageLayout>,
}

/// One printed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    /// Always exactly `columns_per_page` columns, blank ones included.
    pub columns: Vec<ColumnLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub column_index: usize,
    pub header_lines: Vec<String>,
    /// Always exactly `rows_per_column` cells, row indices `0..rows`.
    pub cells: Vec<CellPlacement>,
    pub legend: LegendBlock,
}

/// One row slot in a column. `filled` is `None` for a blank line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellPlacement {
    pub row_index: usize,
    pub filled: Option<FilledCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilledCell {
    /// Position of the entry in the input sequence.
    pub sequence: usize,
    pub entry: ChannelEntry,
    pub color: Color,
}

/// The constant category key printed under every column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegendBlock {
    pub lines: Vec<Vec<LegendEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

impl CellPlacement {
    pub fn blank(row_index: usize) -> Self {
        Self {
            row_index,
            filled: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.filled.is_none()
    }

    pub fn entry(&self) -> Option<&ChannelEntry> {
        self.filled.as_ref().map(|f| &f.entry)
    }
}

impl PlacementPlan {
    /// Number of cells holding an entry, across all pages.
    pub fn filled_count(&self) -> usize {
        self.filled_cells().count()
    }

    /// Total number of cell slots, blank or filled.
    pub fn slot_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| &p.columns)
            .map(|c| c.cells.len())
            .sum()
    }

    /// Filled cells in read order: page, then column, then row.
    pub fn filled_cells(&self) -> impl Iterator<Item = &FilledCell> + '_ {
        self.pages
            .iter()
            .flat_map(|p| &p.columns)
            .flat_map(|c| &c.cells)
            .filter_map(|cell| cell.filled.as_ref())
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> PlacementPlan {
        let entry = ChannelEntry::new("2", "KCBS", "Local");
        PlacementPlan {
            columns_per_page: 1,
            rows_per_column: 2,
            pages: vec![PageLayout {
                page_index: 0,
                columns: vec![ColumnLayout {
                    column_index: 0,
                    header_lines: vec!["Home".to_string()],
                    cells: vec![
                        CellPlacement {
                            row_index: 0,
                            filled: Some(FilledCell {
                                sequence: 0,
                                entry,
                                color: Color::rgb(0x33, 0x66, 0xCC),
                            }),
                        },
                        CellPlacement::blank(1),
                    ],
                    legend: LegendBlock {
                        lines: vec![vec![LegendEntry {
                            label: "Local".to_string(),
                            color: Color::rgb(0x33, 0x66, 0xCC),
                        }]],
                    },
                }],
            }],
        }
    }

    #[test]
    fn counts_filled_and_total_slots() {
        let plan = sample_plan();
        assert_eq!(plan.filled_count(), 1);
        assert_eq!(plan.slot_count(), 2);
        assert!(plan.pages[0].columns[0].cells[1].is_blank());
        let first = plan.pages[0].columns[0].cells[0].entry();
        assert_eq!(first.map(|e| e.code.as_str()), Some("KCBS"));
    }

    #[test]
    fn json_preserves_plan() {
        let plan = sample_plan();
        let json = plan.to_json().unwrap();
        assert!(json.contains("\"#3366CC\""));
        assert_eq!(PlacementPlan::from_json(&json).unwrap(), plan);
    }
}
