//! Pagination – assigns every channel entry a page, column and row.
//!
//! Placement is column-major: rows fill fastest, then columns, then pages.
//! Slots past the last entry are emitted as blank cells so every page keeps
//! its full grid, and an empty input still yields one blank page.
//!
//! [`paginate`] is a pure function. It either returns a complete plan or an
//! error; it never returns a partial plan.

use crate::channels::ChannelEntry;
use crate::error::{Result, SheetError};
use crate::layout_config::LayoutConfig;
use crate::palette::{CategoryColorMap, Color};
use crate::plan::*;

/// Grid position of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub page: usize,
    pub column: usize,
    pub row: usize,
}

impl Slot {
    /// Read-order rank of the slot within its page.
    pub fn rank(&self, rows_per_column: usize) -> usize {
        self.column * rows_per_column + self.row
    }
}

/// Column-major slot for the entry at input position `index`.
///
/// Both dimensions must be non-zero; [`paginate`] checks this first.
pub fn slot_for(index: usize, columns_per_page: usize, rows_per_column: usize) -> Slot {
    let capacity = columns_per_page * rows_per_column;
    let within = index % capacity;
    Slot {
        page: index / capacity,
        column: within / rows_per_column,
        row: within % rows_per_column,
    }
}

/// Pages needed for `entry_count` entries; at least one.
pub fn page_count(entry_count: usize, capacity: usize) -> usize {
    entry_count.div_ceil(capacity).max(1)
}

/// Build the placement plan for `entries`.
pub fn paginate(
    entries: &[ChannelEntry],
    config: &LayoutConfig,
    colors: &CategoryColorMap,
) -> Result<PlacementPlan> {
    validate(config)?;

    let legend = resolve_legend(&config.legend, colors)?;
    let entry_colors = resolve_entry_colors(entries, colors)?;

    let columns = config.columns_per_page;
    let rows = config.rows_per_column;
    let pages = page_count(entries.len(), config.capacity());

    let mut plan = PlacementPlan {
        columns_per_page: columns,
        rows_per_column: rows,
        pages: (0..pages)
            .map(|page_index| blank_page(page_index, config, &legend))
            .collect(),
    };

    for (sequence, (entry, color)) in entries.iter().zip(entry_colors).enumerate() {
        let slot = slot_for(sequence, columns, rows);
        plan.pages[slot.page].columns[slot.column].cells[slot.row].filled = Some(FilledCell {
            sequence,
            entry: entry.clone(),
            color,
        });
    }

    log::debug!(
        "paginated {} entries onto {} page(s) of {}x{}",
        entries.len(),
        pages,
        columns,
        rows
    );
    Ok(plan)
}

fn validate(config: &LayoutConfig) -> Result<()> {
    if config.columns_per_page == 0 {
        return Err(SheetError::Configuration(
            "columns per page must be at least 1".to_string(),
        ));
    }
    if config.rows_per_column == 0 {
        return Err(SheetError::Configuration(
            "rows per column must be at least 1".to_string(),
        ));
    }
    if config
        .columns_per_page
        .checked_mul(config.rows_per_column)
        .is_none()
    {
        return Err(SheetError::Configuration(format!(
            "{} columns x {} rows overflows the page capacity",
            config.columns_per_page, config.rows_per_column
        )));
    }
    Ok(())
}

fn resolve_legend(lines: &[Vec<String>], colors: &CategoryColorMap) -> Result<LegendBlock> {
    let lines = lines
        .iter()
        .map(|line| {
            line.iter()
                .map(|label| {
                    let color = colors.resolve(label).ok_or_else(|| {
                        SheetError::UnresolvedCategory {
                            category: label.clone(),
                            context: "legend".to_string(),
                        }
                    })?;
                    Ok(LegendEntry {
                        label: label.clone(),
                        color,
                    })
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(LegendBlock { lines })
}

fn resolve_entry_colors(entries: &[ChannelEntry], colors: &CategoryColorMap) -> Result<Vec<Color>> {
    entries
        .iter()
        .map(|entry| {
            colors
                .resolve(&entry.category)
                .ok_or_else(|| SheetError::UnresolvedCategory {
                    category: entry.category.clone(),
                    context: entry_context(entry),
                })
        })
        .collect()
}

fn blank_page(page_index: usize, config: &LayoutConfig, legend: &LegendBlock) -> PageLayout {
    PageLayout {
        page_index,
        columns: (0..config.columns_per_page)
            .map(|column_index| ColumnLayout {
                column_index,
                header_lines: config.header_lines.clone(),
                cells: (0..config.rows_per_column).map(CellPlacement::blank).collect(),
                legend: legend.clone(),
            })
            .collect(),
    }
}

fn entry_context(entry: &ChannelEntry) -> String {
    let channel = format!("channel {} {}", entry.number, entry.code);
    match entry.source_line {
        Some(line) => format!("{channel} (line {line})"),
        None => channel,
    }
}
