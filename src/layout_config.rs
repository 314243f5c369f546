//! Layout config – the structural parameters the paginator works from.
//!
//! Built once per run from the YAML configuration and passed by reference;
//! nothing here is mutated after construction.

use serde::{Deserialize, Serialize};

use crate::fonts::FontFace;

/// Face, size and line leading for one text role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub face: FontFace,
    pub size: f32,
    pub leading: f32,
}

impl FontSpec {
    pub fn new(face: FontFace, size: f32, leading: f32) -> Self {
        Self {
            face,
            size,
            leading,
        }
    }
}

/// Font settings for the three text roles on the sheet. The paginator only
/// carries these through; the layout stage reads them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSettings {
    pub header: FontSpec,
    pub cell: FontSpec,
    pub legend: FontSpec,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            header: FontSpec::new(FontFace::HelveticaBold, 14.0, 16.0),
            cell: FontSpec::new(FontFace::Helvetica, 8.0, 9.5),
            legend: FontSpec::new(FontFace::Helvetica, 7.0, 8.5),
        }
    }
}

/// Structural parameters of the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub columns_per_page: usize,
    /// Cell capacity of every column.
    pub rows_per_column: usize,
    /// Header lines repeated at the top of every column.
    pub header_lines: Vec<String>,
    /// Legend lines, each an ordered list of category labels.
    pub legend: Vec<Vec<String>>,
    pub fonts: FontSettings,
    pub show_description: bool,
}

impl LayoutConfig {
    pub fn new(columns_per_page: usize, rows_per_column: usize) -> Self {
        Self {
            columns_per_page,
            rows_per_column,
            header_lines: Vec::new(),
            legend: Vec::new(),
            fonts: FontSettings::default(),
            show_description: false,
        }
    }

    /// Entries one page can hold. Saturates rather than overflowing.
    pub fn capacity(&self) -> usize {
        self.columns_per_page.saturating_mul(self.rows_per_column)
    }
}

/// Legend lines the sheet has always shipped with.
pub fn default_legend() -> Vec<Vec<String>> {
    vec![
        split_legend_line("Local|News|Sports|Kids|Faith"),
        split_legend_line("Shop|Music|Intl|TV"),
    ]
}

/// Split a `A|B|C` legend line into trimmed, non-empty labels.
pub fn split_legend_line(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_columns_times_rows() {
        assert_eq!(LayoutConfig::new(4, 3).capacity(), 12);
        assert_eq!(LayoutConfig::new(0, 3).capacity(), 0);
    }

    #[test]
    fn legend_lines_split_on_pipes() {
        assert_eq!(split_legend_line(" Local | News ||TV "), ["Local", "News", "TV"]);
        let legend = default_legend();
        assert_eq!(legend.len(), 2);
        assert_eq!(legend[1], ["Shop", "Music", "Intl", "TV"]);
    }
}
