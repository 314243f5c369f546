//! YAML configuration for a sheet run.
//!
//! The file is read once at startup and converted into the immutable values
//! the pipeline stages consume: [`LayoutConfig`], [`CategoryColorMap`],
//! [`Classifier`] and [`PageSetup`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::Classifier;
use crate::error::{Result, SheetError};
use crate::fonts::FontFace;
use crate::layout::{CellStyle, Margins, PageSetup};
use crate::layout_config::{default_legend, split_legend_line, FontSettings, FontSpec, LayoutConfig};
use crate::palette::{CategoryColorMap, Color};

/// Raw configuration file contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub channels_csv: PathBuf,
    pub output_pdf: PathBuf,
    pub house_name: String,
    pub title_suffix: String,
    pub columns: usize,
    /// Fixed cell capacity per column. When absent, rows are derived from
    /// the entry count so the sheet spans `target_pages` pages.
    pub rows_per_column: Option<usize>,
    pub target_pages: usize,
    pub sort_by_number: bool,
    pub show_description: bool,
    pub cell_left_indent: f32,
    pub cell_style: CellStyle,
    pub fold_guides: bool,
    pub page_width: f32,
    pub page_height: f32,
    pub margins: Margins,
    pub fonts: FontsSection,
    pub legend_line1: String,
    pub legend_line2: String,
    /// Replaces `legend_line1`/`legend_line2` when set.
    pub legend_lines: Option<Vec<String>>,
    /// Category name → hex color, layered over the standard palette.
    pub colors: BTreeMap<String, String>,
    pub default_color: Option<String>,
    pub classification: Classifier,
    pub logos: LogosSection,
}

/// Flat font keys, as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsSection {
    pub header_font: Option<String>,
    pub header_size: f32,
    pub header_leading: f32,
    pub cell_font: Option<String>,
    pub cell_size: f32,
    pub cell_leading: f32,
    pub legend_font: Option<String>,
    pub legend_size: f32,
    pub legend_leading: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogosSection {
    pub enabled: bool,
    pub dir: PathBuf,
    /// Square size the logo is drawn at, in points.
    pub display_px: f32,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            channels_csv: PathBuf::from("channels.csv"),
            output_pdf: PathBuf::from("outputs/channels.pdf"),
            house_name: "My House".to_string(),
            title_suffix: "TV Channels".to_string(),
            columns: 4,
            rows_per_column: None,
            target_pages: 2,
            sort_by_number: true,
            show_description: false,
            cell_left_indent: 36.0,
            cell_style: CellStyle::Text,
            fold_guides: true,
            // US Letter, landscape
            page_width: 792.0,
            page_height: 612.0,
            margins: Margins::uniform(36.0),
            fonts: FontsSection::default(),
            legend_line1: "Local|News|Sports|Kids|Faith".to_string(),
            legend_line2: "Shop|Music|Intl|TV".to_string(),
            legend_lines: None,
            colors: BTreeMap::new(),
            default_color: None,
            classification: Classifier::default(),
            logos: LogosSection::default(),
        }
    }
}

impl Default for FontsSection {
    fn default() -> Self {
        let d = FontSettings::default();
        Self {
            header_font: None,
            header_size: d.header.size,
            header_leading: d.header.leading,
            cell_font: None,
            cell_size: d.cell.size,
            cell_leading: d.cell.leading,
            legend_font: None,
            legend_size: d.legend.size,
            legend_leading: d.legend.leading,
        }
    }
}

impl Default for LogosSection {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::from("outputs/logos"),
            display_px: 9.0,
        }
    }
}

impl SheetConfig {
    /// Load a config file. Relative paths inside it are resolved against
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| SheetError::io(path, e))?;
        let mut config = Self::from_yaml_str(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        log::info!("loaded config from '{}'", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty file is a valid all-defaults config.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.channels_csv, &mut self.output_pdf, &mut self.logos.dir] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Check everything that can be checked without the channel list.
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(config_error("columns must be at least 1"));
        }
        if self.rows_per_column == Some(0) {
            return Err(config_error("rows_per_column must be at least 1"));
        }
        if self.rows_per_column.is_none() && self.target_pages == 0 {
            return Err(config_error(
                "target_pages must be at least 1 when rows_per_column is not set",
            ));
        }
        self.color_map()?;
        self.font_settings()?;
        self.page_setup()?;
        Ok(())
    }

    /// Rows per column for a list of `entry_count` channels.
    pub fn rows_for(&self, entry_count: usize) -> Result<usize> {
        match self.rows_per_column {
            Some(0) => Err(config_error("rows_per_column must be at least 1")),
            Some(rows) => Ok(rows),
            None => {
                let slots = self.columns.saturating_mul(self.target_pages);
                if slots == 0 {
                    return Err(config_error(
                        "columns and target_pages must be at least 1",
                    ));
                }
                Ok(entry_count.div_ceil(slots).max(1))
            }
        }
    }

    pub fn header_lines(&self) -> Vec<String> {
        [&self.house_name, &self.title_suffix]
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect()
    }

    pub fn legend(&self) -> Vec<Vec<String>> {
        let lines: Vec<Vec<String>> = match &self.legend_lines {
            Some(lines) => lines.iter().map(|l| split_legend_line(l)).collect(),
            None => vec![
                split_legend_line(&self.legend_line1),
                split_legend_line(&self.legend_line2),
            ],
        };
        let lines: Vec<Vec<String>> = lines.into_iter().filter(|l| !l.is_empty()).collect();
        if lines.is_empty() && self.legend_lines.is_none() {
            default_legend()
        } else {
            lines
        }
    }

    pub fn color_map(&self) -> Result<CategoryColorMap> {
        let mut map = CategoryColorMap::standard();
        for (category, hex) in &self.colors {
            map.insert(category.clone(), parse_color(hex, category)?);
        }
        if let Some(hex) = &self.default_color {
            map = map.with_default(parse_color(hex, "default_color")?);
        }
        Ok(map)
    }

    pub fn font_settings(&self) -> Result<FontSettings> {
        let defaults = FontSettings::default();
        let f = &self.fonts;
        Ok(FontSettings {
            header: font_spec(
                "header",
                f.header_font.as_deref(),
                defaults.header.face,
                f.header_size,
                f.header_leading,
            )?,
            cell: font_spec(
                "cell",
                f.cell_font.as_deref(),
                defaults.cell.face,
                f.cell_size,
                f.cell_leading,
            )?,
            legend: font_spec(
                "legend",
                f.legend_font.as_deref(),
                defaults.legend.face,
                f.legend_size,
                f.legend_leading,
            )?,
        })
    }

    /// Structural parameters for a run over `entry_count` channels.
    pub fn layout_config(&self, entry_count: usize) -> Result<LayoutConfig> {
        Ok(LayoutConfig {
            columns_per_page: self.columns,
            rows_per_column: self.rows_for(entry_count)?,
            header_lines: self.header_lines(),
            legend: self.legend(),
            fonts: self.font_settings()?,
            show_description: self.show_description,
        })
    }

    pub fn page_setup(&self) -> Result<PageSetup> {
        let m = &self.margins;
        if [m.left, m.right, m.top, m.bottom].iter().any(|v| *v < 0.0) {
            return Err(config_error("margins must not be negative"));
        }
        if self.page_width - m.left - m.right <= 0.0 || self.page_height - m.top - m.bottom <= 0.0 {
            return Err(config_error("margins leave no printable area on the page"));
        }
        if self.cell_left_indent < 0.0 {
            return Err(config_error("cell_left_indent must not be negative"));
        }
        Ok(PageSetup {
            title: self.header_lines().join(" - "),
            page_width: self.page_width,
            page_height: self.page_height,
            margins: self.margins,
            cell_left_indent: self.cell_left_indent,
            cell_style: self.cell_style,
            fold_guides: self.fold_guides,
            logo_size: if self.logos.enabled {
                Some(self.logos.display_px)
            } else {
                None
            },
        })
    }
}

fn config_error(msg: &str) -> SheetError {
    SheetError::Configuration(msg.to_string())
}

fn parse_color(hex: &str, what: &str) -> Result<Color> {
    Color::from_hex(hex)
        .ok_or_else(|| SheetError::Configuration(format!("{what}: invalid hex color {hex:?}")))
}

fn font_spec(
    role: &str,
    name: Option<&str>,
    fallback: FontFace,
    size: f32,
    leading: f32,
) -> Result<FontSpec> {
    let face = match name {
        Some(n) => n
            .parse::<FontFace>()
            .map_err(|e| SheetError::Configuration(format!("{role}_font: {e}")))?,
        None => fallback,
    };
    if size <= 0.0 || leading <= 0.0 {
        return Err(SheetError::Configuration(format!(
            "{role}_size and {role}_leading must be positive"
        )));
    }
    Ok(FontSpec::new(face, size, leading))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_is_all_defaults() {
        let cfg = SheetConfig::from_yaml_str("").unwrap();
        assert_eq!(cfg.columns, 4);
        assert_eq!(cfg.header_lines(), ["My House", "TV Channels"]);
        assert_eq!(cfg.legend(), default_legend());
        assert_eq!(cfg.color_map().unwrap().len(), 9);
    }

    #[test]
    fn reads_original_keys() {
        let yaml = r##"
channels_csv: lineup.csv
house_name: Lake Cabin
columns: 3
rows_per_column: 20
fonts:
  header_font: Times-Bold
  header_size: 12
  header_leading: 14
  cell_size: 7
  cell_leading: 8
margins: { left: 20, right: 20, top: 30, bottom: 30 }
legend_line1: "Local|News"
legend_line2: "TV"
default_color: "#808080"
"##;
        let cfg = SheetConfig::from_yaml_str(yaml).unwrap();
        let layout = cfg.layout_config(500).unwrap();
        assert_eq!(layout.columns_per_page, 3);
        assert_eq!(layout.rows_per_column, 20);
        assert_eq!(layout.header_lines, ["Lake Cabin", "TV Channels"]);
        assert_eq!(layout.legend, vec![vec!["Local", "News"], vec!["TV"]]);
        assert_eq!(layout.fonts.header.face, FontFace::TimesBold);
        assert_eq!(layout.fonts.cell.size, 7.0);
        let colors = cfg.color_map().unwrap();
        assert_eq!(colors.resolve("Whatever"), Some(Color::rgb(0x80, 0x80, 0x80)));
        assert_eq!(cfg.page_setup().unwrap().margins.top, 30.0);
    }

    #[test]
    fn color_overrides_keep_the_rest_of_the_palette() {
        let cfg = SheetConfig::from_yaml_str("colors:\n  News: '#FF0000'\n  Movies: '#123456'\n")
            .unwrap();
        let colors = cfg.color_map().unwrap();
        assert_eq!(colors.resolve("News"), Some(Color::rgb(0xFF, 0, 0)));
        assert_eq!(colors.resolve("Movies"), Some(Color::rgb(0x12, 0x34, 0x56)));
        assert_eq!(colors.resolve("Local"), Color::from_hex("#3366CC"));
        assert_eq!(colors.len(), 10);

        let plan = crate::pipeline::compute_plan(&cfg, "200,CNN\n").unwrap();
        let cnn = plan.filled_cells().next().unwrap();
        assert_eq!(cnn.color, Color::rgb(0xFF, 0, 0));
    }

    #[test]
    fn derived_rows_balance_across_target_pages() {
        let cfg = SheetConfig::from_yaml_str("columns: 4\ntarget_pages: 2\n").unwrap();
        assert_eq!(cfg.rows_for(300).unwrap(), 38);
        assert_eq!(cfg.rows_for(0).unwrap(), 1);
        let cfg = SheetConfig::from_yaml_str("rows_per_column: 10\n").unwrap();
        assert_eq!(cfg.rows_for(300).unwrap(), 10);
    }

    #[test]
    fn rejects_invalid_values() {
        for yaml in [
            "columns: 0",
            "rows_per_column: 0",
            "colors: { News: not-a-color }",
            "default_color: '#12'",
            "fonts: { cell_font: Papyrus }",
            "fonts: { cell_size: 0 }",
            "margins: { left: 400, right: 400, top: 10, bottom: 10 }",
        ] {
            let err = SheetConfig::from_yaml_str(yaml).unwrap_err();
            assert!(
                matches!(err, SheetError::Configuration(_)),
                "{yaml}: expected configuration error, got {err:?}"
            );
        }
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let err = SheetConfig::from_yaml_str("columns: [1, 2").unwrap_err();
        assert!(matches!(err, SheetError::Yaml(_)));
    }

    #[test]
    fn custom_legend_lines_replace_defaults() {
        let cfg = SheetConfig::from_yaml_str("legend_lines: ['News|Sports', 'Kids']").unwrap();
        assert_eq!(cfg.legend(), vec![vec!["News", "Sports"], vec!["Kids"]]);
    }

    #[test]
    fn load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "channels_csv: data/channels.csv\noutput_pdf: /tmp/out.pdf\n").unwrap();
        let cfg = SheetConfig::load(&path).unwrap();
        assert_eq!(cfg.channels_csv, dir.path().join("data/channels.csv"));
        assert_eq!(cfg.output_pdf, PathBuf::from("/tmp/out.pdf"));
    }
}
