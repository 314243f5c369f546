//! Sheet geometry – turns a [`PlacementPlan`] into positioned boxes.
//!
//! Every column is a vertical stack of bands:
//!
//! ```text
//!   header lines + one blank line
//!   rows_per_column cell rows
//!   one blank row
//!   legend lines
//! ```
//!
//! Dotted fold guides run between columns from the first cell row to the
//! bottom of the legend. All coordinates are page-absolute points with the
//! origin at the top-left corner.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};
use crate::fonts::{measure_text_width, truncate_to_width, FontFace};
use crate::layout_config::{FontSpec, LayoutConfig};
use crate::logos::LogoLookup;
use crate::palette::Color;
use crate::plan::{
    CellPlacement, ColumnLayout, FilledCell, LegendBlock, LegendEntry, PlacementPlan,
};

/// Gap between a logo and the text that follows it.
const LOGO_GAP_PT: f32 = 3.0;
/// Right-hand padding kept free inside each column.
const CELL_PADDING_PT: f32 = 2.0;
const LEGEND_SEPARATOR: &str = " | ";

/// How a cell shows its category color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStyle {
    /// Colored text on the page background.
    #[default]
    Text,
    /// White text on a box filled with the category color.
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Margins {
    pub fn uniform(pt: f32) -> Self {
        Self {
            left: pt,
            right: pt,
            top: pt,
            bottom: pt,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(36.0)
    }
}

/// Physical page parameters and drawing options.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSetup {
    /// Document title embedded in the PDF metadata.
    pub title: String,
    pub page_width: f32,
    pub page_height: f32,
    pub margins: Margins,
    pub cell_left_indent: f32,
    pub cell_style: CellStyle,
    pub fold_guides: bool,
    /// Square logo size in points; `None` disables logos.
    pub logo_size: Option<f32>,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            title: "TV Channels".to_string(),
            page_width: 792.0,
            page_height: 612.0,
            margins: Margins::default(),
            cell_left_indent: 36.0,
            cell_style: CellStyle::Text,
            fold_guides: true,
            logo_size: None,
        }
    }
}

/// A fully positioned document ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetLayout {
    pub title: String,
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub pages: Vec<SheetPage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetPage {
    pub page_index: usize,
    pub boxes: Vec<LayoutBox>,
    pub guides: Vec<GuideLine>,
}

/// A positioned rectangle with optional content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub background_color: Option<[f32; 4]>,
    pub text: Option<TextContent>,
    pub image: Option<ImageContent>,
    pub children: Vec<LayoutBox>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    pub lines: Vec<TextLine>,
    pub face: FontFace,
    pub font_size: f32,
    pub line_height: f32,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    /// X offset within the layout box (for alignment)
    pub x_offset: f32,
    /// Y offset from the top of the layout box
    pub y_offset: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageContent {
    pub path: PathBuf,
    pub width: f32,
    pub height: f32,
}

/// A dotted vertical fold guide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideLine {
    pub x: f32,
    pub y_top: f32,
    pub y_bottom: f32,
    pub width: f32,
    pub color: [f32; 4],
    pub dash: f32,
    pub gap: f32,
}

impl GuideLine {
    /// `(start, end)` y ranges of the visible dashes, top to bottom.
    pub fn segments(&self) -> Vec<(f32, f32)> {
        let mut out = Vec::new();
        if self.dash <= 0.0 {
            return out;
        }
        let step = self.dash + self.gap.max(0.0);
        let mut y = self.y_top;
        while y < self.y_bottom {
            out.push((y, (y + self.dash).min(self.y_bottom)));
            y += step;
        }
        out
    }
}

impl LayoutBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            background_color: None,
            text: None,
            image: None,
            children: Vec::new(),
        }
    }

    fn with_text(
        mut self,
        text: &str,
        font: &FontSpec,
        color: [f32; 4],
        x_offset: f32,
        y_offset: f32,
    ) -> Self {
        self.text = Some(TextContent {
            lines: vec![TextLine {
                text: text.to_string(),
                x_offset,
                y_offset,
            }],
            face: font.face,
            font_size: font.size,
            line_height: font.leading,
            color,
        });
        self
    }
}

/// Vertical bands shared by every column on every page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub column_width: f32,
    pub header_top: f32,
    pub rows_top: f32,
    pub row_height: f32,
    pub legend_top: f32,
    pub legend_bottom: f32,
}

/// Compute the band positions, failing when the bands do not fit between
/// the top and bottom margins.
pub fn compute_bands(config: &LayoutConfig, setup: &PageSetup) -> Result<Bands> {
    let m = &setup.margins;
    let content_width = setup.page_width - m.left - m.right;
    let content_bottom = setup.page_height - m.bottom;
    if config.columns_per_page == 0 || content_width <= 0.0 || content_bottom <= m.top {
        return Err(SheetError::Layout("no printable area for the columns".to_string()));
    }
    let column_width = content_width / config.columns_per_page as f32;
    if setup.cell_left_indent >= column_width {
        return Err(SheetError::Layout(format!(
            "cell indent {:.1} pt leaves no room in a {:.1} pt column",
            setup.cell_left_indent, column_width
        )));
    }

    let fonts = &config.fonts;
    let header_height = if config.header_lines.is_empty() {
        0.0
    } else {
        (config.header_lines.len() + 1) as f32 * fonts.header.leading
    };
    let row_height = match setup.logo_size {
        Some(size) => fonts.cell.leading.max(size + 2.0),
        None => fonts.cell.leading,
    };
    let legend_lines = config.legend.iter().filter(|l| !l.is_empty()).count();
    let legend_gap = if legend_lines > 0 { row_height } else { 0.0 };

    let header_top = m.top;
    let rows_top = header_top + header_height;
    let rows_bottom = rows_top + config.rows_per_column as f32 * row_height;
    let legend_top = rows_bottom + legend_gap;
    let legend_bottom = legend_top + legend_lines as f32 * fonts.legend.leading;

    if legend_bottom > content_bottom + 0.01 {
        return Err(SheetError::Layout(format!(
            "{} rows of {:.1} pt plus header and legend need {:.1} pt, but the page has {:.1} pt",
            config.rows_per_column,
            row_height,
            legend_bottom - m.top,
            content_bottom - m.top
        )));
    }

    Ok(Bands {
        column_width,
        header_top,
        rows_top,
        row_height,
        legend_top,
        legend_bottom,
    })
}

/// Position every header, cell, legend and fold guide of `plan`.
pub fn layout_sheet(
    plan: &PlacementPlan,
    config: &LayoutConfig,
    setup: &PageSetup,
    logos: &LogoLookup,
) -> Result<SheetLayout> {
    let bands = compute_bands(config, setup)?;
    log::debug!(
        "column width {:.1} pt, row height {:.1} pt, legend ends at {:.1} pt",
        bands.column_width,
        bands.row_height,
        bands.legend_bottom
    );

    let pages = plan
        .pages
        .iter()
        .map(|page| {
            let mut boxes = Vec::new();
            for column in &page.columns {
                let x = setup.margins.left + column.column_index as f32 * bands.column_width;
                layout_column(&mut boxes, column, x, &bands, config, setup, logos);
            }
            SheetPage {
                page_index: page.page_index,
                boxes,
                guides: fold_guides(plan.columns_per_page, &bands, setup),
            }
        })
        .collect();

    Ok(SheetLayout {
        title: setup.title.clone(),
        page_width_pt: setup.page_width,
        page_height_pt: setup.page_height,
        pages,
    })
}

fn layout_column(
    boxes: &mut Vec<LayoutBox>,
    column: &ColumnLayout,
    x: f32,
    bands: &Bands,
    config: &LayoutConfig,
    setup: &PageSetup,
    logos: &LogoLookup,
) {
    let header = &config.fonts.header;
    for (i, line) in column.header_lines.iter().enumerate() {
        let text = truncate_to_width(line, header.face, header.size, bands.column_width);
        let width = measure_text_width(&text, header.face, header.size);
        let lbox = LayoutBox::new(
            x,
            bands.header_top + i as f32 * header.leading,
            bands.column_width,
            header.leading,
        )
        .with_text(
            &text,
            header,
            Color::BLACK.to_rgba(),
            ((bands.column_width - width) / 2.0).max(0.0),
            0.0,
        );
        boxes.push(lbox);
    }

    for cell in &column.cells {
        if let Some(lbox) = layout_cell(cell, x, bands, config, setup, logos) {
            boxes.push(lbox);
        }
    }

    layout_legend(boxes, &column.legend, x, bands, &config.fonts.legend);
}

fn layout_cell(
    cell: &CellPlacement,
    x: f32,
    bands: &Bands,
    config: &LayoutConfig,
    setup: &PageSetup,
    logos: &LogoLookup,
) -> Option<LayoutBox> {
    let FilledCell { entry, color, .. } = cell.filled.as_ref()?;
    let font = &config.fonts.cell;
    let y = bands.rows_top + cell.row_index as f32 * bands.row_height;
    let mut cell_box = LayoutBox::new(x, y, bands.column_width, bands.row_height);

    let mut text_x = x + setup.cell_left_indent;
    let right_edge = x + bands.column_width - CELL_PADDING_PT;

    let text_color = match setup.cell_style {
        CellStyle::Text => color.to_rgba(),
        CellStyle::Fill => {
            let mut fill = LayoutBox::new(
                text_x - CELL_PADDING_PT,
                y,
                right_edge - text_x + 2.0 * CELL_PADDING_PT,
                bands.row_height,
            );
            fill.background_color = Some(color.to_rgba());
            cell_box.children.push(fill);
            Color::WHITE.to_rgba()
        }
    };

    if let (Some(size), Some(path)) = (setup.logo_size, logos.get(&entry.number, &entry.code)) {
        let mut logo = LayoutBox::new(
            text_x,
            y + (bands.row_height - size) / 2.0,
            size,
            size,
        );
        logo.image = Some(ImageContent {
            path: path.to_path_buf(),
            width: size,
            height: size,
        });
        cell_box.children.push(logo);
        text_x += size + LOGO_GAP_PT;
    }

    let y_offset = ((bands.row_height - font.size) / 2.0).max(0.0);
    let bold = FontSpec {
        face: font.face.bold(),
        ..*font
    };
    let number_width = measure_text_width(&entry.number, bold.face, bold.size);
    cell_box.children.push(
        LayoutBox::new(text_x, y, number_width, bands.row_height)
            .with_text(&entry.number, &bold, text_color, 0.0, y_offset),
    );

    let mut label = format!(" {}", entry.code);
    if config.show_description {
        if let Some(desc) = &entry.description {
            label.push_str(" - ");
            label.push_str(desc);
        }
    }
    let label_x = text_x + number_width;
    let label = truncate_to_width(&label, font.face, font.size, (right_edge - label_x).max(0.0));
    if !label.is_empty() {
        cell_box.children.push(
            LayoutBox::new(label_x, y, (right_edge - label_x).max(0.0), bands.row_height)
                .with_text(&label, font, text_color, 0.0, y_offset),
        );
    }

    Some(cell_box)
}

fn legend_line_width(line: &[LegendEntry], font: &FontSpec) -> f32 {
    let labels: f32 = line
        .iter()
        .map(|e| measure_text_width(&e.label, font.face, font.size))
        .sum();
    let separators = line.len().saturating_sub(1) as f32;
    labels + separators * measure_text_width(LEGEND_SEPARATOR, font.face, font.size)
}

/// Shrink the legend font just enough for `line` to fit the column. Width
/// scales linearly with size, so one pass is exact.
fn fit_legend_font(line: &[LegendEntry], font: &FontSpec, column_width: f32) -> FontSpec {
    let natural = legend_line_width(line, font);
    if natural <= column_width || natural <= 0.0 {
        return *font;
    }
    log::debug!("legend line is {natural:.1} pt in a {column_width:.1} pt column, shrinking");
    FontSpec {
        size: font.size * column_width / natural,
        ..*font
    }
}

fn layout_legend(
    boxes: &mut Vec<LayoutBox>,
    legend: &LegendBlock,
    x: f32,
    bands: &Bands,
    font: &FontSpec,
) {
    let lines = legend.lines.iter().filter(|l| !l.is_empty());
    for (i, line) in lines.enumerate() {
        let y = bands.legend_top + i as f32 * font.leading;
        let fitted = fit_legend_font(line, font, bands.column_width);
        let total = legend_line_width(line, &fitted);
        let separator_width = measure_text_width(LEGEND_SEPARATOR, fitted.face, fitted.size);

        let mut line_box = LayoutBox::new(x, y, bands.column_width, font.leading);
        let mut cursor = x + ((bands.column_width - total) / 2.0).max(0.0);
        for (j, entry) in line.iter().enumerate() {
            if j > 0 {
                line_box.children.push(
                    LayoutBox::new(cursor, y, separator_width, font.leading).with_text(
                        LEGEND_SEPARATOR,
                        &fitted,
                        Color::BLACK.to_rgba(),
                        0.0,
                        0.0,
                    ),
                );
                cursor += separator_width;
            }
            let width = measure_text_width(&entry.label, fitted.face, fitted.size);
            line_box.children.push(
                LayoutBox::new(cursor, y, width, font.leading).with_text(
                    &entry.label,
                    &fitted,
                    entry.color.to_rgba(),
                    0.0,
                    0.0,
                ),
            );
            cursor += width;
        }
        boxes.push(line_box);
    }
}

fn fold_guides(columns: usize, bands: &Bands, setup: &PageSetup) -> Vec<GuideLine> {
    if !setup.fold_guides {
        return Vec::new();
    }
    (1..columns)
        .map(|c| GuideLine {
            x: setup.margins.left + c as f32 * bands.column_width,
            y_top: bands.rows_top,
            y_bottom: bands.legend_bottom,
            width: 0.5,
            color: Color::LIGHT_GREY.to_rgba(),
            dash: 1.0,
            gap: 2.0,
        })
        .collect()
}
