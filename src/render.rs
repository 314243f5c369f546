//! PDF renderer – takes a [`SheetLayout`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API).

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use printpdf::*;

use crate::error::{Result, SheetError};
use crate::fonts::FontFace;
use crate::layout::{GuideLine, ImageContent, LayoutBox, SheetLayout, TextContent};

/// An embedded logo and the pixel size of its source image.
struct EmbeddedLogo {
    xobj_id: XObjectId,
    px_width: u32,
    px_height: u32,
}

type LogoTable = HashMap<PathBuf, EmbeddedLogo>;

const MM_PER_PT: f32 = 0.352778;

/// Baseline sits this fraction of the font size below the line top.
const ASCENT: f32 = 0.75;

/// Render a SheetLayout into PDF bytes.
///
/// Logos that cannot be read or decoded are skipped with a `log::warn`.
pub fn render_pdf(sheet: &SheetLayout) -> Result<Vec<u8>> {
    if sheet.page_width_pt <= 0.0 || sheet.page_height_pt <= 0.0 {
        return Err(SheetError::Render(format!(
            "invalid page size {} x {} pt",
            sheet.page_width_pt, sheet.page_height_pt
        )));
    }
    let width = Mm(sheet.page_width_pt * MM_PER_PT);
    let height = Mm(sheet.page_height_pt * MM_PER_PT);

    let mut doc = PdfDocument::new(&sheet.title);
    let logos = embed_logos(&mut doc, sheet);

    let mut pages: Vec<PdfPage> = sheet
        .pages
        .iter()
        .map(|page| {
            let mut ops = Vec::new();
            for guide in &page.guides {
                render_guide(&mut ops, guide, sheet.page_height_pt);
            }
            for lbox in &page.boxes {
                render_box(&mut ops, lbox, sheet.page_height_pt, &logos);
            }
            PdfPage::new(width, height, ops)
        })
        .collect();

    if pages.is_empty() {
        pages.push(PdfPage::new(width, height, Vec::new()));
    }

    let page_count = pages.len();
    doc.with_pages(pages);
    // Text is written as raw `Tj` ops, which the secure default would drop.
    let options = PdfSaveOptions {
        secure: false,
        ..PdfSaveOptions::default()
    };
    let bytes = doc.save(&options, &mut Vec::new());
    log::info!("rendered {page_count} page(s), {} bytes", bytes.len());

    Ok(bytes)
}

/// Register every distinct logo file referenced by the sheet once.
fn embed_logos(doc: &mut PdfDocument, sheet: &SheetLayout) -> LogoTable {
    let mut paths: HashSet<&Path> = HashSet::new();
    for lbox in sheet.pages.iter().flat_map(|p| &p.boxes) {
        collect_image_paths(lbox, &mut paths);
    }

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let mut table = LogoTable::new();
    for path in paths {
        match embed_logo(doc, path, &mut warnings) {
            Ok(logo) => {
                table.insert(path.to_path_buf(), logo);
            }
            Err(reason) => log::warn!("Skipping logo '{}': {reason}", path.display()),
        }
    }
    log::debug!("embedded {} logo(s)", table.len());
    table
}

fn embed_logo(
    doc: &mut PdfDocument,
    path: &Path,
    warnings: &mut Vec<PdfWarnMsg>,
) -> std::result::Result<EmbeddedLogo, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    // printpdf does not report pixel size, so decode once for it.
    let decoded = ::image::load_from_memory(&bytes).map_err(|e| format!("decode error: {e}"))?;
    let raw = RawImage::decode_from_bytes(&bytes, warnings)
        .map_err(|e| format!("PDF encode error: {e}"))?;
    Ok(EmbeddedLogo {
        xobj_id: doc.add_image(&raw),
        px_width: decoded.width(),
        px_height: decoded.height(),
    })
}

fn builtin_font(face: FontFace) -> BuiltinFont {
    match face {
        FontFace::Helvetica => BuiltinFont::Helvetica,
        FontFace::HelveticaBold => BuiltinFont::HelveticaBold,
        FontFace::HelveticaOblique => BuiltinFont::HelveticaOblique,
        FontFace::HelveticaBoldOblique => BuiltinFont::HelveticaBoldOblique,
        FontFace::TimesRoman => BuiltinFont::TimesRoman,
        FontFace::TimesBold => BuiltinFont::TimesBold,
        FontFace::TimesItalic => BuiltinFont::TimesItalic,
        FontFace::TimesBoldItalic => BuiltinFont::TimesBoldItalic,
        FontFace::Courier => BuiltinFont::Courier,
        FontFace::CourierBold => BuiltinFont::CourierBold,
        FontFace::CourierOblique => BuiltinFont::CourierOblique,
        FontFace::CourierBoldOblique => BuiltinFont::CourierBoldOblique,
    }
}

/// Encode text as WinAnsi bytes, the encoding printpdf declares for the
/// builtin fonts. Characters outside it become `?`.
fn winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en dash
            '\u{2014}' => 0x97, // em dash
            '\u{00A0}' => 0x20,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

/// Show a WinAnsi string with the current font.
///
/// printpdf's own builtin-font path writes the UTF-8 bytes of its `String`
/// unchanged, which garbles anything outside ASCII. The encoded bytes go out
/// as a hex `Tj` operand instead. The empty `WriteTextBuiltinFont` keeps the
/// font registered in the page resources.
fn show_text(font: BuiltinFont, text: &str) -> [Op; 2] {
    [
        Op::WriteTextBuiltinFont {
            items: Vec::new(),
            font,
        },
        Op::Unknown {
            key: "Tj".to_string(),
            value: vec![DictItem::String {
                data: winansi_bytes(text),
                literal: false,
            }],
        },
    ]
}

fn rgb(c: &[f32; 4]) -> Color {
    Color::Rgb(Rgb {
        r: c[0],
        g: c[1],
        b: c[2],
        icc_profile: None,
    })
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

/// Recursively collect all unique logo paths from a [`LayoutBox`] tree.
fn collect_image_paths<'a>(lbox: &'a LayoutBox, paths: &mut HashSet<&'a Path>) {
    if let Some(img) = &lbox.image {
        paths.insert(img.path.as_path());
    }
    for child in &lbox.children {
        collect_image_paths(child, paths);
    }
}

/// Draw a dotted fold guide as a run of short strokes.
fn render_guide(ops: &mut Vec<Op>, guide: &GuideLine, page_height: f32) {
    ops.push(Op::SetOutlineColor {
        col: rgb(&guide.color),
    });
    ops.push(Op::SetOutlineThickness {
        pt: Pt(guide.width),
    });
    for (top, bottom) in guide.segments() {
        ops.push(Op::DrawLine {
            line: Line {
                points: vec![
                    point(guide.x, page_height - top),
                    point(guide.x, page_height - bottom),
                ],
                is_closed: false,
            },
        });
    }
}

fn fill_rect(ops: &mut Vec<Op>, color: &[f32; 4], left: f32, bottom: f32, right: f32, top: f32) {
    ops.push(Op::SetFillColor { col: rgb(color) });
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    point(left, bottom),
                    point(right, bottom),
                    point(right, top),
                    point(left, top),
                ],
            }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    });
}

fn write_text(ops: &mut Vec<Op>, text: &TextContent, left: f32, top: f32) {
    let font = builtin_font(text.face);
    for line in text.lines.iter().filter(|l| !l.text.is_empty()) {
        let baseline = top - line.y_offset - text.font_size * ASCENT;
        ops.extend([
            Op::StartTextSection,
            Op::SetTextCursor {
                pos: Point {
                    x: Pt(left + line.x_offset),
                    y: Pt(baseline),
                },
            },
            Op::SetFontSizeBuiltinFont {
                size: Pt(text.font_size),
                font,
            },
            Op::SetLineHeight {
                lh: Pt(text.line_height),
            },
            Op::SetFillColor {
                col: rgb(&text.color),
            },
        ]);
        ops.extend(show_text(font, &line.text));
        ops.push(Op::EndTextSection);
    }
}

/// Scale a logo to its box. At 72 dpi one pixel is one point.
fn place_logo(ops: &mut Vec<Op>, logo: &EmbeddedLogo, img: &ImageContent, left: f32, top: f32) {
    let scale = |target: f32, px: u32| if px > 0 { target / px as f32 } else { 1.0 };
    ops.push(Op::UseXobject {
        id: logo.xobj_id.clone(),
        transform: XObjectTransform {
            translate_x: Some(Pt(left)),
            translate_y: Some(Pt(top - img.height)),
            dpi: Some(72.0),
            scale_x: Some(scale(img.width, logo.px_width)),
            scale_y: Some(scale(img.height, logo.px_height)),
            rotate: None,
        },
    });
}

/// Render a box and its children. Layout coordinates grow downward from the
/// top of the page; PDF coordinates grow upward from the bottom.
fn render_box(ops: &mut Vec<Op>, lbox: &LayoutBox, page_height: f32, logos: &LogoTable) {
    let top = page_height - lbox.y;

    if let Some(bg) = &lbox.background_color {
        fill_rect(ops, bg, lbox.x, top - lbox.height, lbox.x + lbox.width, top);
    }
    if let Some(text) = &lbox.text {
        write_text(ops, text, lbox.x, top);
    }
    if let Some(img) = &lbox.image {
        if let Some(logo) = logos.get(&img.path) {
            place_logo(ops, logo, img, lbox.x, top);
        }
    }
    for child in &lbox.children {
        render_box(ops, child, page_height, logos);
    }
}
