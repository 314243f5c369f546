//! Integration tests for the channel-sheet pipeline.
//!
//! These tests validate:
//! - Column-major placement across columns and pages
//! - Blank padding and the one-page minimum
//! - Color resolution and default-color fallback
//! - Config + CSV files on disk through to PDF bytes
//! - Deterministic output

use std::fs;

use sha2::{Digest, Sha256};

use channel_sheet::channels::{classify_records, parse_channel_csv, ChannelEntry};
use channel_sheet::config::SheetConfig;
use channel_sheet::layout::layout_sheet;
use channel_sheet::layout_config::LayoutConfig;
use channel_sheet::logos::LogoLookup;
use channel_sheet::pagination::{paginate, slot_for};
use channel_sheet::palette::{CategoryColorMap, Color};
use channel_sheet::pipeline::{compute_plan, generate_from_config_file, generate_sheet};
use channel_sheet::plan::PlacementPlan;
use channel_sheet::samples::{sample_channels_csv, sample_config_yaml};
use channel_sheet::SheetError;

// =====================================================================
// Helpers
// =====================================================================

fn entries(n: usize) -> Vec<ChannelEntry> {
    (0..n)
        .map(|i| ChannelEntry::new((i + 1).to_string(), format!("C{i}"), "Local"))
        .collect()
}

fn standard_plan(n: usize, columns: usize, rows: usize) -> PlacementPlan {
    let config = LayoutConfig::new(columns, rows);
    paginate(&entries(n), &config, &CategoryColorMap::standard()).unwrap()
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 100, "PDF too small: {} bytes", bytes.len());
    assert_eq!(&bytes[0..5], b"%PDF-", "Missing PDF header");
}

fn plan_digest(plan: &PlacementPlan) -> Vec<u8> {
    Sha256::digest(plan.to_json().unwrap().as_bytes()).to_vec()
}

// =====================================================================
// Placement properties
// =====================================================================

#[test]
fn every_entry_placed_exactly_once() {
    let colors = CategoryColorMap::standard();
    for n in [0, 1, 11, 12, 13, 24, 25, 100] {
        let plan = paginate(&entries(n), &LayoutConfig::new(4, 3), &colors).unwrap();
        assert_eq!(plan.filled_count(), n);
        assert_eq!(plan.slot_count(), plan.pages.len() * 12);
        let mut seen: Vec<usize> = plan.filled_cells().map(|f| f.sequence).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..n).collect::<Vec<_>>());
    }
}

#[test]
fn placements_match_slot_math() {
    let plan = standard_plan(30, 3, 4);
    for page in &plan.pages {
        for column in &page.columns {
            for cell in &column.cells {
                if let Some(filled) = &cell.filled {
                    let slot = slot_for(filled.sequence, 3, 4);
                    assert_eq!(slot.page, page.page_index);
                    assert_eq!(slot.column, column.column_index);
                    assert_eq!(slot.row, cell.row_index);
                }
            }
        }
    }
}

#[test]
fn order_within_page_follows_column_major_rank() {
    let rows = 5;
    let plan = standard_plan(37, 3, rows);
    for page in &plan.pages {
        let mut ranked: Vec<(usize, usize)> = Vec::new();
        for column in &page.columns {
            for cell in &column.cells {
                if let Some(f) = &cell.filled {
                    ranked.push((column.column_index * rows + cell.row_index, f.sequence));
                }
            }
        }
        for pair in ranked.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            assert!(pair[0].1 < pair[1].1);
        }
    }
}

#[test]
fn reading_continues_across_page_boundary() {
    let plan = standard_plan(13, 4, 3);
    assert_eq!(plan.pages.len(), 2);
    let last_on_first = plan.pages[0].columns[3].cells[2].filled.as_ref().unwrap();
    let first_on_second = plan.pages[1].columns[0].cells[0].filled.as_ref().unwrap();
    assert_eq!(last_on_first.sequence + 1, first_on_second.sequence);
    assert_eq!(first_on_second.entry.code, "C12");
    // The rest of page 2 is padding.
    let blanks = plan.pages[1].columns.iter().flat_map(|c| &c.cells).filter(|c| c.is_blank());
    assert_eq!(blanks.count(), 11);
}

#[test]
fn empty_list_still_prints_one_blank_page() {
    let config = SheetConfig::from_yaml_str("rows_per_column: 10").unwrap();
    let sheet = generate_sheet(&config, "number,code\n", &LogoLookup::default()).unwrap();
    assert_eq!(sheet.page_count(), 1);
    assert_eq!(sheet.plan.filled_count(), 0);
    assert_eq!(sheet.plan.slot_count(), 40);
    assert_valid_pdf(&sheet.pdf);
}

// =====================================================================
// Colors and errors
// =====================================================================

#[test]
fn default_color_only_applies_when_configured() {
    let list = vec![ChannelEntry::new("7", "X", "Opera")];
    let cfg = LayoutConfig::new(1, 1);
    let err = paginate(&list, &cfg, &CategoryColorMap::standard()).unwrap_err();
    assert!(matches!(err, SheetError::UnresolvedCategory { .. }));

    let teal = Color::from_hex("#008080").unwrap();
    let plan = paginate(&list, &cfg, &CategoryColorMap::standard().with_default(teal)).unwrap();
    assert_eq!(plan.filled_cells().next().unwrap().color, teal);
}

#[test]
fn classified_entries_get_palette_colors() {
    let records = parse_channel_csv(sample_channels_csv()).unwrap();
    let list = classify_records(records, &Default::default());
    let plan = paginate(&list, &LayoutConfig::new(4, 10), &CategoryColorMap::standard()).unwrap();
    let cnn = plan.filled_cells().find(|f| f.entry.code == "CNN").unwrap();
    assert_eq!(cnn.entry.category, "News");
    assert_eq!(cnn.color, Color::from_hex("#CC0000").unwrap());
    let espn = plan.filled_cells().find(|f| f.entry.code == "ESPN").unwrap();
    assert_eq!(espn.color, Color::from_hex("#008800").unwrap());
}

#[test]
fn zero_rows_fails_before_placement() {
    let config = LayoutConfig::new(4, 0);
    let err = paginate(&entries(5), &config, &CategoryColorMap::default()).unwrap_err();
    assert!(matches!(err, SheetError::Configuration(_)));
}

#[test]
fn malformed_csv_row_is_reported_with_line() {
    let err = compute_plan(&SheetConfig::default(), "2,KCBS\n4,\n").unwrap_err();
    assert!(matches!(err, SheetError::MalformedEntry { line: 2, .. }), "{err:?}");
}

#[test]
fn overfull_page_is_a_layout_error() {
    let config = SheetConfig::from_yaml_str("rows_per_column: 120").unwrap();
    let err = generate_sheet(&config, "2,KCBS\n", &LogoLookup::default()).unwrap_err();
    assert!(matches!(err, SheetError::Layout(_)));
}

// =====================================================================
// End to end
// =====================================================================

#[test]
fn sample_sheet_renders_two_pages() {
    let config = SheetConfig::from_yaml_str(sample_config_yaml()).unwrap();
    let sheet = generate_sheet(&config, sample_channels_csv(), &LogoLookup::default()).unwrap();
    assert_valid_pdf(&sheet.pdf);
    assert_eq!(sheet.page_count(), 2);
    // Every page has the three fold guides between four columns.
    assert!(sheet.layout.pages.iter().all(|p| p.guides.len() == 3));
    // Sorted by number: the first entry is channel 2.
    let first = sheet.plan.filled_cells().next().unwrap();
    assert_eq!(first.entry.number, "2");
}

#[test]
fn config_file_on_disk_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.yaml"), sample_config_yaml()).unwrap();
    fs::write(dir.path().join("channels.csv"), sample_channels_csv()).unwrap();

    let (config, sheet) = generate_from_config_file(&dir.path().join("config.yaml")).unwrap();
    assert_eq!(config.channels_csv, dir.path().join("channels.csv"));
    assert_eq!(config.output_pdf, dir.path().join("outputs/channels.pdf"));
    assert_valid_pdf(&sheet.pdf);
    assert_eq!(sheet.plan.filled_count(), 27);
}

#[test]
fn missing_channel_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.yaml"), "channels_csv: nope.csv\n").unwrap();
    let err = generate_from_config_file(&dir.path().join("config.yaml")).unwrap_err();
    assert!(matches!(err, SheetError::Io { .. }));
}

#[test]
fn enabled_logos_with_missing_dir_still_render() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = "logos:\n  enabled: true\n  dir: missing-logos\n  display_px: 10\n";
    fs::write(dir.path().join("config.yaml"), yaml).unwrap();
    fs::write(dir.path().join("channels.csv"), sample_channels_csv()).unwrap();
    let (_, sheet) = generate_from_config_file(&dir.path().join("config.yaml")).unwrap();
    assert_valid_pdf(&sheet.pdf);
}

#[test]
fn single_color_override_keeps_the_legend_resolvable() {
    let config = SheetConfig::from_yaml_str("colors:\n  News: '#FF0000'\n").unwrap();
    let sheet = generate_sheet(&config, sample_channels_csv(), &LogoLookup::default()).unwrap();
    assert_valid_pdf(&sheet.pdf);
    let cnn = sheet.plan.filled_cells().find(|f| f.entry.code == "CNN").unwrap();
    assert_eq!(cnn.color, Color::from_hex("#FF0000").unwrap());
}

#[test]
fn six_columns_keep_each_legend_inside_its_column() {
    let config = SheetConfig::from_yaml_str("columns: 6\nrows_per_column: 5\n").unwrap();
    let sheet = generate_sheet(&config, sample_channels_csv(), &LogoLookup::default()).unwrap();
    let column_width = (792.0 - 72.0) / 6.0;
    for page in &sheet.layout.pages {
        for row in page.boxes.iter().filter(|b| b.children.len() > 2) {
            let last = row.children.last().unwrap();
            assert!(last.x + last.width <= row.x + column_width + 0.01);
        }
    }
}

#[test]
fn plan_is_deterministic() {
    let config = SheetConfig::from_yaml_str(sample_config_yaml()).unwrap();
    let a = compute_plan(&config, sample_channels_csv()).unwrap();
    let b = compute_plan(&config, sample_channels_csv()).unwrap();
    assert_eq!(plan_digest(&a), plan_digest(&b));
    assert_eq!(PlacementPlan::from_json(&a.to_json().unwrap()).unwrap(), b);
}

#[test]
fn layout_uses_full_legend_even_for_single_category() {
    let cfg = {
        let mut c = LayoutConfig::new(2, 3);
        c.legend = channel_sheet::layout_config::default_legend();
        c.header_lines = vec!["Home".to_string()];
        c
    };
    let plan = paginate(&entries(2), &cfg, &CategoryColorMap::standard()).unwrap();
    for column in &plan.pages[0].columns {
        assert_eq!(column.legend.lines.iter().flatten().count(), 9);
    }
    let sheet = layout_sheet(&plan, &cfg, &Default::default(), &LogoLookup::default()).unwrap();
    assert_eq!(sheet.pages.len(), 1);
}
