//! Pipeline – ties together loading, classification, pagination, layout and
//! rendering into a single function call.

use std::fs;
use std::path::Path;

use crate::channels::{
    classify_records, load_channel_file, parse_channel_csv, sort_by_number, ChannelEntry,
    ChannelRecord,
};
use crate::config::SheetConfig;
use crate::error::{Result, SheetError};
use crate::layout::{layout_sheet, SheetLayout};
use crate::logos::LogoLookup;
use crate::pagination::paginate;
use crate::plan::PlacementPlan;
use crate::render::render_pdf;

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct GeneratedSheet {
    pub pdf: Vec<u8>,
    pub plan: PlacementPlan,
    pub layout: SheetLayout,
}

impl GeneratedSheet {
    pub fn page_count(&self) -> usize {
        self.plan.pages.len()
    }
}

/// Order and classify parsed records according to the config.
pub fn prepare_entries(config: &SheetConfig, mut records: Vec<ChannelRecord>) -> Vec<ChannelEntry> {
    if config.sort_by_number {
        sort_by_number(&mut records);
    }
    classify_records(records, &config.classification)
}

/// Pagination only: config → layout parameters + colors → plan.
pub fn build_plan(config: &SheetConfig, entries: &[ChannelEntry]) -> Result<PlacementPlan> {
    let layout_config = config.layout_config(entries.len())?;
    let colors = config.color_map()?;
    paginate(entries, &layout_config, &colors)
}

/// Full pipeline over channel CSV text: parse → classify → paginate → lay
/// out → render.
pub fn generate_sheet(
    config: &SheetConfig,
    channels_csv: &str,
    logos: &LogoLookup,
) -> Result<GeneratedSheet> {
    let entries = prepare_entries(config, parse_channel_csv(channels_csv)?);
    generate_from_entries(config, &entries, logos)
}

/// Run layout and rendering for already-prepared entries.
pub fn generate_from_entries(
    config: &SheetConfig,
    entries: &[ChannelEntry],
    logos: &LogoLookup,
) -> Result<GeneratedSheet> {
    let layout_config = config.layout_config(entries.len())?;
    let colors = config.color_map()?;
    let setup = config.page_setup()?;

    let plan = paginate(entries, &layout_config, &colors)?;
    let layout = layout_sheet(&plan, &layout_config, &setup, logos)?;
    let pdf = render_pdf(&layout)?;

    Ok(GeneratedSheet { pdf, plan, layout })
}

/// Compute only the placement plan from CSV text (no rendering).
pub fn compute_plan(config: &SheetConfig, channels_csv: &str) -> Result<PlacementPlan> {
    let entries = prepare_entries(config, parse_channel_csv(channels_csv)?);
    build_plan(config, &entries)
}

/// Load a config file, read the channel list and logos it points at, and
/// generate the sheet. Nothing is written to disk.
pub fn generate_from_config_file(path: &Path) -> Result<(SheetConfig, GeneratedSheet)> {
    let config = SheetConfig::load(path)?;
    let entries = prepare_entries(&config, load_channel_file(&config.channels_csv)?);
    log::info!(
        "loaded {} channels from '{}'",
        entries.len(),
        config.channels_csv.display()
    );

    let logos = if config.logos.enabled {
        LogoLookup::from_dir(&config.logos.dir, &entries)
    } else {
        LogoLookup::default()
    };

    let sheet = generate_from_entries(&config, &entries, &logos)?;
    Ok((config, sheet))
}

/// Write `bytes` to `path`, creating parent directories as needed.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| SheetError::io(parent, e))?;
        }
    }
    fs::write(path, bytes).map_err(|e| SheetError::io(path, e))
}
