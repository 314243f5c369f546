//! # channel-sheet – printable TV channel guide generator
//!
//! Turns a channel CSV and a YAML config into a fixed-size, multi-column,
//! multi-page PDF. The pipeline stages are:
//!
//! 1. **Load** – channel CSV → records ([`channels`]), YAML → [`config`]
//! 2. **Classify** – attach a color category to each channel ([`category`])
//! 3. **Paginate** – column-major page/column/row assignment ([`pagination`])
//! 4. **Lay out** – headers, cells, legends and fold guides ([`layout`])
//! 5. **Render** – emit PDF bytes via printpdf ([`render`])
//!
//! A C-compatible FFI surface is exposed via the [`ffi`] module.

pub mod category;
pub mod channels;
pub mod config;
pub mod error;
pub mod ffi;
pub mod fonts;
pub mod layout;
pub mod layout_config;
pub mod logos;
pub mod pagination;
pub mod palette;
pub mod pipeline;
pub mod plan;
pub mod render;
pub mod samples;

// Re-exports for convenience
pub use channels::ChannelEntry;
pub use config::SheetConfig;
pub use error::{Result, SheetError};
pub use layout_config::LayoutConfig;
pub use pagination::paginate;
pub use palette::{CategoryColorMap, Color};
pub use pipeline::{generate_from_config_file, generate_sheet, GeneratedSheet};
pub use plan::PlacementPlan;
