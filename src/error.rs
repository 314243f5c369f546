//! Error taxonomy shared by every stage of the sheet pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Any failure that stops a sheet from being produced.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Structural parameters are unusable (zero columns, zero rows, bad
    /// colors, unknown fonts, ...). Raised before any placement happens.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A category (from an entry or from the legend) has no color and no
    /// default color is configured.
    #[error("no color configured for category {category:?} ({context}) and no default_color set")]
    UnresolvedCategory { category: String, context: String },

    /// A channel record is missing its number or code.
    #[error("malformed channel record on line {line}: {reason}")]
    MalformedEntry { line: u64, reason: String },

    /// The page geometry cannot hold the requested rows next to the header
    /// and legend bands.
    #[error("layout error: {0}")]
    Layout(String),

    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid channel CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid plan JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("render error: {0}")]
    Render(String),
}

impl SheetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
