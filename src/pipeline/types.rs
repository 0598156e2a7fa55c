use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::excel::ExcelError;

pub const PRODUCT: &str = "Product";
pub const ASIN: &str = "ASIN";
pub const MODEL_REQUIREMENTS: &str = "Model_Requirements";
pub const TOTAL_VIDEO: &str = "Total_Video";
pub const SCENE: &str = "Scene";
pub const PETS: &str = "Pets";
pub const REQUIREMENTS: &str = "Requirements";
pub const COMMENTS: &str = "Comments";
pub const SHOOTING_REQUIREMENTS: &str = "Shooting_Requirements";

/// Semantic layout every incoming sheet is renamed onto, by position
pub const EXPECTED_SCHEMA: [&str; 8] = [
    PRODUCT,
    ASIN,
    MODEL_REQUIREMENTS,
    TOTAL_VIDEO,
    SCENE,
    PETS,
    REQUIREMENTS,
    COMMENTS,
];

/// Columns sent to the translator, in this order
pub const TRANSLATED_COLUMNS: [&str; 3] = [PRODUCT, SCENE, SHOOTING_REQUIREMENTS];

/// Placeholder for missing `Model_Requirements` and `Scene` values
pub const NOT_AVAILABLE: &str = "N/A";

/// Column letters read from the previous-run workbook (becomes `Product`)
pub const PREVIOUS_COLUMNS: &str = "D";

/// Column letters read from the incoming export
pub const INCOMING_COLUMNS: &str = "D:J,L";

/// Where a run currently is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "sheet", rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Reading,
    Filtering,
    Reconciling,
    Processing(String),
    Writing,
    Done,
    Failed,
}

/// Why a sheet produced no new rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoNewRowsCause {
    /// The marker was found on the last row
    MarkerAtEnd,
    /// The marker no longer exists in the incoming sheet
    MarkerNotFound { marker: String },
    /// The sheet has a header but no data rows
    NoDataRows,
}

/// Per-sheet failures; the sheet is skipped and the run continues
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SheetError {
    #[error("expected at least {expected} columns, found {found}")]
    SchemaMismatch { found: usize, expected: usize },

    #[error("no new rows ({0:?})")]
    NoNewRows(NoNewRowsCause),
}

/// What happened to one incoming sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetOutcome {
    Written {
        rows: usize,
        /// Columns whose translation failed and were kept as-is
        untranslated: Vec<String>,
    },
    Skipped {
        reason: SheetError,
    },
}

/// Run-fatal failures
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Error reading {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: ExcelError,
    },

    #[error("Error writing {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: ExcelError,
    },

    #[error("Task join error: {0}")]
    Task(String),
}

/// Added, removed and carried-over sheet names
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reconciliation {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    pub existing: BTreeSet<String>,
}

/// Result of a successful run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub output_path: PathBuf,
    /// False when no sheet had new rows and nothing was written
    pub output_written: bool,
    pub sheets_written: Vec<String>,
    pub sheets_skipped: Vec<(String, SheetError)>,
    pub added_sheets: BTreeSet<String>,
    pub removed_sheets: BTreeSet<String>,
    pub translation_failures: usize,
}
