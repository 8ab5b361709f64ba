/// Core data types for the rainfall prediction dashboard.
///
/// This module defines the shared domain model imported by all other modules:
/// the rainfall categories, the decoded prediction rows, the derived
/// aggregates and the error taxonomy. It contains no I/O and no rendering,
/// only types and the small accessors they need.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::PathBuf;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

// ---------------------------------------------------------------------------
// Horizon limits
// ---------------------------------------------------------------------------

/// Shortest forecast lookahead, in days.
pub const MIN_FORECAST_HORIZON: usize = 1;

/// Longest forecast lookahead, in days. The upstream ConvLSTM run uses a
/// 7-day window, so there is nothing further out to show.
pub const MAX_FORECAST_HORIZON: usize = 7;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Ordinal rainfall intensity bucket.
///
/// Variant order is the fixed display order (Low → Medium → High), so
/// `Category::iter()` and the derived `Ord` both follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize)]
pub enum Category {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Low => write!(f, "Low"),
            Category::Medium => write!(f, "Medium"),
            Category::High => write!(f, "High"),
        }
    }
}

/// A category cell exactly as it appeared in the results file.
///
/// `text` is kept verbatim so the export reproduces the source labels
/// (which are usually localized). `category` is `None` when the text is not
/// one of the recognized labels; such rows still take part in the
/// contingency table but never in the fixed three-way counts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CategoryLabel {
    pub text: String,
    pub category: Option<Category>,
}

impl CategoryLabel {
    pub fn new(text: impl Into<String>, category: Option<Category>) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.category.is_some()
    }
}

// Recognized labels sort in ordinal order, unrecognized ones after them by text.
impl Ord for CategoryLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.category, other.category) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.text.cmp(&other.text)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.text.cmp(&other.text),
        }
    }
}

impl PartialOrd for CategoryLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// Dataset types
// ---------------------------------------------------------------------------

/// One row of the prediction results file, decoded once at load time.
///
/// A blank value cell decodes to NaN. The value cells are also kept as
/// written so the preview and export never reformat them.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub actual_value: f64,     // mm
    pub predicted_value: f64,  // mm
    pub actual_text: String,
    pub predicted_text: String,
    pub actual_category: CategoryLabel,
    pub predicted_category: CategoryLabel,
    /// Cells of any non-required columns, in header order.
    pub extra: Vec<String>,
}

/// Where each required column sits in the source header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub headers: Vec<String>,
    pub actual_value: usize,
    pub predicted_value: usize,
    pub actual_category: usize,
    pub predicted_category: usize,
}

impl ColumnLayout {
    pub fn is_required(&self, index: usize) -> bool {
        index == self.actual_value
            || index == self.predicted_value
            || index == self.actual_category
            || index == self.predicted_category
    }
}

/// The full, ordered prediction results. Row order is the time-series
/// order and is never changed after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionDataset {
    pub layout: ColumnLayout,
    pub records: Vec<PredictionRecord>,
}

impl PredictionDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn headers(&self) -> &[String] {
        &self.layout.headers
    }
}

// ---------------------------------------------------------------------------
// Aggregate types
// ---------------------------------------------------------------------------

/// Row counts per predicted category. All three buckets are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Low => self.low,
            Category::Medium => self.medium,
            Category::High => self.high,
        }
    }

    pub fn increment(&mut self, category: Category) {
        match category {
            Category::Low => self.low += 1,
            Category::Medium => self.medium += 1,
            Category::High => self.high += 1,
        }
    }

    /// Counts in fixed display order.
    pub fn in_order(&self) -> Vec<(Category, usize)> {
        Category::iter().map(|c| (c, self.get(c))).collect()
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

/// Actual-vs-predicted category cross-tabulation.
///
/// Axis label sets are exactly the distinct labels observed on each axis,
/// independently; cells for pairs that never occur are absent from `cells`
/// and read back as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContingencyTable {
    pub actual_labels: Vec<CategoryLabel>,
    pub predicted_labels: Vec<CategoryLabel>,
    pub cells: BTreeMap<(CategoryLabel, CategoryLabel), usize>,
}

impl ContingencyTable {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Count for an (actual, predicted) pair of label texts.
    pub fn count(&self, actual: &str, predicted: &str) -> usize {
        self.cells
            .iter()
            .find(|((a, p), _)| a.text == actual && p.text == predicted)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Sum of one predicted-category column over every actual row.
    pub fn column_total(&self, predicted: &str) -> usize {
        self.cells
            .iter()
            .filter(|((_, p), _)| p.text == predicted)
            .map(|(_, n)| *n)
            .sum()
    }
}

/// One day of the short-horizon display slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    pub day_label: String, // "Day +1", "Day +2", ...
    pub value: f64,
    pub category: Category,
}

pub type ForecastSlice = Vec<ForecastDay>;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Reasons the results file could not be turned into a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// No file exists at the configured path.
    FileMissing(PathBuf),
    /// The file exists but could not be opened or its header read.
    Unreadable { path: PathBuf, reason: String },
    /// One or more required columns are absent from the header.
    MissingColumns(Vec<String>),
    /// A data row could not be decoded. `row` is 1-based, header excluded.
    MalformedRow { row: usize, reason: String },
    /// A category cell outside the recognized labels, in strict mode only.
    UnknownCategory { row: usize, label: String },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::FileMissing(path) => {
                write!(f, "Results file not found: {}", path.display())
            }
            LoadError::Unreadable { path, reason } => {
                write!(f, "Cannot read results file {}: {}", path.display(), reason)
            }
            LoadError::MissingColumns(columns) => {
                write!(f, "Missing required columns: {}", columns.join(", "))
            }
            LoadError::MalformedRow { row, reason } => {
                write!(f, "Malformed row {}: {}", row, reason)
            }
            LoadError::UnknownCategory { row, label } => {
                write!(f, "Unknown category label \"{}\" in row {}", label, row)
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Every failure the dashboard can report.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardError {
    Load(LoadError),
    /// Forecast horizon outside `MIN_FORECAST_HORIZON..=MAX_FORECAST_HORIZON`.
    InvalidHorizon(usize),
    Config(String),
    Export(String),
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardError::Load(err) => write!(f, "Load error: {}", err),
            DashboardError::InvalidHorizon(days) => write!(
                f,
                "Invalid forecast horizon: {} (expected {}..={})",
                days, MIN_FORECAST_HORIZON, MAX_FORECAST_HORIZON
            ),
            DashboardError::Config(msg) => write!(f, "Config error: {}", msg),
            DashboardError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::Load(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LoadError> for DashboardError {
    fn from(err: LoadError) -> Self {
        DashboardError::Load(err)
    }
}

/// Non-fatal conditions attached to a render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RenderWarning {
    /// The dataset has no rows; every artifact renders empty.
    EmptyDataset,
    /// Rows whose category text is not a recognized label.
    UnrecognizedCategories { rows: usize },
}

impl std::fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderWarning::EmptyDataset => write!(f, "Dataset contains no rows"),
            RenderWarning::UnrecognizedCategories { rows } => {
                write!(f, "{} rows carry unrecognized category labels", rows)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
