/// Rainfall category classification.
///
/// Daily rainfall is bucketed into three ordinal categories using fixed
/// millimetre thresholds. The results file stores categories as label text
/// (Indonesian by default), so this module also owns the mapping between
/// label text and `Category`.

use serde::Deserialize;
use strum::IntoEnumIterator;

use crate::model::{Category, CategoryLabel};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Values below this are Low, in mm.
pub const MEDIUM_THRESHOLD_MM: f64 = 5.0;

/// Values at or above this are High, in mm.
pub const HIGH_THRESHOLD_MM: f64 = 20.0;

/// Buckets a rainfall value.
///
///   value < 5        → Low
///   5 <= value < 20  → Medium
///   value >= 20      → High
///
/// Total over all inputs. Negative rainfall is not rejected and lands in Low.
/// NaN fails both comparisons and lands in High.
pub fn classify(value: f64) -> Category {
    if value < MEDIUM_THRESHOLD_MM {
        Category::Low
    } else if value < HIGH_THRESHOLD_MM {
        Category::Medium
    } else {
        Category::High
    }
}

// ---------------------------------------------------------------------------
// Label text
// ---------------------------------------------------------------------------

/// The label text used for each category in the results file and on screen.
///
/// Exactly one label set is active per load. A file written with English
/// labels needs `CategoryLabels::english()` (or `[labels]` in the config);
/// with the default set, `Low` is just another unrecognized label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CategoryLabels {
    pub low: String,
    pub medium: String,
    pub high: String,
}

impl Default for CategoryLabels {
    fn default() -> Self {
        Self {
            low: "Rendah".to_string(),
            medium: "Sedang".to_string(),
            high: "Tinggi".to_string(),
        }
    }
}

impl CategoryLabels {
    /// English labels, for sources that were written without localization.
    pub fn english() -> Self {
        Self {
            low: "Low".to_string(),
            medium: "Medium".to_string(),
            high: "High".to_string(),
        }
    }

    pub fn label(&self, category: Category) -> &str {
        match category {
            Category::Low => &self.low,
            Category::Medium => &self.medium,
            Category::High => &self.high,
        }
    }

    /// Exact-match lookup of a label cell against the three active labels.
    /// No trimming or case folding.
    pub fn resolve(&self, text: &str) -> Option<Category> {
        Category::iter().find(|&category| self.label(category) == text)
    }

    pub fn decode(&self, text: &str) -> CategoryLabel {
        CategoryLabel::new(text, self.resolve(text))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
