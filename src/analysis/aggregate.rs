/// Display aggregates derived from the prediction dataset.
///
/// All three operations are pure and recomputed on every render pass.

use std::collections::{BTreeMap, BTreeSet};

use crate::analysis::categories::classify;
use crate::model::{
    CategoryCounts, ContingencyTable, DashboardError, ForecastDay, ForecastSlice,
    PredictionDataset, MAX_FORECAST_HORIZON, MIN_FORECAST_HORIZON,
};

// ---------------------------------------------------------------------------
// Category counts
// ---------------------------------------------------------------------------

/// Counts rows per predicted category.
///
/// Rows whose predicted label is not recognized contribute to no bucket.
pub fn count_by_category(dataset: &PredictionDataset) -> CategoryCounts {
    let mut counts = CategoryCounts::default();
    for record in &dataset.records {
        if let Some(category) = record.predicted_category.category {
            counts.increment(category);
        }
    }
    counts
}

/// Number of rows with an unrecognized label on either axis.
pub fn count_unrecognized_rows(dataset: &PredictionDataset) -> usize {
    dataset
        .records
        .iter()
        .filter(|r| !r.actual_category.is_recognized() || !r.predicted_category.is_recognized())
        .count()
}

// ---------------------------------------------------------------------------
// Contingency table
// ---------------------------------------------------------------------------

/// Cross-tabulates actual against predicted category labels.
pub fn cross_tabulate(dataset: &PredictionDataset) -> ContingencyTable {
    let mut actual_labels = BTreeSet::new();
    let mut predicted_labels = BTreeSet::new();
    let mut cells = BTreeMap::new();

    for record in &dataset.records {
        actual_labels.insert(record.actual_category.clone());
        predicted_labels.insert(record.predicted_category.clone());
        *cells
            .entry((
                record.actual_category.clone(),
                record.predicted_category.clone(),
            ))
            .or_insert(0) += 1;
    }

    ContingencyTable {
        actual_labels: actual_labels.into_iter().collect(),
        predicted_labels: predicted_labels.into_iter().collect(),
        cells,
    }
}

// ---------------------------------------------------------------------------
// Forecast slice
// ---------------------------------------------------------------------------

/// Takes the last `horizon` predicted values, labels them "Day +1".. in
/// dataset order and classifies each one afresh.
///
/// A dataset shorter than `horizon` yields all of its rows. A horizon outside
/// `1..=7` is rejected rather than clamped; clamping belongs to the control
/// surface.
pub fn forecast_slice(
    dataset: &PredictionDataset,
    horizon: usize,
) -> Result<ForecastSlice, DashboardError> {
    if !(MIN_FORECAST_HORIZON..=MAX_FORECAST_HORIZON).contains(&horizon) {
        return Err(DashboardError::InvalidHorizon(horizon));
    }

    let start = dataset.len().saturating_sub(horizon);
    Ok(dataset.records[start..]
        .iter()
        .enumerate()
        .map(|(i, record)| ForecastDay {
            day_label: format!("Day +{}", i + 1),
            value: record.predicted_value,
            category: classify(record.predicted_value),
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
