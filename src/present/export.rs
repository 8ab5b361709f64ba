/// Row-level rendering: head preview and the downloadable CSV.
///
/// Both write records back out in the source header order, cell text
/// exactly as it was read. Value cells come from the kept source text,
/// category cells from the verbatim labels and every other column from
/// `PredictionRecord::extra`.

use serde::Serialize;

use crate::model::{ColumnLayout, DashboardError, PredictionDataset, PredictionRecord};

pub const EXPORT_MIME: &str = "text/csv";

/// The first rows of the dataset, as table cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The whole dataset serialized for download.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime: String,
    pub size_bytes: usize,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// One record's cells in header order.
pub fn record_cells(layout: &ColumnLayout, record: &PredictionRecord) -> Vec<String> {
    let mut extra = record.extra.iter();
    (0..layout.headers.len())
        .map(|index| {
            if index == layout.actual_value {
                record.actual_text.clone()
            } else if index == layout.predicted_value {
                record.predicted_text.clone()
            } else if index == layout.actual_category {
                record.actual_category.text.clone()
            } else if index == layout.predicted_category {
                record.predicted_category.text.clone()
            } else {
                extra.next().cloned().unwrap_or_default()
            }
        })
        .collect()
}

/// First `rows` records, unmodified. Fewer if the dataset is shorter.
pub fn head_preview(dataset: &PredictionDataset, rows: usize) -> TablePreview {
    TablePreview {
        columns: dataset.headers().to_vec(),
        rows: dataset
            .records
            .iter()
            .take(rows)
            .map(|record| record_cells(&dataset.layout, record))
            .collect(),
    }
}

/// Serializes the full dataset as UTF-8 CSV with the original header.
pub fn export_csv(dataset: &PredictionDataset) -> Result<Vec<u8>, DashboardError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(dataset.headers())
        .map_err(|e| DashboardError::Export(e.to_string()))?;

    for record in &dataset.records {
        writer
            .write_record(record_cells(&dataset.layout, record))
            .map_err(|e| DashboardError::Export(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| DashboardError::Export(e.to_string()))
}

pub fn export_artifact(
    dataset: &PredictionDataset,
    file_name: &str,
) -> Result<ExportArtifact, DashboardError> {
    let bytes = export_csv(dataset)?;
    Ok(ExportArtifact {
        file_name: file_name.to_string(),
        mime: EXPORT_MIME.to_string(),
        size_bytes: bytes.len(),
        bytes,
    })
}
