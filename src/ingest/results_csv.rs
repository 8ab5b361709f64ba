/// Prediction results file loader
///
/// Reads the CSV produced by the upstream ConvLSTM run into a typed
/// `PredictionDataset`. Required columns are located by name once, from the
/// header, and every row is decoded up front so that a malformed file fails
/// here instead of somewhere in the middle of rendering.
///
/// Expected header (default column names):
///   Aktual_Rain,Prediksi_Rain,Kategori_Aktual,Kategori_Prediksi
///
/// Any other columns are carried through untouched for preview and export.

use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::analysis::aggregate::count_unrecognized_rows;
use crate::analysis::categories::CategoryLabels;
use crate::logging::{self, Component};
use crate::model::{ColumnLayout, LoadError, PredictionDataset, PredictionRecord};

// ============================================================================
// Loader settings
// ============================================================================

/// Header names of the four required columns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub actual_value: String,
    pub predicted_value: String,
    pub actual_category: String,
    pub predicted_category: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            actual_value: "Aktual_Rain".to_string(),
            predicted_value: "Prediksi_Rain".to_string(),
            actual_category: "Kategori_Aktual".to_string(),
            predicted_category: "Kategori_Prediksi".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderSettings {
    pub columns: ColumnNames,
    pub labels: CategoryLabels,
    /// Reject category cells that are not a recognized label.
    pub strict_categories: bool,
}

// ============================================================================
// Decoding
// ============================================================================

/// Loads and decodes the results file at `path`.
///
/// # Errors
/// - `FileMissing` if nothing exists at `path`
/// - `Unreadable` if the file cannot be opened or has no readable header
/// - `MissingColumns` listing every required column absent from the header
/// - `MalformedRow` for a row with a bad field count or a non-numeric value
///   (a blank value cell is not an error and reads as NaN)
/// - `UnknownCategory` for an unrecognized label, only when strict
pub fn load_dataset(path: &Path, settings: &LoaderSettings) -> Result<PredictionDataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileMissing(path.to_path_buf()));
    }

    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| LoadError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    decode(reader, settings).map_err(|err| match err {
        LoadError::Unreadable { reason, .. } => LoadError::Unreadable {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })
}

/// Decodes results CSV text held in memory. Same contract as `load_dataset`
/// minus the file checks; used to re-read an export blob.
pub fn parse_dataset(text: &[u8], settings: &LoaderSettings) -> Result<PredictionDataset, LoadError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text);
    decode(reader, settings)
}

fn decode<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    settings: &LoaderSettings,
) -> Result<PredictionDataset, LoadError> {
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Unreadable {
            path: PathBuf::new(),
            reason: e.to_string(),
        })?
        .iter()
        .map(String::from)
        .collect();

    let layout = locate_columns(headers, &settings.columns)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let fields = result.map_err(|e| LoadError::MalformedRow {
            row,
            reason: e.to_string(),
        })?;

        let parse_value = |index: usize| -> Result<(f64, String), LoadError> {
            let cell = fields.get(index).unwrap_or("");
            let trimmed = cell.trim();
            if trimmed.is_empty() {
                return Ok((f64::NAN, cell.to_string()));
            }
            trimmed
                .parse::<f64>()
                .map(|value| (value, cell.to_string()))
                .map_err(|_| LoadError::MalformedRow {
                    row,
                    reason: format!(
                        "column {} holds \"{}\", expected a number",
                        layout.headers[index], cell
                    ),
                })
        };

        let decode_label = |index: usize| {
            let label = settings.labels.decode(fields.get(index).unwrap_or(""));
            if settings.strict_categories && !label.is_recognized() {
                return Err(LoadError::UnknownCategory {
                    row,
                    label: label.text,
                });
            }
            Ok(label)
        };

        let extra = fields
            .iter()
            .enumerate()
            .filter(|(index, _)| !layout.is_required(*index))
            .map(|(_, cell)| cell.to_string())
            .collect();

        let (actual_value, actual_text) = parse_value(layout.actual_value)?;
        let (predicted_value, predicted_text) = parse_value(layout.predicted_value)?;

        records.push(PredictionRecord {
            actual_value,
            predicted_value,
            actual_text,
            predicted_text,
            actual_category: decode_label(layout.actual_category)?,
            predicted_category: decode_label(layout.predicted_category)?,
            extra,
        });
    }

    Ok(PredictionDataset { layout, records })
}

fn locate_columns(headers: Vec<String>, names: &ColumnNames) -> Result<ColumnLayout, LoadError> {
    let position = |name: &str| headers.iter().position(|h| h == name);

    let wanted = [
        &names.actual_value,
        &names.predicted_value,
        &names.actual_category,
        &names.predicted_category,
    ];
    let missing: Vec<String> = wanted
        .iter()
        .filter(|name| position(name.as_str()).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    // All four were found above.
    let [actual_value, predicted_value, actual_category, predicted_category] =
        wanted.map(|name| position(name.as_str()).unwrap_or_default());

    Ok(ColumnLayout {
        headers,
        actual_value,
        predicted_value,
        actual_category,
        predicted_category,
    })
}

// ============================================================================
// Load-once store
// ============================================================================

/// Owns the results file location and the dataset decoded from it.
///
/// Built once at process start and handed by reference to whatever renders.
/// The first successful `dataset()` call loads the file; later calls return
/// the same dataset. A failed load is not cached, so the next pass retries.
pub struct ResultStore {
    path: PathBuf,
    settings: LoaderSettings,
    cache: OnceCell<PredictionDataset>,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>, settings: LoaderSettings) -> Self {
        Self {
            path: path.into(),
            settings,
            cache: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Returns the cached dataset, loading it on first use.
    pub fn dataset(&self) -> Result<&PredictionDataset, LoadError> {
        if let Some(dataset) = self.cache.get() {
            logging::debug(Component::Loader, None, "Using cached prediction results");
            return Ok(dataset);
        }

        self.cache.get_or_try_init(|| {
            let path_str = self.path.display().to_string();
            let dataset = load_dataset(&self.path, &self.settings)?;

            logging::info(
                Component::Loader,
                Some(&path_str),
                &format!("Loaded {} prediction rows", dataset.len()),
            );

            let unrecognized = count_unrecognized_rows(&dataset);
            if unrecognized > 0 {
                logging::warn(
                    Component::Loader,
                    Some(&path_str),
                    &format!(
                        "{} rows carry category labels outside {}/{}/{}",
                        unrecognized,
                        self.settings.labels.low,
                        self.settings.labels.medium,
                        self.settings.labels.high
                    ),
                );
            }

            Ok(dataset)
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    const SAMPLE: &str = "\
Aktual_Rain,Prediksi_Rain,Kategori_Aktual,Kategori_Prediksi
2.0,1.0,Rendah,Rendah
25.0,22.0,Tinggi,Tinggi
10.0,30.0,Sedang,Tinggi
";

    fn settings() -> LoaderSettings {
        LoaderSettings::default()
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "rainfall_dashboard_{}_{}.csv",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).expect("temp dir should be writable");
        path
    }

    #[test]
    fn test_parse_sample_preserves_order_and_types() {
        let data = parse_dataset(SAMPLE.as_bytes(), &settings()).expect("sample should parse");
        assert_eq!(data.len(), 3);
        let predicted: Vec<f64> = data.records.iter().map(|r| r.predicted_value).collect();
        assert_eq!(predicted, vec![1.0, 22.0, 30.0]);
        assert_eq!(data.records[2].actual_category.category, Some(Category::Medium));
        assert_eq!(data.records[2].predicted_category.text, "Tinggi");
    }

    #[test]
    fn test_columns_located_by_name_not_position() {
        let text = "\
Kategori_Prediksi,Tanggal,Prediksi_Rain,Kategori_Aktual,Aktual_Rain
Sedang,2024-01-01,7.5,Rendah,3.0
";
        let data = parse_dataset(text.as_bytes(), &settings()).expect("reordered header parses");
        let record = &data.records[0];
        assert_eq!(record.actual_value, 3.0);
        assert_eq!(record.predicted_value, 7.5);
        assert_eq!(record.predicted_category.category, Some(Category::Medium));
        assert_eq!(record.extra, vec!["2024-01-01".to_string()]);
    }

    #[test]
    fn test_missing_columns_are_all_reported() {
        let text = "Aktual_Rain,Kategori_Aktual\n1.0,Rendah\n";
        let err = parse_dataset(text.as_bytes(), &settings()).unwrap_err();
        assert_eq!(
            err,
            LoadError::MissingColumns(vec![
                "Prediksi_Rain".to_string(),
                "Kategori_Prediksi".to_string(),
            ])
        );
    }

    #[test]
    fn test_non_numeric_value_is_malformed_row() {
        let text = "\
Aktual_Rain,Prediksi_Rain,Kategori_Aktual,Kategori_Prediksi
1.0,2.0,Rendah,Rendah
abc,2.0,Rendah,Rendah
";
        match parse_dataset(text.as_bytes(), &settings()) {
            Err(LoadError::MalformedRow { row, reason }) => {
                assert_eq!(row, 2);
                assert!(reason.contains("Aktual_Rain"), "reason was: {}", reason);
            }
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_value_reads_as_nan_and_keeps_the_row() {
        let text = "\
Aktual_Rain,Prediksi_Rain,Kategori_Aktual,Kategori_Prediksi
1.0,2.0,Rendah,Rendah
,3.0,Rendah,Rendah
";
        let data = parse_dataset(text.as_bytes(), &settings()).expect("blank cell is tolerated");
        assert_eq!(data.len(), 2);
        assert!(data.records[1].actual_value.is_nan());
        assert_eq!(data.records[1].actual_text, "");
        assert_eq!(data.records[1].predicted_value, 3.0);
    }

    #[test]
    fn test_value_cells_keep_source_text() {
        let text = "\
Aktual_Rain,Prediksi_Rain,Kategori_Aktual,Kategori_Prediksi
1.50,2,Rendah,Rendah
";
        let record = &parse_dataset(text.as_bytes(), &settings()).unwrap().records[0];
        assert_eq!(record.actual_value, 1.5);
        assert_eq!(record.actual_text, "1.50");
        assert_eq!(record.predicted_text, "2");
    }

    #[test]
    fn test_short_row_is_malformed_row() {
        let text = "\
Aktual_Rain,Prediksi_Rain,Kategori_Aktual,Kategori_Prediksi
1.0,2.0,Rendah
";
        let err = parse_dataset(text.as_bytes(), &settings()).unwrap_err();
        assert!(matches!(err, LoadError::MalformedRow { row: 1, .. }), "got {:?}", err);
    }

    #[test]
    fn test_unknown_label_kept_unless_strict() {
        let text = "\
Aktual_Rain,Prediksi_Rain,Kategori_Aktual,Kategori_Prediksi
60.0,55.0,Ekstrem,Tinggi
";
        let data = parse_dataset(text.as_bytes(), &settings()).expect("lenient mode keeps the row");
        assert_eq!(data.records[0].actual_category.text, "Ekstrem");
        assert!(!data.records[0].actual_category.is_recognized());

        let strict = LoaderSettings {
            strict_categories: true,
            ..settings()
        };
        assert_eq!(
            parse_dataset(text.as_bytes(), &strict).unwrap_err(),
            LoadError::UnknownCategory {
                row: 1,
                label: "Ekstrem".to_string(),
            }
        );
    }

    #[test]
    fn test_header_only_file_is_empty_dataset() {
        let text = "Aktual_Rain,Prediksi_Rain,Kategori_Aktual,Kategori_Prediksi\n";
        let data = parse_dataset(text.as_bytes(), &settings()).expect("header-only is valid");
        assert!(data.is_empty());
    }

    #[test]
    fn test_missing_file_is_file_missing() {
        let path = std::env::temp_dir().join("rainfall_dashboard_definitely_absent.csv");
        assert_eq!(
            load_dataset(&path, &settings()).unwrap_err(),
            LoadError::FileMissing(path)
        );
    }

    #[test]
    fn test_store_loads_once_and_caches() {
        let path = temp_file("store_cache", SAMPLE);
        let store = ResultStore::new(&path, settings());
        assert!(!store.is_loaded());

        let first = store.dataset().expect("first load succeeds").clone();
        assert!(store.is_loaded());

        // The file changing underneath does not affect the cached dataset.
        std::fs::write(&path, "garbage").unwrap();
        let second = store.dataset().expect("cached dataset is returned");
        assert_eq!(&first, second);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_store_does_not_cache_failures() {
        let path = std::env::temp_dir().join(format!(
            "rainfall_dashboard_store_retry_{}.csv",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let store = ResultStore::new(&path, settings());
        assert!(matches!(store.dataset(), Err(LoadError::FileMissing(_))));
        assert!(!store.is_loaded());

        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(store.dataset().expect("retry succeeds").len(), 3);

        let _ = std::fs::remove_file(&path);
    }
}
