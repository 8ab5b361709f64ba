/// Render pass: dataset + controls → every artifact the dashboard shows.
///
/// The display shell calls `render_pass` once per interaction with the
/// current control values. The dataset comes from the shared `ResultStore`
/// (loaded at most once); all aggregates are rebuilt from scratch and owned
/// by the returned `DashboardView`.
///
/// Submodules:
/// - `charts` — line/bar chart specs, metric cards, contingency grid, forecast table.
/// - `export` — head preview and CSV export blob.

pub mod charts;
pub mod export;

use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::aggregate::{
    count_by_category, count_unrecognized_rows, cross_tabulate, forecast_slice,
};
use crate::analysis::categories::CategoryLabels;
use crate::controls::ControlSettings;
use crate::ingest::results_csv::ResultStore;
use crate::logging::{self, Component};
use crate::model::{DashboardError, RenderWarning};

use charts::{
    BarChartSpec, ContingencyGrid, ForecastTable, LineChartSpec, MetricCard, category_bars,
    contingency_grid, forecast_chart, forecast_table, metric_cards, trend_chart,
};
use export::{ExportArtifact, TablePreview, export_artifact, head_preview};

pub const VIEW_FILE_NAME: &str = "dashboard_view.json";

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// Static page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageText {
    pub title: String,
    pub subtitle: String,
    pub sidebar_note: String,
    pub forecast_note: String,
    pub footer: String,
}

impl Default for PageText {
    fn default() -> Self {
        Self {
            title: "Rainfall Prediction Dashboard".to_string(),
            subtitle: "ConvLSTM prediction results as numeric values and categories".to_string(),
            sidebar_note: "Shows ConvLSTM predictions bucketed into Low, Medium and High rainfall."
                .to_string(),
            forecast_note: "The daily forecast is a simulated slice of ConvLSTM output \
                            produced with a 7-day window."
                .to_string(),
            footer: "Model: ConvLSTM | Output: Rainfall prediction (numeric & category)".to_string(),
        }
    }
}

/// Everything one render pass produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub generated_at: String,
    pub page: PageText,
    pub controls: ControlSettings,
    pub row_count: usize,
    pub metrics: Vec<MetricCard>,
    pub trend_chart: LineChartSpec,
    pub category_chart: BarChartSpec,
    pub contingency: ContingencyGrid,
    pub forecast_table: ForecastTable,
    pub forecast_chart: LineChartSpec,
    pub preview: TablePreview,
    pub export: ExportArtifact,
    pub warnings: Vec<RenderWarning>,
}

/// Display options that do not change between passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationSettings {
    pub labels: CategoryLabels,
    pub export_file_name: String,
    pub page: PageText,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            labels: CategoryLabels::default(),
            export_file_name: "hasil_prediksi_kategori_convlstm.csv".to_string(),
            page: PageText::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Render pass
// ---------------------------------------------------------------------------

/// Runs one full render pass.
///
/// Controls are expected to be clamped already (`ControlSettings::applied`);
/// an out-of-range horizon surfaces as `InvalidHorizon` instead of being
/// silently fixed here. A load failure halts the pass with no partial view.
pub fn render_pass(
    store: &ResultStore,
    controls: &ControlSettings,
    settings: &PresentationSettings,
) -> Result<DashboardView, DashboardError> {
    let dataset = store.dataset()?;

    let mut warnings = Vec::new();
    if dataset.is_empty() {
        logging::warn(
            Component::Aggregator,
            Some(&store.path().display().to_string()),
            "Dataset contains no rows, rendering empty charts and tables",
        );
        warnings.push(RenderWarning::EmptyDataset);
    }
    let unrecognized = count_unrecognized_rows(dataset);
    if unrecognized > 0 {
        warnings.push(RenderWarning::UnrecognizedCategories { rows: unrecognized });
    }

    let counts = count_by_category(dataset);
    let table = cross_tabulate(dataset);
    let slice = forecast_slice(dataset, controls.forecast_horizon_days)?;

    let preview = head_preview(dataset, controls.preview_row_count);
    let export = export_artifact(dataset, &settings.export_file_name)?;

    logging::log_render_summary(
        dataset.len(),
        preview.rows.len(),
        slice.len(),
        warnings.len(),
    );

    Ok(DashboardView {
        generated_at: Utc::now().to_rfc3339(),
        page: settings.page.clone(),
        controls: *controls,
        row_count: dataset.len(),
        metrics: metric_cards(&counts, &settings.labels),
        trend_chart: trend_chart(dataset),
        category_chart: category_bars(&counts, &settings.labels),
        contingency: contingency_grid(&table),
        forecast_table: forecast_table(&slice, &settings.labels),
        forecast_chart: forecast_chart(&slice),
        preview,
        export,
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Writes the view as JSON and the export blob next to it.
/// Returns the two paths written, view first.
pub fn write_artifacts(view: &DashboardView, dir: &Path) -> Result<(PathBuf, PathBuf), DashboardError> {
    fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let view_path = dir.join(VIEW_FILE_NAME);
    let json = serde_json::to_string_pretty(view)
        .map_err(|e| DashboardError::Export(e.to_string()))?;
    fs::write(&view_path, json).map_err(|e| io_err(&view_path, e))?;

    let export_path = dir.join(&view.export.file_name);
    fs::write(&export_path, &view.export.bytes).map_err(|e| io_err(&export_path, e))?;

    for path in [&view_path, &export_path] {
        logging::info(
            Component::Presenter,
            Some(&path.display().to_string()),
            "Wrote dashboard artifact",
        );
    }

    Ok((view_path, export_path))
}

fn io_err(path: &Path, e: std::io::Error) -> DashboardError {
    DashboardError::Export(format!("writing {}: {}", path.display(), e))
}

pub fn print_summary(view: &DashboardView) {
    let rule = "═══════════════════════════════════════════════════════════";
    println!("\n{}", rule);
    println!("🌧️  {}", view.page.title.to_uppercase());
    println!("{}", rule);
    println!();
    println!("Rows loaded:      {}", view.row_count);
    for card in &view.metrics {
        println!("  {:<16}{}", card.label, card.count);
    }
    println!();
    println!("Forecast ({} days):", view.controls.forecast_horizon_days);
    for row in &view.forecast_table.rows {
        println!("  {:<8}{:>8.2} mm  {}", row.day, row.predicted_mm, row.category_label);
    }
    println!();
    println!(
        "Preview rows:     {}/{}",
        view.preview.rows.len(),
        view.controls.preview_row_count
    );
    println!("Export:           {} ({} bytes)", view.export.file_name, view.export.size_bytes);
    for warning in &view.warnings {
        println!("⚠ {}", warning);
    }
    println!("{}", rule);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::results_csv::LoaderSettings;

    fn store_with(name: &str, contents: &str) -> (ResultStore, PathBuf) {
        let path = std::env::temp_dir().join(format!(
            "rainfall_dashboard_render_{}_{}.csv",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        (ResultStore::new(&path, LoaderSettings::default()), path)
    }

    #[test]
    fn test_render_pass_on_empty_dataset_degrades_gracefully() {
        let (store, path) = store_with(
            "empty",
            "Aktual_Rain,Prediksi_Rain,Kategori_Aktual,Kategori_Prediksi\n",
        );
        let view = render_pass(&store, &ControlSettings::default(), &PresentationSettings::default())
            .expect("empty dataset renders");

        assert_eq!(view.warnings, vec![RenderWarning::EmptyDataset]);
        assert!(view.metrics.iter().all(|m| m.count == 0));
        assert_eq!(view.metrics.len(), 3);
        assert!(view.contingency.cells.is_empty());
        assert!(view.forecast_table.rows.is_empty());
        assert!(view.preview.rows.is_empty());
        assert!(view.trend_chart.series.iter().all(|s| s.values.is_empty()));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_render_pass_rejects_unclamped_horizon() {
        let (store, path) = store_with(
            "horizon",
            "Aktual_Rain,Prediksi_Rain,Kategori_Aktual,Kategori_Prediksi\n1.0,2.0,Rendah,Rendah\n",
        );
        let controls = ControlSettings {
            preview_row_count: 30,
            forecast_horizon_days: 9,
        };
        assert_eq!(
            render_pass(&store, &controls, &PresentationSettings::default()),
            Err(DashboardError::InvalidHorizon(9))
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_render_pass_reports_unrecognized_labels() {
        let (store, path) = store_with(
            "unknown",
            "Aktual_Rain,Prediksi_Rain,Kategori_Aktual,Kategori_Prediksi\n\
             1.0,2.0,Rendah,Rendah\n\
             60.0,70.0,Ekstrem,Tinggi\n",
        );
        let view = render_pass(&store, &ControlSettings::default(), &PresentationSettings::default())
            .unwrap();
        assert_eq!(
            view.warnings,
            vec![RenderWarning::UnrecognizedCategories { rows: 1 }]
        );
        assert_eq!(view.contingency.row_labels, vec!["Rendah", "Ekstrem"]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_render_pass_survives_blank_value_cell() {
        let (store, path) = store_with(
            "blank",
            "Aktual_Rain,Prediksi_Rain,Kategori_Aktual,Kategori_Prediksi\n\
             ,3.0,Rendah,Rendah\n\
             8.0,6.5,Sedang,Sedang\n",
        );
        let view = render_pass(&store, &ControlSettings::default(), &PresentationSettings::default())
            .expect("a blank cell does not stop the page");

        assert_eq!(view.row_count, 2);
        assert!(view.trend_chart.series[0].values[0].is_nan());
        assert_eq!(view.preview.rows[0][0], "");
        let json = serde_json::to_value(&view).unwrap();
        assert!(json["trend_chart"]["series"][0]["values"][0].is_null());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_view_json_omits_export_bytes() {
        let (store, path) = store_with(
            "json",
            "Aktual_Rain,Prediksi_Rain,Kategori_Aktual,Kategori_Prediksi\n1.0,2.0,Rendah,Rendah\n",
        );
        let view = render_pass(&store, &ControlSettings::default(), &PresentationSettings::default())
            .unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert!(json["export"].get("bytes").is_none());
        assert_eq!(json["export"]["mime"], "text/csv");
        assert_eq!(json["controls"]["forecast_horizon_days"], 3);

        let _ = fs::remove_file(&path);
    }
}
