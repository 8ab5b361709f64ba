/// Chart and table specs handed to the display shell.
///
/// Nothing here decides anything: the aggregates are already computed and
/// these builders only attach titles, axis labels and display labels.

use serde::Serialize;

use crate::analysis::categories::CategoryLabels;
use crate::model::{Category, CategoryCounts, ContingencyTable, ForecastSlice, PredictionDataset};

// ---------------------------------------------------------------------------
// Line charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub style: LineStyle,
    pub markers: bool,
    pub values: Vec<f64>,
}

/// A line chart. When `x_categories` is `None` the x axis is the 0-based
/// row index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_categories: Option<Vec<String>>,
    pub series: Vec<LineSeries>,
}

/// Actual and predicted rainfall over the whole dataset, in row order.
pub fn trend_chart(dataset: &PredictionDataset) -> LineChartSpec {
    let (actual, predicted): (Vec<f64>, Vec<f64>) = dataset
        .records
        .iter()
        .map(|r| (r.actual_value, r.predicted_value))
        .unzip();

    LineChartSpec {
        title: "Actual vs Predicted Rainfall Trend".to_string(),
        x_label: "Time index".to_string(),
        y_label: "Rainfall (mm)".to_string(),
        x_categories: None,
        series: vec![
            LineSeries {
                name: "Actual".to_string(),
                style: LineStyle::Solid,
                markers: false,
                values: actual,
            },
            LineSeries {
                name: "Predicted".to_string(),
                style: LineStyle::Dashed,
                markers: false,
                values: predicted,
            },
        ],
    }
}

// ---------------------------------------------------------------------------
// Category bars and metric cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub category: Category,
    pub label: String,
    pub count: usize,
    /// Text drawn on top of the bar.
    pub annotation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub category: Category,
    pub label: String,
    pub count: usize,
}

/// Three bars, Low → Medium → High, each annotated with its count.
pub fn category_bars(counts: &CategoryCounts, labels: &CategoryLabels) -> BarChartSpec {
    BarChartSpec {
        title: "Predicted Category Distribution".to_string(),
        x_label: "Category".to_string(),
        y_label: "Count".to_string(),
        bars: counts
            .in_order()
            .into_iter()
            .map(|(category, count)| Bar {
                category,
                label: labels.label(category).to_string(),
                count,
                annotation: count.to_string(),
            })
            .collect(),
    }
}

pub fn metric_cards(counts: &CategoryCounts, labels: &CategoryLabels) -> Vec<MetricCard> {
    counts
        .in_order()
        .into_iter()
        .map(|(category, count)| MetricCard {
            category,
            label: labels.label(category).to_string(),
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Contingency grid
// ---------------------------------------------------------------------------

/// Rows are actual categories, columns predicted categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContingencyGrid {
    pub row_axis: String,
    pub column_axis: String,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub cells: Vec<Vec<usize>>,
}

pub fn contingency_grid(table: &ContingencyTable) -> ContingencyGrid {
    let cells = table
        .actual_labels
        .iter()
        .map(|actual| {
            table
                .predicted_labels
                .iter()
                .map(|predicted| {
                    table
                        .cells
                        .get(&(actual.clone(), predicted.clone()))
                        .copied()
                        .unwrap_or(0)
                })
                .collect()
        })
        .collect();

    ContingencyGrid {
        row_axis: "Actual category".to_string(),
        column_axis: "Predicted category".to_string(),
        row_labels: table.actual_labels.iter().map(|l| l.text.clone()).collect(),
        column_labels: table.predicted_labels.iter().map(|l| l.text.clone()).collect(),
        cells,
    }
}

// ---------------------------------------------------------------------------
// Forecast table and trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub day: String,
    pub predicted_mm: f64,
    pub category: Category,
    pub category_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastTable {
    pub columns: Vec<String>,
    pub rows: Vec<ForecastRow>,
}

pub fn forecast_table(slice: &ForecastSlice, labels: &CategoryLabels) -> ForecastTable {
    ForecastTable {
        columns: vec![
            "Day".to_string(),
            "Predicted Rainfall (mm)".to_string(),
            "Category".to_string(),
        ],
        rows: slice
            .iter()
            .map(|day| ForecastRow {
                day: day.day_label.clone(),
                predicted_mm: day.value,
                category: day.category,
                category_label: labels.label(day.category).to_string(),
            })
            .collect(),
    }
}

/// Connected points over the day labels.
pub fn forecast_chart(slice: &ForecastSlice) -> LineChartSpec {
    LineChartSpec {
        title: "Predicted Rainfall 1-7 Days Ahead".to_string(),
        x_label: "Day".to_string(),
        y_label: "Rainfall (mm)".to_string(),
        x_categories: Some(slice.iter().map(|d| d.day_label.clone()).collect()),
        series: vec![LineSeries {
            name: "Predicted".to_string(),
            style: LineStyle::Solid,
            markers: true,
            values: slice.iter().map(|d| d.value).collect(),
        }],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate::{count_by_category, cross_tabulate, forecast_slice};
    use crate::ingest::results_csv::{parse_dataset, LoaderSettings};

    fn sample() -> PredictionDataset {
        let text = "\
Aktual_Rain,Prediksi_Rain,Kategori_Aktual,Kategori_Prediksi
2.0,1.0,Rendah,Rendah
25.0,22.0,Tinggi,Tinggi
10.0,30.0,Sedang,Tinggi
";
        parse_dataset(text.as_bytes(), &LoaderSettings::default()).unwrap()
    }

    #[test]
    fn test_trend_chart_has_parallel_series_in_order() {
        let chart = trend_chart(&sample());
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].values, vec![2.0, 25.0, 10.0]);
        assert_eq!(chart.series[1].values, vec![1.0, 22.0, 30.0]);
        assert_eq!(chart.series[1].style, LineStyle::Dashed);
        assert!(chart.x_categories.is_none());
    }

    #[test]
    fn test_bars_follow_fixed_order_with_count_annotations() {
        let labels = CategoryLabels::default();
        let chart = category_bars(&count_by_category(&sample()), &labels);
        let summary: Vec<(&str, usize, &str)> = chart
            .bars
            .iter()
            .map(|b| (b.label.as_str(), b.count, b.annotation.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![("Rendah", 1, "1"), ("Sedang", 0, "0"), ("Tinggi", 2, "2")]
        );
    }

    #[test]
    fn test_metric_cards_match_counts() {
        let cards = metric_cards(&count_by_category(&sample()), &CategoryLabels::default());
        let counts: Vec<usize> = cards.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![1, 0, 2]);
    }

    #[test]
    fn test_contingency_grid_layout() {
        let grid = contingency_grid(&cross_tabulate(&sample()));
        assert_eq!(grid.row_labels, vec!["Rendah", "Sedang", "Tinggi"]);
        assert_eq!(grid.column_labels, vec!["Rendah", "Tinggi"]);
        assert_eq!(grid.cells, vec![vec![1, 0], vec![0, 1], vec![0, 1]]);
    }

    #[test]
    fn test_forecast_table_and_chart_share_days() {
        let labels = CategoryLabels::default();
        let slice = forecast_slice(&sample(), 3).unwrap();
        let table = forecast_table(&slice, &labels);
        let chart = forecast_chart(&slice);

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].category_label, "Rendah");
        assert_eq!(table.rows[2].category_label, "Tinggi");
        assert_eq!(
            chart.x_categories,
            Some(vec!["Day +1".to_string(), "Day +2".to_string(), "Day +3".to_string()])
        );
        assert_eq!(chart.series[0].values, vec![1.0, 22.0, 30.0]);
        assert!(chart.series[0].markers);
    }
}
