/// Dashboard configuration.
///
/// Settings come from a TOML file (default `./rainfall_dashboard.toml`,
/// or the path in `RAINFALL_DASHBOARD_CONFIG`), then a handful of
/// environment variables override individual values. A `.env` file is read
/// first so local overrides do not have to be exported by hand.
///
/// Every section is optional; a missing file means all defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::categories::CategoryLabels;
use crate::controls::ControlSettings;
use crate::ingest::results_csv::{ColumnNames, LoaderSettings};
use crate::logging::{self, Component, LogLevel};
use crate::model::DashboardError;

pub const DEFAULT_CONFIG_PATH: &str = "./rainfall_dashboard.toml";
pub const CONFIG_PATH_ENV: &str = "RAINFALL_DASHBOARD_CONFIG";

pub const DATA_PATH_ENV: &str = "RAINFALL_DATA_PATH";
pub const PREVIEW_ROWS_ENV: &str = "RAINFALL_PREVIEW_ROWS";
pub const FORECAST_DAYS_ENV: &str = "RAINFALL_FORECAST_DAYS";
pub const OUTPUT_DIR_ENV: &str = "RAINFALL_OUTPUT_DIR";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Results CSV. Relative paths resolve against the config file's directory.
    pub path: PathBuf,
    pub strict_categories: bool,
    pub columns: ColumnNames,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("hasil_prediksi_kategori_convlstm.csv"),
            strict_categories: false,
            columns: ColumnNames::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub export_file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("dashboard_output"),
            export_file_name: "hasil_prediksi_kategori_convlstm.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

impl LoggingConfig {
    pub fn min_level(&self) -> Result<LogLevel, DashboardError> {
        self.level.parse().map_err(DashboardError::Config)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data: DataConfig,
    pub labels: CategoryLabels,
    pub controls: ControlSettings,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl DashboardConfig {
    pub fn loader_settings(&self) -> LoaderSettings {
        LoaderSettings {
            columns: self.data.columns.clone(),
            labels: self.labels.clone(),
            strict_categories: self.data.strict_categories,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses a config document. Relative data paths resolve against `base_dir`.
pub fn parse_config(raw: &str, base_dir: &Path) -> Result<DashboardConfig, DashboardError> {
    let mut config: DashboardConfig =
        toml::from_str(raw).map_err(|e| DashboardError::Config(e.to_string()))?;

    if config.data.path.is_relative() {
        config.data.path = base_dir.join(&config.data.path);
    }
    config.logging.min_level()?;

    Ok(config)
}

/// Loads the config file at `path`, or the defaults if it does not exist.
pub fn load_config(path: &Path) -> Result<(DashboardConfig, ConfigSource), DashboardError> {
    if !path.exists() {
        return Ok((DashboardConfig::default(), ConfigSource::Defaults));
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| DashboardError::Config(format!("reading {}: {}", path.display(), e)))?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let config = parse_config(&raw, &base_dir)
        .map_err(|e| DashboardError::Config(format!("parsing {}: {}", path.display(), e)))?;

    Ok((config, ConfigSource::File(path.to_path_buf())))
}

/// Applies environment overrides through `lookup`, so tests can pass a map
/// instead of touching the process environment.
pub fn apply_env_overrides<F>(config: &mut DashboardConfig, lookup: F) -> Result<(), DashboardError>
where
    F: Fn(&str) -> Option<String>,
{
    let parse_count = |name: &str, raw: String| -> Result<usize, DashboardError> {
        raw.trim()
            .parse::<usize>()
            .map_err(|_| DashboardError::Config(format!("{} must be a whole number, got \"{}\"", name, raw)))
    };

    if let Some(path) = lookup(DATA_PATH_ENV) {
        config.data.path = PathBuf::from(path);
    }
    if let Some(raw) = lookup(PREVIEW_ROWS_ENV) {
        config.controls.preview_row_count = parse_count(PREVIEW_ROWS_ENV, raw)?;
    }
    if let Some(raw) = lookup(FORECAST_DAYS_ENV) {
        config.controls.forecast_horizon_days = parse_count(FORECAST_DAYS_ENV, raw)?;
    }
    if let Some(dir) = lookup(OUTPUT_DIR_ENV) {
        config.output.dir = PathBuf::from(dir);
    }

    Ok(())
}

/// Process-start entry point: `.env`, config file, then environment.
pub fn load_from_env() -> Result<(DashboardConfig, ConfigSource), DashboardError> {
    dotenv::dotenv().ok();

    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let (mut config, source) = load_config(Path::new(&path))?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;

    Ok((config, source))
}

/// Records the config source once the logger is up.
pub fn log_config_source(source: &ConfigSource) {
    match source {
        ConfigSource::File(path) => logging::info(
            Component::Config,
            Some(&path.display().to_string()),
            "Loaded dashboard configuration",
        ),
        ConfigSource::Defaults => logging::info(
            Component::Config,
            None,
            &format!("No config file found, using built-in defaults (looked for {})", DEFAULT_CONFIG_PATH),
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
