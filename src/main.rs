//! Renders the rainfall dashboard once and writes its artifacts.
//!
//! Configuration: `./rainfall_dashboard.toml` (or `RAINFALL_DASHBOARD_CONFIG`),
//! with `RAINFALL_*` environment overrides. See `config`.

use std::error::Error;
use std::process::ExitCode;

use rainfall_dashboard::config::{self, ConfigSource, DashboardConfig};
use rainfall_dashboard::ingest::results_csv::ResultStore;
use rainfall_dashboard::logging::{self, Component};
use rainfall_dashboard::model::DashboardError;
use rainfall_dashboard::present::{self, PresentationSettings};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let (config, source) = config::load_from_env()?;
    start_logging(&config, &source)?;

    let store = ResultStore::new(&config.data.path, config.loader_settings());
    let controls = config.controls.applied();
    let settings = PresentationSettings {
        labels: config.labels.clone(),
        export_file_name: config.output.export_file_name.clone(),
        ..PresentationSettings::default()
    };

    let view = match present::render_pass(&store, &controls, &settings) {
        Ok(view) => view,
        Err(DashboardError::Load(err)) => {
            logging::log_load_failure(&store.path().display().to_string(), &err);
            return Err(Box::new(DashboardError::Load(err)));
        }
        Err(other) => {
            logging::error(Component::System, None, &other.to_string());
            return Err(Box::new(other));
        }
    };

    present::write_artifacts(&view, &config.output.dir)?;
    present::print_summary(&view);

    Ok(())
}

fn start_logging(config: &DashboardConfig, source: &ConfigSource) -> Result<(), DashboardError> {
    logging::init_logger(
        config.logging.min_level()?,
        config.logging.file.as_deref(),
        config.logging.timestamps,
    );
    config::log_config_source(source);
    Ok(())
}
