/// User-adjustable display controls.
///
/// Two integers parameterize every render pass: how many rows of the raw
/// table to preview and how many days of the forecast slice to show. Values
/// coming from configuration or the environment are clamped here, at the
/// boundary, before they reach the aggregator.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::logging::{self, Component};
use crate::model::{MAX_FORECAST_HORIZON, MIN_FORECAST_HORIZON};

pub const PREVIEW_ROWS_RANGE: RangeInclusive<usize> = 5..=200;
pub const DEFAULT_PREVIEW_ROWS: usize = 30;

pub const FORECAST_DAYS_RANGE: RangeInclusive<usize> = MIN_FORECAST_HORIZON..=MAX_FORECAST_HORIZON;
pub const DEFAULT_FORECAST_DAYS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub preview_row_count: usize,
    pub forecast_horizon_days: usize,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            preview_row_count: DEFAULT_PREVIEW_ROWS,
            forecast_horizon_days: DEFAULT_FORECAST_DAYS,
        }
    }
}

impl ControlSettings {
    pub fn is_within_range(&self) -> bool {
        PREVIEW_ROWS_RANGE.contains(&self.preview_row_count)
            && FORECAST_DAYS_RANGE.contains(&self.forecast_horizon_days)
    }

    /// Both values pulled into their slider ranges.
    pub fn clamped(&self) -> Self {
        Self {
            preview_row_count: clamp_to(self.preview_row_count, &PREVIEW_ROWS_RANGE),
            forecast_horizon_days: clamp_to(self.forecast_horizon_days, &FORECAST_DAYS_RANGE),
        }
    }

    /// Like `clamped`, but logs each value that had to move.
    pub fn applied(&self) -> Self {
        if self.is_within_range() {
            return *self;
        }

        let applied = self.clamped();
        if applied.preview_row_count != self.preview_row_count {
            logging::warn(
                Component::Config,
                Some("preview_row_count"),
                &format!(
                    "Requested {} is outside {}..={}, using {}",
                    self.preview_row_count,
                    PREVIEW_ROWS_RANGE.start(),
                    PREVIEW_ROWS_RANGE.end(),
                    applied.preview_row_count
                ),
            );
        }
        if applied.forecast_horizon_days != self.forecast_horizon_days {
            logging::warn(
                Component::Config,
                Some("forecast_horizon_days"),
                &format!(
                    "Requested {} is outside {}..={}, using {}",
                    self.forecast_horizon_days,
                    FORECAST_DAYS_RANGE.start(),
                    FORECAST_DAYS_RANGE.end(),
                    applied.forecast_horizon_days
                ),
            );
        }
        applied
    }
}

fn clamp_to(value: usize, range: &RangeInclusive<usize>) -> usize {
    value.clamp(*range.start(), *range.end())
}
