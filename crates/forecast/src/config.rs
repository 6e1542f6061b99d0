//! Engine configuration.
//!
//! Defaults match the documented method tuning. Hosts may override them from
//! the environment (`PLANWISE_FORECAST_*`) or deserialize a config section.

use core::str::FromStr;
use std::thread;

use serde::{Deserialize, Serialize};

use planwise_core::{DomainError, DomainResult, Granularity};

use crate::methods::horizon_limit;
use crate::model::{ForecastMethod, ForecastParameters, SEASON_LENGTH};

pub const ENV_PERIODS: &str = "PLANWISE_FORECAST_PERIODS";
pub const ENV_MAX_PERIODS: &str = "PLANWISE_FORECAST_MAX_PERIODS";
pub const ENV_ALPHA: &str = "PLANWISE_FORECAST_ALPHA";
pub const ENV_WINDOW: &str = "PLANWISE_FORECAST_WINDOW";
pub const ENV_WORKERS: &str = "PLANWISE_FORECAST_WORKERS";
pub const ENV_RECORD: &str = "PLANWISE_FORECAST_RECORD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub default_periods_ahead: usize,
    pub max_periods_ahead: usize,
    pub smoothing_alpha: f64,
    pub moving_average_window: usize,
    pub weights: Vec<f64>,
    /// Upper bound on worker threads for multi-item forecasts.
    pub batch_workers: usize,
    /// Pass generated forecasts to the injected sink.
    pub record_forecasts: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_periods_ahead: 6,
            max_periods_ahead: 60,
            smoothing_alpha: 0.3,
            moving_average_window: 3,
            weights: vec![0.5, 0.3, 0.2],
            batch_workers: thread::available_parallelism().map(|n| n.get()).unwrap_or(4),
            record_forecasts: true,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `PLANWISE_FORECAST_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns per variable name.
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            default_periods_ahead: override_or(&lookup, ENV_PERIODS, defaults.default_periods_ahead),
            max_periods_ahead: override_or(&lookup, ENV_MAX_PERIODS, defaults.max_periods_ahead),
            smoothing_alpha: override_or(&lookup, ENV_ALPHA, defaults.smoothing_alpha),
            moving_average_window: override_or(&lookup, ENV_WINDOW, defaults.moving_average_window),
            weights: defaults.weights,
            batch_workers: override_or(&lookup, ENV_WORKERS, defaults.batch_workers),
            record_forecasts: override_or(&lookup, ENV_RECORD, defaults.record_forecasts),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.max_periods_ahead == 0 {
            return Err(DomainError::invalid_parameter("max_periods_ahead must be >= 1"));
        }
        if self.default_periods_ahead == 0 || self.default_periods_ahead > self.max_periods_ahead {
            return Err(DomainError::invalid_parameter(format!(
                "default_periods_ahead must be in 1..={}",
                self.max_periods_ahead
            )));
        }
        // The default horizon must suit whichever method gets recommended.
        let shortest = ForecastMethod::ALL.into_iter().map(horizon_limit).min().unwrap_or(0);
        if self.default_periods_ahead > shortest {
            return Err(DomainError::invalid_parameter(format!(
                "default_periods_ahead must be <= {shortest}, the shortest method horizon"
            )));
        }
        if self.batch_workers == 0 {
            return Err(DomainError::invalid_parameter("batch_workers must be >= 1"));
        }
        // Method tuning is checked by the parameter object it feeds.
        self.parameters(ForecastMethod::MovingAverage, self.default_periods_ahead, Granularity::Monthly)
            .validate()
    }

    /// Parameters for one forecast request.
    pub fn parameters(
        &self,
        method: ForecastMethod,
        periods_ahead: usize,
        granularity: Granularity,
    ) -> ForecastParameters {
        ForecastParameters {
            method,
            periods_ahead,
            granularity,
            smoothing_alpha: self.smoothing_alpha,
            window: self.moving_average_window,
            weights: self.weights.clone(),
            season_length: SEASON_LENGTH,
        }
    }
}

fn override_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring unparsable configuration value");
            default
        }),
    }
}
