//! Forecast log and summary reporting.
//!
//! The log is owned by the caller and injected into the engine; it is a
//! reporting aid, not the system of record for forecasts.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::model::{DemandForecast, ForecastMethod, Trend};

/// Receives every forecast the engine generates.
pub trait ForecastSink: Send + Sync + 'static {
    fn record(&self, forecast: &DemandForecast);
}

/// Aggregate view over generated forecasts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub total_forecasts: usize,
    pub by_method: BTreeMap<ForecastMethod, usize>,
    pub avg_confidence: f64,
    pub trend_distribution: BTreeMap<Trend, usize>,
}

impl ForecastSummary {
    pub fn from_forecasts(forecasts: &[DemandForecast]) -> Self {
        let mut summary = ForecastSummary {
            total_forecasts: forecasts.len(),
            ..ForecastSummary::default()
        };
        if forecasts.is_empty() {
            return summary;
        }

        let mut confidence_sum = 0.0;
        for f in forecasts {
            *summary.by_method.entry(f.method).or_default() += 1;
            *summary.trend_distribution.entry(f.trend).or_default() += 1;
            confidence_sum += f.confidence;
        }
        summary.avg_confidence = confidence_sum / forecasts.len() as f64;
        summary
    }
}

/// Append-only, mutex-guarded forecast log.
#[derive(Debug, Default)]
pub struct ForecastLog {
    inner: Mutex<Vec<DemandForecast>>,
}

impl ForecastLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded forecast, oldest first.
    pub fn all(&self) -> Vec<DemandForecast> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn summary(&self) -> ForecastSummary {
        let forecasts = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        ForecastSummary::from_forecasts(&forecasts)
    }
}

impl ForecastSink for ForecastLog {
    fn record(&self, forecast: &DemandForecast) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(forecast.clone());
    }
}
