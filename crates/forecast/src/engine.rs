//! Forecast orchestrator.
//!
//! Loads an item's history from the injected store, picks a method (explicit
//! or recommended), runs it, classifies the trend and assembles a
//! [`DemandForecast`]. The engine performs no I/O of its own beyond the store
//! call and keeps no state apart from the optional caller-owned sink.

use std::sync::Arc;
use std::thread;

use chrono::Utc;
use tracing::{debug, warn};

use planwise_core::{DomainError, DomainResult, ForecastId, Granularity, ItemId};

use crate::accuracy;
use crate::config::EngineConfig;
use crate::history::{DemandSeries, HistoricalSeriesStore};
use crate::log::ForecastSink;
use crate::methods::forecaster_for;
use crate::model::{DemandForecast, DemandPattern, ForecastAccuracy, MethodChoice};
use crate::pattern;
use crate::trend;

/// One forecast request.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub item_id: ItemId,
    pub method: MethodChoice,
    /// `None` uses the configured default horizon.
    pub periods_ahead: Option<usize>,
    pub granularity: Granularity,
}

impl ForecastRequest {
    pub fn new(item_id: ItemId) -> Self {
        Self {
            item_id,
            method: MethodChoice::Recommended,
            periods_ahead: None,
            granularity: Granularity::Monthly,
        }
    }

    pub fn with_method(mut self, method: impl Into<MethodChoice>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_periods_ahead(mut self, periods_ahead: usize) -> Self {
        self.periods_ahead = Some(periods_ahead);
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }
}

pub struct DemandForecastEngine<S: HistoricalSeriesStore> {
    store: Arc<S>,
    config: EngineConfig,
    sink: Option<Arc<dyn ForecastSink>>,
}

impl<S: HistoricalSeriesStore> DemandForecastEngine<S> {
    pub fn new(store: Arc<S>, config: EngineConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            sink: None,
        })
    }

    /// Forward every generated forecast to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn ForecastSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate a multi-period forecast for one item.
    pub fn generate_forecast(&self, request: &ForecastRequest) -> DomainResult<DemandForecast> {
        let periods_ahead = request
            .periods_ahead
            .unwrap_or(self.config.default_periods_ahead);
        if periods_ahead == 0 || periods_ahead > self.config.max_periods_ahead {
            return Err(DomainError::invalid_parameter(format!(
                "periods_ahead must be in 1..={}, got {periods_ahead}",
                self.config.max_periods_ahead
            )));
        }

        let series = self.load(request.item_id)?;
        let actuals = series.actuals();

        let method = match request.method {
            MethodChoice::Explicit(method) => method,
            MethodChoice::Recommended => pattern::analyze(&series)?.recommended_method,
        };

        let parameters = self
            .config
            .parameters(method, periods_ahead, request.granularity);
        parameters.validate()?;

        let labels = period_labels(&series, periods_ahead, request.granularity)?;
        let periods = forecaster_for(&parameters).forecast(&actuals, &labels)?;
        let total_forecast: f64 = periods.iter().map(|p| p.forecast).sum();
        let trend = trend::detect(&actuals);

        let forecast = DemandForecast {
            id: ForecastId::new(),
            item_id: request.item_id,
            method,
            periods,
            total_forecast,
            confidence: method.base_confidence(),
            trend,
            generated_at: Utc::now(),
            parameters,
        };

        debug!(
            item = %forecast.item_id,
            method = %method,
            trend = %trend,
            periods = periods_ahead,
            total = total_forecast,
            "generated demand forecast"
        );

        if self.config.record_forecasts {
            if let Some(sink) = &self.sink {
                sink.record(&forecast);
            }
        }

        Ok(forecast)
    }

    /// Classify the item's demand pattern.
    pub fn analyze_demand_pattern(&self, item_id: ItemId) -> DomainResult<DemandPattern> {
        pattern::analyze(&self.load(item_id)?)
    }

    /// Evaluate previously recorded forecasts against realised demand.
    pub fn calculate_forecast_accuracy(&self, item_id: ItemId) -> DomainResult<ForecastAccuracy> {
        accuracy::evaluate(&self.load(item_id)?)
    }

    /// Forecast several items independently.
    ///
    /// Items that fail (unknown, too short) are logged and left out. The
    /// result keeps the relative order of `item_ids`.
    pub fn get_multi_item_forecast(
        &self,
        item_ids: &[ItemId],
        method: MethodChoice,
        periods_ahead: usize,
    ) -> Vec<DemandForecast> {
        if item_ids.is_empty() {
            return Vec::new();
        }

        let workers = self.config.batch_workers.clamp(1, item_ids.len());
        let chunk_size = item_ids.len().div_ceil(workers);

        let slots: Vec<Option<DemandForecast>> = thread::scope(|scope| {
            let handles: Vec<_> = item_ids
                .chunks(chunk_size)
                .map(|chunk| {
                    let handle = scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|item_id| self.forecast_or_skip(*item_id, method, periods_ahead))
                            .collect::<Vec<_>>()
                    });
                    (chunk.len(), handle)
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|(len, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        warn!(items = len, "multi-item forecast worker panicked; skipping its items");
                        vec![None; len]
                    })
                })
                .collect()
        });

        slots.into_iter().flatten().collect()
    }

    fn forecast_or_skip(
        &self,
        item_id: ItemId,
        method: MethodChoice,
        periods_ahead: usize,
    ) -> Option<DemandForecast> {
        let request = ForecastRequest::new(item_id)
            .with_method(method)
            .with_periods_ahead(periods_ahead);
        match self.generate_forecast(&request) {
            Ok(forecast) => Some(forecast),
            Err(e) => {
                warn!(
                    item = %item_id,
                    error = %e,
                    data_error = e.is_data_error(),
                    "skipping item in multi-item forecast"
                );
                None
            }
        }
    }

    fn load(&self, item_id: ItemId) -> DomainResult<DemandSeries> {
        match self.store.load_series(item_id)? {
            Some(series) if !series.is_empty() => Ok(series),
            _ => Err(DomainError::not_found(item_id)),
        }
    }
}

fn period_labels(
    series: &DemandSeries,
    periods_ahead: usize,
    granularity: Granularity,
) -> DomainResult<Vec<String>> {
    let last = series
        .last_period()
        .ok_or_else(|| DomainError::not_found(series.item_id()))?;
    (1..=periods_ahead)
        .map(|step| {
            let step = u32::try_from(step)
                .map_err(|_| DomainError::invalid_parameter("periods_ahead too large"))?;
            Ok(last.advance(granularity, step)?.label(granularity))
        })
        .collect()
}
