//! Historical demand series and the store contract that supplies them.
//!
//! The engine does not own storage. Hosts implement [`HistoricalSeriesStore`]
//! over their read model; [`InMemorySeriesStore`] serves tests and embedding.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use planwise_core::{DomainError, DomainResult, ItemId, Period, ValueObject};

/// One recorded period of demand.
///
/// Quantities are finite and non-negative however the value was built,
/// deserialized ones included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ObservationRecord")]
pub struct HistoricalObservation {
    period: Period,
    actual_demand: f64,
    /// Forecast that was recorded for this period before it was realised.
    forecasted_demand: Option<f64>,
}

/// Unchecked wire shape of [`HistoricalObservation`].
#[derive(Deserialize)]
struct ObservationRecord {
    period: Period,
    actual_demand: f64,
    #[serde(default)]
    forecasted_demand: Option<f64>,
}

impl TryFrom<ObservationRecord> for HistoricalObservation {
    type Error = DomainError;

    fn try_from(record: ObservationRecord) -> DomainResult<Self> {
        let observation = Self::new(record.period, record.actual_demand)?;
        match record.forecasted_demand {
            Some(forecast) => observation.with_forecast(forecast),
            None => Ok(observation),
        }
    }
}

impl ValueObject for HistoricalObservation {}

impl HistoricalObservation {
    pub fn new(period: Period, actual_demand: f64) -> DomainResult<Self> {
        ensure_quantity("actual_demand", actual_demand)?;
        Ok(Self {
            period,
            actual_demand,
            forecasted_demand: None,
        })
    }

    pub fn with_forecast(mut self, forecasted_demand: f64) -> DomainResult<Self> {
        ensure_quantity("forecasted_demand", forecasted_demand)?;
        self.forecasted_demand = Some(forecasted_demand);
        Ok(self)
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn actual_demand(&self) -> f64 {
        self.actual_demand
    }

    pub fn forecasted_demand(&self) -> Option<f64> {
        self.forecasted_demand
    }

    /// `(actual, forecast)` when a forecast was recorded for this period.
    pub fn paired(&self) -> Option<(f64, f64)> {
        self.forecasted_demand.map(|f| (self.actual_demand, f))
    }
}

fn ensure_quantity(field: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::invalid_parameter(format!(
            "{field} must be a finite non-negative number, got {value}"
        )));
    }
    Ok(())
}

/// Chronologically ordered demand history of one item.
///
/// Ordering is the supplier's responsibility; [`DemandSeries::push`] only
/// guards appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandSeries {
    item_id: ItemId,
    observations: Vec<HistoricalObservation>,
}

impl DemandSeries {
    pub fn new(item_id: ItemId, observations: Vec<HistoricalObservation>) -> Self {
        Self {
            item_id,
            observations,
        }
    }

    /// Build a monthly series of actuals starting at `start`.
    pub fn monthly(item_id: ItemId, start: Period, actuals: &[f64]) -> DomainResult<Self> {
        let mut series = Self::new(item_id, Vec::with_capacity(actuals.len()));
        for (offset, demand) in actuals.iter().enumerate() {
            let period = start.advance(planwise_core::Granularity::Monthly, offset as u32)?;
            series.push(HistoricalObservation::new(period, *demand)?)?;
        }
        Ok(series)
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn observations(&self) -> &[HistoricalObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn actuals(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.actual_demand).collect()
    }

    pub fn last_period(&self) -> Option<Period> {
        self.observations.last().map(|o| o.period)
    }

    /// Append an observation; its period must follow the last recorded one.
    pub fn push(&mut self, observation: HistoricalObservation) -> DomainResult<()> {
        if let Some(last) = self.last_period() {
            if observation.period <= last {
                return Err(DomainError::invalid_parameter(format!(
                    "period {} does not follow {last}",
                    observation.period
                )));
            }
        }
        self.observations.push(observation);
        Ok(())
    }
}

/// Supplies per-item demand history to the engine.
pub trait HistoricalSeriesStore: Send + Sync + 'static {
    /// `Ok(None)` when the item has no recorded history.
    fn load_series(&self, item_id: ItemId) -> DomainResult<Option<DemandSeries>>;
}

/// In-memory store for tests/dev.
///
/// Every write is a single map or vector operation, so a poisoned lock still
/// guards a consistent map; all accessors recover it rather than fail.
#[derive(Debug, Default)]
pub struct InMemorySeriesStore {
    inner: RwLock<HashMap<ItemId, DemandSeries>>,
}

impl InMemorySeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the item's series.
    pub fn insert(&self, series: DemandSeries) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(series.item_id(), series);
    }

    /// Append one observation, creating the series on first use.
    pub fn record(&self, item_id: ItemId, observation: HistoricalObservation) -> DomainResult<()> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.entry(item_id)
            .or_insert_with(|| DemandSeries::new(item_id, Vec::new()))
            .push(observation)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistoricalSeriesStore for InMemorySeriesStore {
    fn load_series(&self, item_id: ItemId) -> DomainResult<Option<DemandSeries>> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(map.get(&item_id).cloned())
    }
}
