//! `planwise-forecast`
//!
//! **Responsibility:** demand forecasting and forecast-accuracy analysis for
//! production planning.
//!
//! - Pure computation over pre-aggregated per-item demand history.
//! - History comes from a [`HistoricalSeriesStore`]; the engine owns no storage.
//! - Generated forecasts may be handed to a caller-owned [`ForecastSink`].

pub mod accuracy;
pub mod config;
pub mod engine;
pub mod history;
pub mod log;
pub mod methods;
pub mod model;
pub mod pattern;
pub mod stats;
pub mod trend;

pub use config::EngineConfig;
pub use engine::{DemandForecastEngine, ForecastRequest};
pub use history::{DemandSeries, HistoricalObservation, HistoricalSeriesStore, InMemorySeriesStore};
pub use log::{ForecastLog, ForecastSink, ForecastSummary};
pub use methods::{Forecaster, seasonal_indices};
pub use model::{
    DemandForecast, DemandPattern, ForecastAccuracy, ForecastMethod, ForecastParameters,
    ForecastPeriodData, MethodChoice, PatternKind, PeriodDemand, Trend,
};
