//! Forecast method library.
//!
//! Every method maps the historical actuals to a [`Projection`]: unrounded
//! point forecasts plus the dispersion used for the prediction interval.
//! [`Forecaster::forecast`] turns that into per-period estimates with the
//! shared rounding, clamping and confidence-decay rules.

mod exponential_smoothing;
mod linear_regression;
mod moving_average;
mod seasonal;
mod weighted_average;

pub use exponential_smoothing::ExponentialSmoothing;
pub use linear_regression::LinearRegression;
pub use moving_average::MovingAverage;
pub use seasonal::{Seasonal, seasonal_indices};
pub use weighted_average::WeightedAverage;

use planwise_core::{DomainError, DomainResult, ensure_observations};

use crate::model::{ForecastMethod, ForecastParameters, ForecastPeriodData};

/// Confidence lost per period ahead.
pub const CONFIDENCE_DECAY: f64 = 0.02;

/// Two-sided 95% normal quantile.
pub const Z_95: f64 = 1.96;

/// Unrounded method output.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub points: Vec<f64>,
    /// Standard deviation the interval is built from.
    pub sigma: f64,
}

/// A forecasting algorithm.
///
/// Implementations must be deterministic: the same history and horizon
/// always yield the same projection.
pub trait Forecaster: Send + Sync {
    fn method(&self) -> ForecastMethod;

    /// Shortest history the method accepts.
    fn min_observations(&self) -> usize;

    /// Project `periods_ahead` future values from `demand`.
    fn project(&self, demand: &[f64], periods_ahead: usize) -> DomainResult<Projection>;

    /// Forecast one period per label.
    fn forecast(&self, demand: &[f64], labels: &[String]) -> DomainResult<Vec<ForecastPeriodData>> {
        let method = self.method();
        ensure_observations(method.as_str(), self.min_observations(), demand.len())?;
        let limit = horizon_limit(method);
        if labels.len() > limit {
            return Err(DomainError::invalid_parameter(format!(
                "{method} supports at most {limit} periods ahead, got {}",
                labels.len()
            )));
        }
        let projection = self.project(demand, labels.len())?;
        Ok(assemble(method.base_confidence(), labels, &projection))
    }
}

/// Build the forecaster configured by `params`.
pub fn forecaster_for(params: &ForecastParameters) -> Box<dyn Forecaster> {
    match params.method {
        ForecastMethod::MovingAverage => Box::new(MovingAverage::new(params.window)),
        ForecastMethod::ExponentialSmoothing => {
            Box::new(ExponentialSmoothing::new(params.smoothing_alpha))
        }
        ForecastMethod::LinearRegression => Box::new(LinearRegression),
        ForecastMethod::WeightedAverage => Box::new(WeightedAverage::new(params.weights.clone())),
        ForecastMethod::Seasonal => Box::new(Seasonal::new(params.season_length)),
    }
}

/// Confidence for the period `periods_out` steps past the first.
pub fn decayed_confidence(base: f64, periods_out: usize) -> f64 {
    base - CONFIDENCE_DECAY * periods_out as f64
}

/// Longest horizon `method` forecasts while every period keeps a positive
/// confidence.
pub fn horizon_limit(method: ForecastMethod) -> usize {
    // Tolerance keeps an exact quotient (0.80 / 0.02) from rounding up.
    (method.base_confidence() / CONFIDENCE_DECAY - 1e-9).ceil() as usize
}

fn assemble(base_confidence: f64, labels: &[String], projection: &Projection) -> Vec<ForecastPeriodData> {
    let band = Z_95 * projection.sigma;
    labels
        .iter()
        .zip(&projection.points)
        .enumerate()
        .map(|(i, (label, point))| {
            // Demand cannot be negative.
            let point = point.max(0.0);
            ForecastPeriodData {
                period: label.clone(),
                forecast: point.round(),
                lower_bound: (point - band).round().max(0.0),
                upper_bound: (point + band).round(),
                confidence: decayed_confidence(base_confidence, i),
            }
        })
        .collect()
}
