use planwise_core::DomainResult;

use super::{Forecaster, Projection};
use crate::model::ForecastMethod;
use crate::stats;

/// Simple exponential smoothing: `S0 = d0`, `Si = a·di + (1 - a)·S(i-1)`.
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    alpha: f64,
}

impl ExponentialSmoothing {
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }

    /// Final smoothed level over the whole series.
    pub fn level(&self, demand: &[f64]) -> Option<f64> {
        let (first, rest) = demand.split_first()?;
        Some(
            rest.iter()
                .fold(*first, |s, d| self.alpha * d + (1.0 - self.alpha) * s),
        )
    }
}

impl Forecaster for ExponentialSmoothing {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::ExponentialSmoothing
    }

    fn min_observations(&self) -> usize {
        2
    }

    fn project(&self, demand: &[f64], periods_ahead: usize) -> DomainResult<Projection> {
        let sigma = stats::std_dev(demand)?;
        let level = self.level(demand).unwrap_or_default();
        Ok(Projection {
            points: vec![level; periods_ahead],
            sigma,
        })
    }
}
