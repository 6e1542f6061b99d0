use planwise_core::DomainResult;

use super::{Forecaster, Projection};
use crate::model::ForecastMethod;
use crate::stats;

/// Flat forecast at the mean of the last `window` actuals.
///
/// Shorter histories use every observation available.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: usize,
}

impl MovingAverage {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }
}

impl Forecaster for MovingAverage {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::MovingAverage
    }

    fn min_observations(&self) -> usize {
        1
    }

    fn project(&self, demand: &[f64], periods_ahead: usize) -> DomainResult<Projection> {
        let recent = &demand[demand.len().saturating_sub(self.window)..];
        let level = stats::mean(recent)?;
        Ok(Projection {
            points: vec![level; periods_ahead],
            sigma: stats::spread(recent),
        })
    }
}
