use planwise_core::DomainResult;

use super::{Forecaster, Projection};
use crate::model::ForecastMethod;
use crate::stats;

/// Extrapolates the OLS line fitted over index positions.
#[derive(Debug, Clone, Copy)]
pub struct LinearRegression;

impl Forecaster for LinearRegression {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::LinearRegression
    }

    fn min_observations(&self) -> usize {
        2
    }

    fn project(&self, demand: &[f64], periods_ahead: usize) -> DomainResult<Projection> {
        let fit = stats::linear_regression(demand)?;
        let n = demand.len();

        let residuals: Vec<f64> = demand
            .iter()
            .enumerate()
            .map(|(i, y)| y - fit.at(i as f64))
            .collect();

        let points = (0..periods_ahead)
            .map(|h| fit.at((n + h) as f64).max(0.0))
            .collect();

        Ok(Projection {
            points,
            sigma: stats::std_dev(&residuals)?,
        })
    }
}
