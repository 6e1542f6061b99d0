use planwise_core::{DomainError, DomainResult};

use super::{Forecaster, Projection};
use crate::model::ForecastMethod;
use crate::stats;

/// Weighted mean of the most recent actuals, most recent first.
///
/// With fewer observations than weights, only the leading weights apply and
/// are renormalised.
#[derive(Debug, Clone)]
pub struct WeightedAverage {
    weights: Vec<f64>,
}

impl WeightedAverage {
    pub fn new(weights: Vec<f64>) -> Self {
        Self { weights }
    }
}

impl Forecaster for WeightedAverage {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::WeightedAverage
    }

    fn min_observations(&self) -> usize {
        1
    }

    fn project(&self, demand: &[f64], periods_ahead: usize) -> DomainResult<Projection> {
        let (weighted, total_weight) = demand
            .iter()
            .rev()
            .zip(&self.weights)
            .fold((0.0, 0.0), |(sum, wsum), (d, w)| (sum + d * w, wsum + w));

        if total_weight <= 0.0 {
            return Err(DomainError::invalid_parameter(
                "weights applied to the available history sum to zero",
            ));
        }

        Ok(Projection {
            points: vec![weighted / total_weight; periods_ahead],
            sigma: stats::spread(demand),
        })
    }
}
