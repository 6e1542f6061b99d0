use planwise_core::{DomainResult, ensure_observations};

use super::{Forecaster, Projection};
use crate::model::ForecastMethod;
use crate::stats;

/// Scales the series mean by a per-season index.
#[derive(Debug, Clone)]
pub struct Seasonal {
    season_length: usize,
}

impl Seasonal {
    pub fn new(season_length: usize) -> Self {
        Self {
            season_length: season_length.max(1),
        }
    }
}

/// Seasonal index per position `s` in `0..season_length`:
/// mean of the actuals at positions `≡ s (mod season_length)` over the series mean.
///
/// An all-zero series has no seasonal shape; every index is 1.
pub fn seasonal_indices(values: &[f64], season_length: usize) -> DomainResult<Vec<f64>> {
    ensure_observations("seasonal index", season_length.max(1), values.len())?;
    let overall = stats::mean(values)?;

    (0..season_length)
        .map(|s| {
            if overall <= 0.0 {
                return Ok(1.0);
            }
            let in_season: Vec<f64> = values.iter().skip(s).step_by(season_length).copied().collect();
            Ok(stats::mean(&in_season)? / overall)
        })
        .collect()
}

impl Forecaster for Seasonal {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::Seasonal
    }

    fn min_observations(&self) -> usize {
        self.season_length
    }

    fn project(&self, demand: &[f64], periods_ahead: usize) -> DomainResult<Projection> {
        let indices = seasonal_indices(demand, self.season_length)?;
        let overall = stats::mean(demand)?;
        let n = demand.len();

        let points = (0..periods_ahead)
            .map(|h| overall * indices[(n + h) % self.season_length])
            .collect();

        Ok(Projection {
            points,
            sigma: stats::spread(demand),
        })
    }
}
