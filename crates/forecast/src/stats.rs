//! Descriptive statistics shared by the forecast methods and the analyzers.
//!
//! All functions are pure. Standard deviation is the population form
//! (divide by N), matching the interval construction `forecast ± 1.96·σ`.

use serde::{Deserialize, Serialize};

use planwise_core::{DomainResult, ensure_observations};

/// Ordinary least squares fit over index positions `0..N-1`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fitted value at index position `x`.
    pub fn at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

pub fn mean(values: &[f64]) -> DomainResult<f64> {
    ensure_observations("mean", 1, values.len())?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> DomainResult<f64> {
    ensure_observations("standard deviation", 2, values.len())?;
    let m = mean(values)?;
    let var = values
        .iter()
        .map(|x| {
            let d = x - m;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64;
    Ok(var.sqrt())
}

pub fn linear_regression(values: &[f64]) -> DomainResult<LinearFit> {
    ensure_observations("linear regression", 2, values.len())?;

    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = mean(values)?;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }

    // n >= 2 keeps sxx > 0.
    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}

/// Autocorrelation of the mean-centred series at `lag`.
///
/// A constant series has no variance to correlate and yields 0.
pub fn autocorrelation(values: &[f64], lag: usize) -> DomainResult<f64> {
    ensure_observations("autocorrelation", lag + 1, values.len())?;

    let m = mean(values)?;
    let denominator: f64 = values.iter().map(|x| (x - m) * (x - m)).sum();
    if denominator <= f64::EPSILON {
        return Ok(0.0);
    }

    let numerator: f64 = (lag..values.len())
        .map(|t| (values[t] - m) * (values[t - lag] - m))
        .sum();
    Ok(numerator / denominator)
}

/// Dispersion used for prediction intervals.
///
/// Unlike [`std_dev`] this is total: a single observation shows no spread.
pub(crate) fn spread(values: &[f64]) -> f64 {
    std_dev(values).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use planwise_core::DomainError;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn std_dev_divides_by_n() {
        // Deviations 2,-2 around mean 4 -> variance 4.
        assert!(approx(std_dev(&[2.0, 6.0]).unwrap(), 2.0));
        assert!(approx(std_dev(&[5.0, 5.0, 5.0]).unwrap(), 0.0));
    }

    #[test]
    fn std_dev_rejects_single_value() {
        assert!(matches!(
            std_dev(&[3.0]),
            Err(DomainError::InsufficientData { required: 2, available: 1, .. })
        ));
        assert!(approx(spread(&[3.0]), 0.0));
    }

    #[test]
    fn mean_rejects_empty_input() {
        assert!(mean(&[]).is_err());
        assert!(approx(mean(&[1.0, 2.0, 6.0]).unwrap(), 3.0));
    }

    #[test]
    fn regression_recovers_exact_line() {
        let fit = linear_regression(&[10.0, 20.0, 30.0, 40.0]).unwrap();
        assert!(approx(fit.slope, 10.0));
        assert!(approx(fit.intercept, 10.0));
        assert!(approx(fit.at(4.0), 50.0));
    }

    #[test]
    fn regression_needs_two_points() {
        assert!(linear_regression(&[7.0]).is_err());
        let fit = linear_regression(&[7.0, 7.0]).unwrap();
        assert!(approx(fit.slope, 0.0));
        assert!(approx(fit.intercept, 7.0));
    }

    #[test]
    fn autocorrelation_detects_period_four() {
        let series: Vec<f64> = [600.0, 400.0, 650.0, 350.0]
            .iter()
            .cycle()
            .take(16)
            .copied()
            .collect();
        // 12 matching lag-4 products over 16 squared deviations.
        assert!(approx(autocorrelation(&series, 4).unwrap(), 0.75));
    }

    #[test]
    fn autocorrelation_of_constant_series_is_zero() {
        assert!(approx(autocorrelation(&[4.0; 10], 4).unwrap(), 0.0));
    }

    #[test]
    fn autocorrelation_lag_must_fit_series() {
        assert!(autocorrelation(&[1.0, 2.0, 3.0, 4.0], 4).is_err());
    }
}
