//! Forecast accuracy against realised demand.

use planwise_core::{DomainResult, ensure_observations};

use crate::history::DemandSeries;
use crate::model::ForecastAccuracy;

/// Evaluate the forecasts recorded in `series` against its actuals.
///
/// Only periods carrying both values count. Error is `actual - forecast`.
/// Periods with zero actual demand are left out of MAPE (a percentage of
/// nothing is undefined) but still count for MAE, RMSE and bias.
pub fn evaluate(series: &DemandSeries) -> DomainResult<ForecastAccuracy> {
    let pairs: Vec<(f64, f64)> = series
        .observations()
        .iter()
        .filter_map(|o| o.paired())
        .collect();
    ensure_observations("forecast accuracy", 1, pairs.len())?;

    let n = pairs.len() as f64;
    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    let mut signed_sum = 0.0;
    let mut pct_sum = 0.0;
    let mut mape_periods = 0usize;

    for (actual, forecast) in &pairs {
        let error = actual - forecast;
        abs_sum += error.abs();
        sq_sum += error * error;
        signed_sum += error;
        if *actual > 0.0 {
            pct_sum += error.abs() / actual * 100.0;
            mape_periods += 1;
        }
    }

    let mae = abs_sum / n;
    let bias = signed_sum / n;
    let mape = if mape_periods > 0 {
        pct_sum / mape_periods as f64
    } else {
        0.0
    };

    Ok(ForecastAccuracy {
        item_id: series.item_id(),
        mape,
        mae,
        rmse: (sq_sum / n).sqrt(),
        bias,
        tracking_signal: if mae > 0.0 { bias / mae } else { 0.0 },
        accuracy_percent: (100.0 - mape).max(0.0),
        periods_analyzed: pairs.len(),
        mape_periods,
    })
}
