//! Demand pattern classification and method recommendation.

use planwise_core::{DomainResult, ensure_observations};

use crate::history::DemandSeries;
use crate::model::{DemandPattern, ForecastMethod, PatternKind, PeriodDemand, SEASON_LENGTH};
use crate::stats;

/// Coefficient of variation below which demand counts as stable.
pub const STABLE_CV: f64 = 0.2;

/// Slope, as a share of mean demand per period, that counts as a trend.
pub const TREND_SLOPE_RATIO: f64 = 0.05;

/// Lag-4 autocorrelation above which demand counts as seasonal.
pub const SEASONALITY_THRESHOLD: f64 = 0.5;

/// Two full seasons are needed before seasonality is judged.
pub const MIN_SEASONALITY_OBSERVATIONS: usize = 2 * SEASON_LENGTH;

const EXTREME_PERIODS: usize = 3;

/// Lag-4 autocorrelation, or `None` when the series is too short to judge.
pub fn seasonality_strength(values: &[f64]) -> Option<f64> {
    if values.len() < MIN_SEASONALITY_OBSERVATIONS {
        return None;
    }
    stats::autocorrelation(values, SEASON_LENGTH).ok()
}

pub fn is_seasonal(values: &[f64]) -> bool {
    seasonality_strength(values).is_some_and(|acf| acf > SEASONALITY_THRESHOLD)
}

/// Classify the item's demand and recommend a method.
///
/// First match wins: a slope steeper than 5% of mean demand per period is a
/// trend; otherwise a coefficient of variation under 0.2 is stable; then
/// lag-4 seasonality; anything else is irregular.
pub fn analyze(series: &DemandSeries) -> DomainResult<DemandPattern> {
    let values = series.actuals();
    ensure_observations("demand pattern analysis", 2, values.len())?;

    let avg_demand = stats::mean(&values)?;
    let std_dev = stats::std_dev(&values)?;
    let coefficient_of_variation = if avg_demand > 0.0 { std_dev / avg_demand } else { 0.0 };
    let trend_slope = stats::linear_regression(&values)?.slope;
    let seasonality_strength = seasonality_strength(&values);

    let (pattern, recommended_method) = if trend_slope.abs() > TREND_SLOPE_RATIO * avg_demand {
        (PatternKind::Trend, ForecastMethod::LinearRegression)
    } else if coefficient_of_variation < STABLE_CV {
        (PatternKind::Stable, ForecastMethod::MovingAverage)
    } else if seasonality_strength.is_some_and(|acf| acf > SEASONALITY_THRESHOLD) {
        (PatternKind::Seasonal, ForecastMethod::Seasonal)
    } else {
        (PatternKind::Irregular, ForecastMethod::ExponentialSmoothing)
    };

    let (peak_periods, low_periods) = extremes(series);

    Ok(DemandPattern {
        item_id: series.item_id(),
        pattern,
        avg_demand,
        std_dev,
        coefficient_of_variation,
        trend_slope,
        seasonality_strength,
        peak_periods,
        low_periods,
        recommended_method,
    })
}

/// Highest and lowest demand periods; ties keep chronological order.
fn extremes(series: &DemandSeries) -> (Vec<PeriodDemand>, Vec<PeriodDemand>) {
    let mut ranked: Vec<PeriodDemand> = series
        .observations()
        .iter()
        .map(|o| PeriodDemand {
            period: o.period(),
            demand: o.actual_demand(),
        })
        .collect();

    ranked.sort_by(|a, b| b.demand.total_cmp(&a.demand));
    let peaks = ranked.iter().take(EXTREME_PERIODS).cloned().collect();

    ranked.sort_by(|a, b| a.demand.total_cmp(&b.demand));
    let lows = ranked.into_iter().take(EXTREME_PERIODS).collect();

    (peaks, lows)
}
