//! Trend direction of a demand history.

use crate::model::Trend;
use crate::pattern;

/// Relative change between half-series means that counts as a direction.
pub const TREND_CHANGE_THRESHOLD: f64 = 0.10;

/// Compare the mean of the first half with the mean of the second half.
///
/// A change beyond ±10% sets the direction; otherwise a seasonal series is
/// `Seasonal` and anything else `Stable`. The second half takes the middle
/// observation of an odd-length series.
pub fn detect(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::Stable;
    }

    let (first, second) = values.split_at(values.len() / 2);
    let first_mean = first.iter().sum::<f64>() / first.len() as f64;
    let second_mean = second.iter().sum::<f64>() / second.len() as f64;

    let change = if first_mean > 0.0 {
        (second_mean - first_mean) / first_mean
    } else if second_mean > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    if change > TREND_CHANGE_THRESHOLD {
        Trend::Increasing
    } else if change < -TREND_CHANGE_THRESHOLD {
        Trend::Decreasing
    } else if pattern::is_seasonal(values) {
        Trend::Seasonal
    } else {
        Trend::Stable
    }
}
