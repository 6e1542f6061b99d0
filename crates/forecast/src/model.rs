//! Forecast value objects: methods, parameters and results.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use planwise_core::{DomainError, DomainResult, ForecastId, Granularity, ItemId, Period, ValueObject};

/// Supported forecasting algorithms.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    MovingAverage,
    ExponentialSmoothing,
    LinearRegression,
    WeightedAverage,
    Seasonal,
}

impl ForecastMethod {
    pub const ALL: [ForecastMethod; 5] = [
        ForecastMethod::MovingAverage,
        ForecastMethod::ExponentialSmoothing,
        ForecastMethod::LinearRegression,
        ForecastMethod::WeightedAverage,
        ForecastMethod::Seasonal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMethod::MovingAverage => "moving_average",
            ForecastMethod::ExponentialSmoothing => "exponential_smoothing",
            ForecastMethod::LinearRegression => "linear_regression",
            ForecastMethod::WeightedAverage => "weighted_average",
            ForecastMethod::Seasonal => "seasonal",
        }
    }

    /// Confidence reported for the first forecast period.
    pub fn base_confidence(&self) -> f64 {
        match self {
            ForecastMethod::MovingAverage => 0.75,
            ForecastMethod::ExponentialSmoothing => 0.80,
            ForecastMethod::LinearRegression => 0.85,
            ForecastMethod::WeightedAverage => 0.78,
            ForecastMethod::Seasonal => 0.82,
        }
    }
}

impl core::fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastMethod {
    type Err = DomainError;

    /// Accepts snake_case or kebab-case names. Unknown names are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ForecastMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| DomainError::invalid_parameter(format!("unknown forecast method '{s}'")))
    }
}

/// How the orchestrator picks a method.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "method")]
pub enum MethodChoice {
    Explicit(ForecastMethod),
    /// Use the pattern analyzer's recommendation.
    #[default]
    Recommended,
}

impl From<ForecastMethod> for MethodChoice {
    fn from(method: ForecastMethod) -> Self {
        MethodChoice::Explicit(method)
    }
}

/// Parameters a forecast was produced with. Echoed on every [`DemandForecast`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastParameters {
    pub method: ForecastMethod,
    pub periods_ahead: usize,
    pub granularity: Granularity,
    /// Exponential smoothing factor (alpha).
    pub smoothing_alpha: f64,
    /// Moving average window.
    pub window: usize,
    /// Weighted average weights, most recent observation first.
    pub weights: Vec<f64>,
    pub season_length: usize,
}

impl ValueObject for ForecastParameters {}

/// Season length used by the seasonal method and seasonality detection.
pub const SEASON_LENGTH: usize = 4;

impl ForecastParameters {
    pub fn new(method: ForecastMethod, periods_ahead: usize) -> Self {
        Self {
            method,
            periods_ahead,
            granularity: Granularity::Monthly,
            smoothing_alpha: 0.3,
            window: 3,
            weights: vec![0.5, 0.3, 0.2],
            season_length: SEASON_LENGTH,
        }
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_smoothing_alpha(mut self, alpha: f64) -> Self {
        self.smoothing_alpha = alpha;
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = weights;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.periods_ahead == 0 {
            return Err(DomainError::invalid_parameter("periods_ahead must be >= 1"));
        }
        if !(self.smoothing_alpha.is_finite() && self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(DomainError::invalid_parameter("smoothing_alpha must be in (0, 1]"));
        }
        if self.window == 0 {
            return Err(DomainError::invalid_parameter("window must be >= 1"));
        }
        if self.weights.is_empty() || self.weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(DomainError::invalid_parameter(
                "weights must be a non-empty list of non-negative numbers",
            ));
        }
        if self.weights.iter().sum::<f64>() <= 0.0 {
            return Err(DomainError::invalid_parameter("weights must not all be zero"));
        }
        if self.season_length < 2 {
            return Err(DomainError::invalid_parameter("season_length must be >= 2"));
        }
        Ok(())
    }
}

/// One forecasted period.
///
/// Invariant: `lower_bound <= forecast <= upper_bound`, all non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPeriodData {
    pub period: String,
    pub forecast: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub confidence: f64,
}

impl ValueObject for ForecastPeriodData {}

/// Direction of demand over the history.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
    Seasonal,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
            Trend::Seasonal => "seasonal",
        }
    }
}

impl core::fmt::Display for Trend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated multi-period forecast for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandForecast {
    pub id: ForecastId,
    pub item_id: ItemId,
    pub method: ForecastMethod,
    pub periods: Vec<ForecastPeriodData>,
    pub total_forecast: f64,
    /// Base confidence of the method used.
    pub confidence: f64,
    pub trend: Trend,
    pub generated_at: DateTime<Utc>,
    pub parameters: ForecastParameters,
}

/// Demand pattern classification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Stable,
    Trend,
    Seasonal,
    Irregular,
}

/// A historical period with its realised demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodDemand {
    pub period: Period,
    pub demand: f64,
}

/// Per-item demand profile derived from the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPattern {
    pub item_id: ItemId,
    pub pattern: PatternKind,
    pub avg_demand: f64,
    pub std_dev: f64,
    pub coefficient_of_variation: f64,
    /// OLS slope of demand per period.
    pub trend_slope: f64,
    /// Lag-4 autocorrelation; `None` when the history is too short to judge.
    pub seasonality_strength: Option<f64>,
    pub peak_periods: Vec<PeriodDemand>,
    pub low_periods: Vec<PeriodDemand>,
    pub recommended_method: ForecastMethod,
}

impl ValueObject for DemandPattern {}

/// Error metrics of previously recorded forecasts against realised demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastAccuracy {
    pub item_id: ItemId,
    /// Mean absolute percentage error over periods with non-zero demand.
    pub mape: f64,
    pub mae: f64,
    pub rmse: f64,
    /// Mean signed error; positive means under-forecasting.
    pub bias: f64,
    pub tracking_signal: f64,
    /// `100 - mape`, floored at 0.
    pub accuracy_percent: f64,
    pub periods_analyzed: usize,
    /// Periods that contributed to MAPE.
    pub mape_periods: usize,
}

impl ValueObject for ForecastAccuracy {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parsing_accepts_kebab_and_snake_case() {
        assert_eq!("moving-average".parse::<ForecastMethod>().unwrap(), ForecastMethod::MovingAverage);
        assert_eq!(
            "Exponential_Smoothing".parse::<ForecastMethod>().unwrap(),
            ForecastMethod::ExponentialSmoothing
        );
    }

    #[test]
    fn unknown_method_is_rejected() {
        assert!(matches!(
            "arima".parse::<ForecastMethod>(),
            Err(DomainError::InvalidParameter(_))
        ));
    }

    #[test]
    fn default_parameters_are_valid() {
        for method in ForecastMethod::ALL {
            ForecastParameters::new(method, 6).validate().unwrap();
        }
    }

    #[test]
    fn zero_horizon_is_invalid() {
        let err = ForecastParameters::new(ForecastMethod::Seasonal, 0).validate().unwrap_err();
        assert!(matches!(err, DomainError::InvalidParameter(msg) if msg.contains("periods_ahead")));
    }

    #[test]
    fn out_of_range_tuning_is_invalid() {
        let base = ForecastParameters::new(ForecastMethod::ExponentialSmoothing, 3);
        assert!(base.clone().with_smoothing_alpha(0.0).validate().is_err());
        assert!(base.clone().with_smoothing_alpha(1.5).validate().is_err());
        assert!(base.clone().with_window(0).validate().is_err());
        assert!(base.clone().with_weights(vec![]).validate().is_err());
        assert!(base.with_weights(vec![0.0, 0.0]).validate().is_err());
    }

    #[test]
    fn enums_serialize_in_snake_case() {
        assert_eq!(
            serde_json::to_string(&ForecastMethod::LinearRegression).unwrap(),
            "\"linear_regression\""
        );
        assert_eq!(serde_json::to_string(&Trend::Seasonal).unwrap(), "\"seasonal\"");
        assert_eq!(
            serde_json::to_string(&MethodChoice::Explicit(ForecastMethod::Seasonal)).unwrap(),
            r#"{"kind":"explicit","method":"seasonal"}"#
        );
    }
}
