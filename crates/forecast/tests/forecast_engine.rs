use std::sync::Arc;

use planwise_core::{DomainError, Granularity, ItemId, Period};
use planwise_forecast::{
    DemandForecastEngine, DemandSeries, EngineConfig, ForecastLog, ForecastMethod, ForecastRequest,
    HistoricalObservation, InMemorySeriesStore, MethodChoice, PatternKind, Trend, seasonal_indices,
};

fn quarterly_cycle(cycles: usize) -> Vec<f64> {
    [1.2, 0.8, 1.3, 0.7]
        .iter()
        .cycle()
        .take(4 * cycles)
        .map(|f| 500.0 * f)
        .collect()
}

struct Fixture {
    store: Arc<InMemorySeriesStore>,
    log: Arc<ForecastLog>,
    engine: DemandForecastEngine<InMemorySeriesStore>,
}

impl Fixture {
    fn new() -> Self {
        planwise_observability::init_with(planwise_observability::LogFormat::Pretty);

        let store = Arc::new(InMemorySeriesStore::new());
        let log = Arc::new(ForecastLog::new());
        let engine = DemandForecastEngine::new(store.clone(), EngineConfig::default())
            .unwrap()
            .with_sink(log.clone());
        Self { store, log, engine }
    }

    fn with_history(&self, actuals: &[f64]) -> ItemId {
        let item = ItemId::new();
        self.store
            .insert(DemandSeries::monthly(item, Period::month(2023, 1).unwrap(), actuals).unwrap());
        item
    }
}

#[test]
fn seasonal_history_round_trips_through_recommendation() {
    let fx = Fixture::new();
    let history = quarterly_cycle(4);
    let item = fx.with_history(&history);

    let pattern = fx.engine.analyze_demand_pattern(item).unwrap();
    assert_eq!(pattern.pattern, PatternKind::Seasonal);
    assert_eq!(pattern.recommended_method, ForecastMethod::Seasonal);

    let forecast = fx
        .engine
        .generate_forecast(&ForecastRequest::new(item).with_periods_ahead(4))
        .unwrap();
    assert_eq!(forecast.method, ForecastMethod::Seasonal);
    assert_eq!(forecast.trend, Trend::Seasonal);

    let points: Vec<f64> = forecast.periods.iter().map(|p| p.forecast).collect();
    assert_eq!(points, vec![600.0, 400.0, 650.0, 350.0]);
    assert_eq!(forecast.total_forecast, 2000.0);
    assert_eq!(forecast.periods[0].period, "2024-05");

    let indices = seasonal_indices(&history, 4).unwrap();
    for (got, want) in indices.iter().zip([1.2, 0.8, 1.3, 0.7]) {
        assert!((got - want).abs() < 1e-9);
    }
}

#[test]
fn regression_extends_linear_history() {
    let fx = Fixture::new();
    let item = fx.with_history(&[10.0, 20.0, 30.0, 40.0]);

    let forecast = fx
        .engine
        .generate_forecast(
            &ForecastRequest::new(item)
                .with_method(ForecastMethod::LinearRegression)
                .with_periods_ahead(3),
        )
        .unwrap();

    let points: Vec<f64> = forecast.periods.iter().map(|p| p.forecast).collect();
    assert_eq!(points, vec![50.0, 60.0, 70.0]);
    // A perfect fit leaves no residual spread.
    assert!(forecast.periods.iter().all(|p| p.lower_bound == p.forecast && p.upper_bound == p.forecast));
    assert_eq!(forecast.trend, Trend::Increasing);

    let confidences: Vec<f64> = forecast.periods.iter().map(|p| p.confidence).collect();
    assert!((confidences[0] - 0.85).abs() < 1e-12);
    assert!((confidences[1] - 0.83).abs() < 1e-12);
    assert!((confidences[2] - 0.81).abs() < 1e-12);
}

#[test]
fn weekly_granularity_labels_iso_weeks() {
    let fx = Fixture::new();
    let item = fx.with_history(&[5.0, 6.0, 7.0]);

    let forecast = fx
        .engine
        .generate_forecast(
            &ForecastRequest::new(item)
                .with_method(ForecastMethod::MovingAverage)
                .with_periods_ahead(2)
                .with_granularity(Granularity::Weekly),
        )
        .unwrap();

    // History ends with the period starting 2023-03-01 (ISO week 9).
    let labels: Vec<&str> = forecast.periods.iter().map(|p| p.period.as_str()).collect();
    assert_eq!(labels, vec!["2023-W10", "2023-W11"]);
    assert_eq!(forecast.parameters.granularity, Granularity::Weekly);
}

#[test]
fn accuracy_tracks_recorded_forecasts() {
    let fx = Fixture::new();
    let item = ItemId::new();
    let recorded = [(100.0, Some(90.0)), (200.0, Some(220.0)), (150.0, Some(150.0)), (170.0, None)];
    for (month, (actual, forecast)) in recorded.into_iter().enumerate() {
        let mut obs = HistoricalObservation::new(Period::month(2024, month as u32 + 1).unwrap(), actual).unwrap();
        if let Some(f) = forecast {
            obs = obs.with_forecast(f).unwrap();
        }
        fx.store.record(item, obs).unwrap();
    }

    let accuracy = fx.engine.calculate_forecast_accuracy(item).unwrap();
    assert_eq!(accuracy.periods_analyzed, 3);
    assert!((accuracy.mae - 10.0).abs() < 1e-9);
    assert!((accuracy.bias + 10.0 / 3.0).abs() < 1e-9);
    assert!((accuracy.tracking_signal + 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn accuracy_without_recorded_forecasts_is_insufficient() {
    let fx = Fixture::new();
    let item = fx.with_history(&[1.0, 2.0, 3.0]);
    assert!(matches!(
        fx.engine.calculate_forecast_accuracy(item),
        Err(DomainError::InsufficientData { .. })
    ));
    assert!(matches!(
        fx.engine.calculate_forecast_accuracy(ItemId::new()),
        Err(DomainError::NotFound { .. })
    ));
}

#[test]
fn batch_returns_valid_subset_and_feeds_summary() {
    let fx = Fixture::new();
    let stable = fx.with_history(&[100.0, 102.0, 98.0, 101.0, 99.0, 100.0]);
    let rising = fx.with_history(&[40.0, 45.0, 50.0, 55.0, 60.0]);
    let too_short = fx.with_history(&[7.0]);
    let unknown = ItemId::new();

    let forecasts = fx
        .engine
        .get_multi_item_forecast(&[unknown, rising, too_short, stable], MethodChoice::Recommended, 3);

    let items: Vec<ItemId> = forecasts.iter().map(|f| f.item_id).collect();
    assert_eq!(items, vec![rising, stable]);

    let summary = fx.log.summary();
    assert_eq!(summary.total_forecasts, 2);
    assert_eq!(summary.by_method[&ForecastMethod::LinearRegression], 1);
    assert_eq!(summary.by_method[&ForecastMethod::MovingAverage], 1);
    assert_eq!(summary.trend_distribution[&Trend::Increasing], 1);
    assert_eq!(summary.trend_distribution[&Trend::Stable], 1);
    assert!((summary.avg_confidence - 0.8).abs() < 1e-12);
}

#[test]
fn forecast_serializes_for_downstream_consumers() {
    let fx = Fixture::new();
    let item = fx.with_history(&[100.0, 110.0, 90.0, 105.0]);
    let forecast = fx
        .engine
        .generate_forecast(
            &ForecastRequest::new(item)
                .with_method(ForecastMethod::MovingAverage)
                .with_periods_ahead(2),
        )
        .unwrap();

    let json = serde_json::to_value(&forecast).unwrap();
    assert_eq!(json["method"], "moving_average");
    assert_eq!(json["total_forecast"], 204.0);
    assert_eq!(json["periods"][0]["period"], "2023-05");
    assert_eq!(json["parameters"]["window"], 3);
    assert_eq!(json["item_id"], item.to_string());
}
