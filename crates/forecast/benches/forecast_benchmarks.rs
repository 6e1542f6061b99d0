use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use std::sync::Arc;

use planwise_core::{ItemId, Period};
use planwise_forecast::{
    DemandForecastEngine, DemandSeries, EngineConfig, ForecastMethod, ForecastRequest,
    InMemorySeriesStore, MethodChoice,
};

/// Deterministic synthetic demand: trend + quarterly cycle + a little wobble.
fn synthetic_history(len: usize, seed: u64) -> Vec<f64> {
    let cycle = [1.2, 0.8, 1.3, 0.7];
    (0..len)
        .map(|i| {
            let wobble = ((i as u64 * 31 + seed * 17) % 11) as f64 - 5.0;
            (400.0 + 2.0 * i as f64) * cycle[i % 4] + wobble
        })
        .collect()
}

fn engine_with_items(items: usize, history: usize) -> (DemandForecastEngine<InMemorySeriesStore>, Vec<ItemId>) {
    let store = InMemorySeriesStore::new();
    let start = Period::month(2015, 1).unwrap();
    let ids: Vec<ItemId> = (0..items)
        .map(|n| {
            let id = ItemId::new();
            store.insert(DemandSeries::monthly(id, start, &synthetic_history(history, n as u64)).unwrap());
            id
        })
        .collect();
    let config = EngineConfig {
        record_forecasts: false,
        ..EngineConfig::default()
    };
    (DemandForecastEngine::new(Arc::new(store), config).unwrap(), ids)
}

fn bench_single_item(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_item_forecast");
    let (engine, ids) = engine_with_items(1, 120);

    for method in ForecastMethod::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(method), &method, |b, method| {
            let request = ForecastRequest::new(ids[0])
                .with_method(*method)
                .with_periods_ahead(12);
            b.iter(|| black_box(engine.generate_forecast(&request).unwrap()))
        });
    }

    group.bench_function("recommended", |b| {
        let request = ForecastRequest::new(ids[0]).with_periods_ahead(12);
        b.iter(|| black_box(engine.generate_forecast(&request).unwrap()))
    });

    group.finish();
}

fn bench_multi_item(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_item_forecast");

    for items in [10usize, 100, 1_000] {
        let (engine, ids) = engine_with_items(items, 60);
        group.throughput(Throughput::Elements(items as u64));
        group.bench_with_input(BenchmarkId::from_parameter(items), &ids, |b, ids| {
            b.iter(|| black_box(engine.get_multi_item_forecast(ids, MethodChoice::Recommended, 6)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_item, bench_multi_item);
criterion_main!(benches);
