//! Benchmarks for streamframe-incremental accumulators.
//!
//! Target: folding one small chunk into running state < 100μs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use streamframe_core::{Chunk, Frame, Grouper, Selector, Series, Value, Window};
use streamframe_incremental::{accumulate_mean, accumulate_sum, groupby_sum, roll, MeanState};

fn make_frame(rows: usize, offset: i64) -> Chunk {
    let keys: Vec<Value> = (0..rows).map(|i| Value::Int64((i % 10) as i64)).collect();
    let amounts: Vec<Value> = (0..rows).map(|i| Value::Int64(i as i64 + offset)).collect();
    let prices: Vec<Value> = (0..rows).map(|i| Value::Float64(i as f64 * 0.5)).collect();
    Chunk::Frame(Frame::from_columns([("key", keys), ("amount", amounts), ("price", prices)]).unwrap())
}

fn bench_running_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate/sum");

    for size in [1, 10, 100, 1000] {
        let chunk = make_frame(size, 0);
        group.bench_with_input(BenchmarkId::new("frame_chunk", size), &chunk, |b, chunk| {
            let start = Chunk::from(0i64);
            b.iter(|| accumulate_sum(black_box(&start), black_box(chunk)))
        });
    }

    group.finish();
}

fn bench_running_mean(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate/mean");

    for size in [1, 100] {
        let chunk = make_frame(size, 0);
        group.bench_with_input(BenchmarkId::new("frame_chunk", size), &chunk, |b, chunk| {
            let state = MeanState::zero(chunk).unwrap();
            b.iter(|| accumulate_mean(black_box(&state), black_box(chunk)))
        });
    }

    group.finish();
}

fn bench_groupby_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate/groupby_sum");
    let grouper = Grouper::from("key");
    let selector = Selector::from("amount");

    for size in [10, 100, 1000] {
        let chunk = make_frame(size, 0);
        let totals = groupby_sum(None, &chunk, &grouper, Some(&selector)).unwrap();
        group.bench_with_input(BenchmarkId::new("merge", size), &chunk, |b, chunk| {
            b.iter(|| groupby_sum(Some(black_box(&totals)), black_box(chunk), &grouper, Some(&selector)))
        });
    }

    group.finish();
}

fn bench_rolling(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling");
    let window = Window::rows(100).unwrap();

    group.bench_function("rows_100_single_row", |b| {
        let buffer = Chunk::Series(Series::from_values(0..100i64));
        let chunk = Chunk::Series(Series::from_values([1i64]));
        b.iter(|| roll(Some(black_box(&buffer)), black_box(&chunk), &window, 1))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_running_sum,
    bench_running_mean,
    bench_groupby_sum,
    bench_rolling,
);

criterion_main!(benches);
