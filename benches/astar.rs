use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use dev_utils::{sample_query, sample_store, SAMPLE_MAX_STOP_DISTANCE_M};
use gtfs_astar::{astar_query, find_route, Coord};

fn astar_benchmark(c: &mut Criterion) {
    let store = sample_store();
    c.bench_function("A* stop to stop", |b| {
        b.iter(|| astar_query(&store, black_box("S1"), black_box("S5")))
    });
}

fn find_route_benchmark(c: &mut Criterion) {
    let store = sample_store();
    let (origin, destination) = sample_query();
    c.bench_function("find_route", |b| {
        b.iter(|| {
            find_route(
                &store,
                black_box(origin),
                black_box(destination),
                SAMPLE_MAX_STOP_DISTANCE_M,
            )
        })
    });
}

fn jittered_queries_benchmark(c: &mut Criterion) {
    let store = sample_store();
    let (origin, destination) = sample_query();
    let jitter = |coord: Coord| {
        Coord::new(
            coord.lat + (fastrand::f64() - 0.5) * 1e-3,
            coord.lon + (fastrand::f64() - 0.5) * 1e-3,
        )
    };
    let queries: Vec<(Coord, Coord)> =
        (0..64).map(|_| (jitter(origin), jitter(destination))).collect();

    c.bench_function("find_route jittered x64", |b| {
        b.iter(|| {
            for &(origin, destination) in &queries {
                let _ = find_route(
                    &store,
                    black_box(origin),
                    black_box(destination),
                    SAMPLE_MAX_STOP_DISTANCE_M,
                );
            }
        })
    });
}

criterion_group!(benches, astar_benchmark, find_route_benchmark, jittered_queries_benchmark);
criterion_main!(benches);
