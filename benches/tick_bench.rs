// benches/tick_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quantum_smart_city_sim::prelude::*;

fn benchmark_engine(c: &mut Criterion) {
    c.bench_function("city_tick", |b| {
        let mut state = CityState::default();
        let mut src = SeededSource::from_seed(42);

        b.iter(|| {
            state.tick(&mut src, black_box(1.0));
        });
    });

    c.bench_function("snapshot_and_scene", |b| {
        let mut state = CityState::default();
        let mut src = SeededSource::from_seed(42);
        for _ in 0..50 {
            state.tick(&mut src, 1.0);
        }

        b.iter(|| {
            let snapshot = state.snapshot(ClockInfo::idle(1.0));
            black_box(SceneGeometry::from_snapshot(&snapshot));
        });
    });
}

criterion_group!(benches, benchmark_engine);
criterion_main!(benches);
