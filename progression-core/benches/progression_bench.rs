use criterion::{black_box, criterion_group, criterion_main, Criterion};
use progression_core::levels::*;

fn bench_curve(c: &mut Criterion) {
    c.bench_function("xp_for_level_50", |b| {
        b.iter(|| xp_for_level(black_box(50)))
    });

    c.bench_function("level_for_xp_small", |b| {
        b.iter(|| level_for_xp(black_box(12_345)))
    });

    c.bench_function("level_for_xp_u64_max", |b| {
        b.iter(|| level_for_xp(black_box(u64::MAX)))
    });
}

fn bench_progress(c: &mut Criterion) {
    c.bench_function("level_progress", |b| {
        b.iter(|| level_progress(black_box(98_765)))
    });

    c.bench_function("detect_level_up_crossing", |b| {
        b.iter(|| detect_level_up(black_box(1469), black_box(1471)))
    });
}

criterion_group!(benches, bench_curve, bench_progress);
criterion_main!(benches);
