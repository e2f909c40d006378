use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use spreadcheck::activations::Activation;
use spreadcheck::layers::WeightInit;
use spreadcheck::metrics::MomentStats;
use spreadcheck::propagation::{run, ExperimentConfig, RunShape};

fn bench_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagation");
    group.sample_size(10);

    for (width, batch) in [(128, 512), (256, 1024)] {
        let config = ExperimentConfig::new("he relu", WeightInit::He, Activation::Relu);
        let shape = RunShape::new(width, 5, batch).with_snapshots([5], 10_000);
        group.bench_function(format!("he_relu_w{}_b{}", width, batch), |b| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| run(black_box(&config), black_box(&shape), &mut rng).unwrap())
        });
    }

    group.finish();
}

fn bench_moments(c: &mut Criterion) {
    let values: Vec<f32> = (0..1_000_000).map(|i| (i % 97) as f32 - 48.0).collect();
    c.bench_function("moment_stats_1m", |b| {
        b.iter(|| MomentStats::from_slice(black_box(&values)).unwrap())
    });
}

criterion_group!(benches, bench_propagation, bench_moments);
criterion_main!(benches);
