use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pagelib::config::{ExperimentConfig, PolicyKind};
use pagelib::experiment::ExperimentDriver;
use pagelib::progress::NoProgress;
use pagelib::simulator::simulate;
use pagelib::trace::{PoissonTrace, TraceSource};

/// One reference workload trace through each policy at a few frame counts
pub fn policy_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Policies");
    let trace = PoissonTrace::new(10.0, 0).unwrap().generate(0, 1000);
    for kind in PolicyKind::ALL {
        for frames in [2, 8, 20] {
            group.bench_with_input(BenchmarkId::new(kind.short_name(), frames), &frames, |bench, &frames| {
                bench.iter(|| simulate(kind, &trace, frames).unwrap());
            });
        }
    }
    group.finish();
}

/// A scaled down sweep, sequential against parallel
pub fn driver_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Driver");
    for threads in [1, 4] {
        let config = ExperimentConfig { experiments: 50, seed: Some(0), threads, ..Default::default() };
        group.bench_with_input(BenchmarkId::new("Threads", threads), &config, |bench, config| {
            bench.iter(|| ExperimentDriver::new(config.clone()).unwrap().simulate(&NoProgress).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default().significance_level(0.1).sample_size(10);
    targets = policy_benchmark, driver_benchmark
);
criterion_main!(benches);
