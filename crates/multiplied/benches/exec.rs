//! Benchmarks for planning and execution.
//!
//! Measures:
//! - Greedy plan construction per bitwidth
//! - Single-pattern template compilation
//! - Full `exec` over one operand pair and over a sweep

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use multiplied::{Algorithm, Matrix, Pattern, Template};

fn greedy(bits: usize) -> Algorithm {
    let mut algorithm = Algorithm::new(bits).unwrap();
    algorithm.auto_resolve_stage(true).unwrap();
    algorithm
}

// =============================================================================
// Planning
// =============================================================================

fn bench_planning(c: &mut Criterion) {
    let mut group = c.benchmark_group("planning");

    for bits in [4usize, 8] {
        group.bench_with_input(BenchmarkId::new("auto_resolve", bits), &bits, |b, &bits| {
            b.iter(|| black_box(greedy(black_box(bits))));
        });
    }

    let seed = Matrix::seed(8).unwrap();
    let pattern: Pattern = "aaabbbcc".parse().unwrap();
    group.bench_function("compile_8bit", |b| {
        b.iter(|| black_box(Template::from_pattern(black_box(&pattern), &seed).unwrap()));
    });

    group.finish();
}

// =============================================================================
// Execution
// =============================================================================

fn bench_exec(c: &mut Criterion) {
    let mut group = c.benchmark_group("exec");
    group.throughput(Throughput::Elements(1));

    for bits in [4usize, 8] {
        let mut algorithm = greedy(bits);
        let max = (1u32 << bits) - 1;
        group.bench_with_input(BenchmarkId::new("single", bits), &max, |b, &max| {
            b.iter(|| black_box(algorithm.exec(black_box(max), black_box(max - 1)).unwrap()));
        });
    }

    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");
    group.sample_size(10);

    // Every 4-bit pair: one full truth table.
    let mut algorithm = greedy(4);
    group.throughput(Throughput::Elements(15 * 15));
    group.bench_function("4bit_all_pairs", |b| {
        b.iter(|| {
            for a in 1..=15 {
                for m in 1..=15 {
                    black_box(algorithm.exec(a, m).unwrap());
                }
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_planning, bench_exec, bench_sweep);
criterion_main!(benches);
