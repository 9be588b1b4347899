//! Criterion benchmarks for the per-coordinate kernel.
//!
//! Serial vs rayon launch at a few square sizes, plus the transposed
//! variants at one size since their B reads are strided differently.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use naive_gemm::GemmParams;
use naive_gemm::launch::{DEFAULT_BLOCK, Grid, launch};
use naive_gemm::threaded::{LaunchOptions, launch_parallel};

const SIZES: &[usize] = &[64, 128, 256];

fn operands(m: usize, n: usize, k: usize) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
    let a = (0..m * k).map(|i| (i % 100) as f32 / 100.0).collect();
    let b = (0..k * n).map(|i| (i % 100) as f32 / 100.0).collect();
    (a, b, vec![0.0; m * n])
}

fn bench_launch(c: &mut Criterion) {
    let mut group = c.benchmark_group("gemm/launch");
    group.sample_size(10);

    for &size in SIZES {
        let params = GemmParams::new(size, size, size);
        let grid = Grid::covering(size, size, DEFAULT_BLOCK);
        let (a, b, mut c_buf) = operands(size, size, size);
        group.throughput(Throughput::Elements(params.flops() as u64));

        group.bench_with_input(BenchmarkId::new("serial", size), &size, |bench, _| {
            bench.iter(|| {
                launch(&grid, &params, black_box(&a), black_box(&b), &mut c_buf).unwrap();
                black_box(&c_buf);
            });
        });

        let options = LaunchOptions::default().always_parallel();
        group.bench_with_input(BenchmarkId::new("rayon", size), &size, |bench, _| {
            bench.iter(|| {
                launch_parallel(&grid, &params, black_box(&a), black_box(&b), &mut c_buf, &options)
                    .unwrap();
                black_box(&c_buf);
            });
        });
    }
    group.finish();
}

fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("gemm/transpose");
    group.sample_size(10);

    let size = 128;
    let grid = Grid::covering(size, size, DEFAULT_BLOCK);
    let (a, b, mut c_buf) = operands(size, size, size);
    let options = LaunchOptions::default().always_parallel();

    for (ta, tb) in [(false, false), (true, false), (false, true), (true, true)] {
        let params = GemmParams::new(size, size, size).with_transpose(ta, tb);
        let label = format!("tA={ta},tB={tb}");
        group.bench_function(label, |bench| {
            bench.iter(|| {
                launch_parallel(&grid, &params, black_box(&a), black_box(&b), &mut c_buf, &options)
                    .unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_launch, bench_transpose);
criterion_main!(benches);
