use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use dgemm_bench::blocked::BlockedConfig;
use dgemm_bench::harness::flop_count;
use dgemm_bench::kernels::Kernel;
use dgemm_bench::matrix::Matrix;
use dgemm_bench::system::SimdCapabilities;
use std::hint::black_box;

fn bench_kernels(c: &mut Criterion) {
    let caps = SimdCapabilities::detect();
    let kernels = [
        Kernel::Naive,
        Kernel::Vectorized,
        Kernel::Blocked(BlockedConfig::default()),
        Kernel::Blocked(BlockedConfig::default().with_prefetch(true)),
    ];

    let mut group = c.benchmark_group("dgemm");
    group.sample_size(10);

    for n in [64, 128, 256] {
        let a = Matrix::allocate_initialized(n).unwrap();
        let b = Matrix::allocate_initialized(n).unwrap();
        let mut out = Matrix::allocate(n).unwrap();
        group.throughput(Throughput::Elements(flop_count(n) as u64));

        for kernel in kernels {
            group.bench_with_input(BenchmarkId::new(kernel.name(), n), &n, |bench, _| {
                bench.iter(|| {
                    out.zero();
                    kernel.run(caps, black_box(&a), black_box(&b), &mut out);
                })
            });
        }
    }
    group.finish();
}

fn bench_tile_sizes(c: &mut Criterion) {
    let caps = SimdCapabilities::detect();
    let n = 256;
    let a = Matrix::allocate_initialized(n).unwrap();
    let b = Matrix::allocate_initialized(n).unwrap();
    let mut out = Matrix::allocate(n).unwrap();

    let mut group = c.benchmark_group("dgemm_tile");
    group.sample_size(10);
    for tile in [16, 32, 64, 128] {
        let kernel = Kernel::Blocked(BlockedConfig::with_tile(tile));
        group.bench_with_input(BenchmarkId::from_parameter(tile), &tile, |bench, _| {
            bench.iter(|| {
                out.zero();
                kernel.run(caps, black_box(&a), black_box(&b), &mut out);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_kernels, bench_tile_sizes);
criterion_main!(benches);
