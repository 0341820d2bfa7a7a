use std::cell::Cell;
use std::time::Duration;

use dgemm_bench::blocked::BlockedConfig;
use dgemm_bench::config::BenchConfig;
use dgemm_bench::harness::peak::{PeakEstimate, estimate_peak_gflops};
use dgemm_bench::harness::runner::efficiency_percent;
use dgemm_bench::harness::{
    BenchmarkRunner, Clock, ResultsAggregator, RunConfig, RunStats, SteppingClock, gflops,
    time_secs,
};
use dgemm_bench::kernels::Kernel;
use dgemm_bench::matrix::Matrix;
use dgemm_bench::suite::{Progress, Suite};
use dgemm_bench::system::{FixedEnvironment, SimdCapabilities, SystemProfile};

// ============================================================
// GFLOPS, peak, efficiency
// ============================================================

#[test]
fn test_gflops_formula_n128() {
    for t in [0.001, 0.0421, 1.5, 3.0] {
        let expected = 2.0 * 128.0 * 128.0 * 128.0 / t * 1e-9;
        let got = gflops(128, t);
        assert!((got - expected).abs() <= expected * 1e-15, "t={}", t);
    }
}

#[test]
fn test_gflops_non_positive_time() {
    assert_eq!(gflops(64, 0.0), 0.0);
    assert_eq!(gflops(64, -1.0), 0.0);
}

#[test]
fn test_peak_estimate() {
    assert_eq!(estimate_peak_gflops(3.0, 8), 384.0);
    assert_eq!(estimate_peak_gflops(2.5, 1), 40.0);

    let profile = SystemProfile {
        core_count: 8,
        frequency_ghz: 3.0,
        simd: SimdCapabilities::scalar(),
    };
    assert_eq!(PeakEstimate::from_profile(&profile).gflops, 384.0);
}

#[test]
fn test_efficiency_zero_without_peak() {
    assert_eq!(efficiency_percent(50.0, 0.0), 0.0);
    assert_eq!(efficiency_percent(50.0, -3.0), 0.0);
    assert_eq!(efficiency_percent(50.0, 200.0), 25.0);

    let stats = RunStats::from_elapsed(64, &[0.5, 0.5], 0.0);
    assert_eq!(stats.efficiency, 0.0);
}

#[test]
fn test_efficiency_can_exceed_100() {
    assert_eq!(efficiency_percent(150.0, 100.0), 150.0);
}

// ============================================================
// Statistics
// ============================================================

#[test]
fn test_identical_samples() {
    for k in [1, 2, 5, 9] {
        let elapsed = vec![0.25; k];
        let stats = RunStats::from_elapsed(128, &elapsed, 384.0);
        assert_eq!(stats.mean_secs, 0.25);
        assert_eq!(stats.min_secs, 0.25);
        assert_eq!(stats.max_secs, 0.25);
        assert!((stats.mean_gflops - gflops(128, 0.25)).abs() < 1e-12);
        assert_eq!(stats.variation_percent(), None);
        assert_eq!(stats.samples.len(), k);
    }
}

#[test]
fn test_mixed_samples() {
    let stats = RunStats::from_elapsed(100, &[1.0, 2.0, 3.0], 0.0);
    assert_eq!(stats.mean_secs, 2.0);
    assert_eq!(stats.min_secs, 1.0);
    assert_eq!(stats.max_secs, 3.0);
    // (3 - 1) / 2 * 50
    assert_eq!(stats.variation_percent(), Some(50.0));

    // GFLOPS is the mean of per-run figures, not the figure of the mean time.
    let per_run: f64 = [1.0, 2.0, 3.0].iter().map(|&t| gflops(100, t)).sum::<f64>() / 3.0;
    assert!((stats.mean_gflops - per_run).abs() < 1e-12);
    assert!(stats.mean_gflops > gflops(100, 2.0));
}

#[test]
#[should_panic(expected = "at least one measured run")]
fn test_empty_samples_panics() {
    RunStats::from_elapsed(8, &[], 1.0);
}

// ============================================================
// Runner
// ============================================================

#[test]
fn test_runner_with_fake_clock() {
    let a = Matrix::allocate_initialized(8).unwrap();
    let b = Matrix::allocate_initialized(8).unwrap();
    let mut c = Matrix::allocate(8).unwrap();

    let runner = BenchmarkRunner::with_clock(RunConfig::default(), 384.0, SteppingClock::new(0.125));
    let stats = runner.run(&a, &b, &mut c, |a, b, c| Kernel::Naive.run(SimdCapabilities::scalar(), a, b, c));

    assert_eq!(stats.samples.len(), 5);
    assert_eq!(stats.mean_secs, 0.125);
    assert_eq!(stats.min_secs, stats.max_secs);
    assert_eq!(stats.min_secs, stats.mean_secs);
    let expected = gflops(8, 0.125);
    assert!((stats.mean_gflops - expected).abs() <= expected * 1e-12);
    assert!((stats.efficiency - expected / 384.0 * 100.0).abs() <= 1e-9);
}

#[test]
fn test_runner_zeroes_before_every_call() {
    let a = Matrix::allocate_initialized(4).unwrap();
    let b = Matrix::allocate_initialized(4).unwrap();
    let mut c = Matrix::allocate_initialized(4).unwrap();

    let calls = Cell::new(0);
    let config = RunConfig {
        warmup_runs: 2,
        measured_runs: 3,
    };
    let runner = BenchmarkRunner::with_clock(config, 0.0, SteppingClock::new(0.5));
    runner.run(&a, &b, &mut c, |_, _, c| {
        assert!(c.as_slice().iter().all(|&x| x == 0.0), "C not zeroed");
        c.as_mut_slice().fill(7.0);
        calls.set(calls.get() + 1);
    });

    assert_eq!(calls.get(), 5);
}

#[test]
fn test_runner_leaves_single_product_in_c() {
    let caps = SimdCapabilities::detect();
    let a = Matrix::allocate_initialized(16).unwrap();
    let b = Matrix::allocate_initialized(16).unwrap();
    let mut c = Matrix::allocate(16).unwrap();
    let mut once = Matrix::allocate(16).unwrap();
    Kernel::Naive.run(caps, &a, &b, &mut once);

    let runner = BenchmarkRunner::new(RunConfig::default(), 100.0);
    runner.run(&a, &b, &mut c, |a, b, c| Kernel::Naive.run(caps, a, b, c));

    assert_eq!(c.as_slice(), once.as_slice());
}

/// Returns a scripted sequence of readings.
struct ScriptedClock {
    readings: Vec<f64>,
    next: Cell<usize>,
}

impl Clock for ScriptedClock {
    fn now(&self) -> f64 {
        let i = self.next.get();
        self.next.set(i + 1);
        self.readings[i]
    }
}

#[test]
fn test_runner_with_scripted_timings() {
    let a = Matrix::allocate_initialized(2).unwrap();
    let b = Matrix::allocate_initialized(2).unwrap();
    let mut c = Matrix::allocate(2).unwrap();

    // start/stop pairs: 1s, 2s, 3s
    let clock = ScriptedClock {
        readings: vec![0.0, 1.0, 10.0, 12.0, 20.0, 23.0],
        next: Cell::new(0),
    };
    let config = RunConfig {
        warmup_runs: 1,
        measured_runs: 3,
    };
    let runner = BenchmarkRunner::with_clock(config, 0.0, clock);
    let stats = runner.run(&a, &b, &mut c, |_, _, _| {});

    let times: Vec<f64> = stats.samples.iter().map(|s| s.elapsed_secs).collect();
    assert_eq!(times, vec![1.0, 2.0, 3.0]);
    assert_eq!(stats.mean_secs, 2.0);
    assert_eq!(stats.variation_percent(), Some(50.0));
}

#[test]
fn test_runner_sample_matches_time_secs() {
    let a = Matrix::allocate_initialized(2).unwrap();
    let b = Matrix::allocate_initialized(2).unwrap();
    let mut c = Matrix::allocate(2).unwrap();

    let expected = time_secs(&SteppingClock::new(0.375), || {});

    let config = RunConfig {
        warmup_runs: 2,
        measured_runs: 4,
    };
    let runner = BenchmarkRunner::with_clock(config, 0.0, SteppingClock::new(0.375));
    let stats = runner.run(&a, &b, &mut c, |_, _, _| {});

    assert_eq!(stats.samples.len(), 4);
    assert!(stats.samples.iter().all(|s| s.elapsed_secs == expected));
}

// ============================================================
// Aggregation
// ============================================================

fn stats_with_gflops(n: usize, target_gflops: f64, peak: f64) -> RunStats {
    let t = 2.0 * (n as f64).powi(3) / (target_gflops * 1e9);
    RunStats::from_elapsed(n, &[t], peak)
}

#[test]
fn test_speedup_end_to_end_n64() {
    let caps = SimdCapabilities::detect();
    let kernels = BenchConfig::default().kernels();
    let n = 64;
    let a = Matrix::allocate_initialized(n).unwrap();
    let b = Matrix::allocate_initialized(n).unwrap();
    let mut c = Matrix::allocate(n).unwrap();

    let runner = BenchmarkRunner::new(RunConfig::default(), 384.0);
    let mut results = ResultsAggregator::new(&[n], &kernels);
    let mut g = Vec::new();
    for kernel in kernels {
        let stats = runner.run(&a, &b, &mut c, |a, b, c| kernel.run(caps, a, b, c));
        g.push(stats.mean_gflops);
        assert!(results.record(&kernel, &stats));
    }

    assert!(g[0] > 0.0);
    let s1 = results.speedup(1, 0).unwrap();
    let s2 = results.speedup(2, 0).unwrap();
    assert_eq!(s1, g[1] / g[0]);
    assert_eq!(s2, g[2] / g[0]);
    for s in [s1, s2] {
        assert!(s.is_finite() && s >= 0.0);
    }
    assert_eq!(results.speedup(0, 0), Some(1.0));
}

#[test]
fn test_missing_sizes_are_excluded_from_summary() {
    let kernels = [Kernel::Naive, Kernel::Vectorized];
    let sizes = [64, 128, 256];
    let mut results = ResultsAggregator::new(&sizes, &kernels);

    results.record(&Kernel::Naive, &stats_with_gflops(64, 2.0, 100.0));
    results.record(&Kernel::Naive, &stats_with_gflops(256, 4.0, 100.0));
    results.record(&Kernel::Vectorized, &stats_with_gflops(64, 8.0, 100.0));
    // zero-throughput entry counts as missing
    results.record(&Kernel::Vectorized, &RunStats::from_elapsed(128, &[0.0], 100.0));

    let naive = results.summary(0).unwrap();
    assert_eq!(naive.valid_sizes, 2);
    assert!((naive.max_gflops - 4.0).abs() < 1e-9);
    assert!((naive.min_gflops - 2.0).abs() < 1e-9);
    assert!((naive.mean_gflops - 3.0).abs() < 1e-9);
    assert!((naive.mean_efficiency - 3.0).abs() < 1e-9);

    let vec = results.summary(1).unwrap();
    assert_eq!(vec.valid_sizes, 1);
    assert!((vec.mean_gflops - 8.0).abs() < 1e-9);

    assert!((results.speedup(1, 0).unwrap() - 4.0).abs() < 1e-9);
    assert_eq!(results.speedup(1, 1), None);
    assert_eq!(results.speedup(1, 2), None);
}

#[test]
fn test_summary_none_without_results() {
    let results = ResultsAggregator::new(&[64], &[Kernel::Naive]);
    assert_eq!(results.summary(0), None);
    assert_eq!(results.summary(7), None);
    assert_eq!(results.get(0, 0), None);
}

#[test]
fn test_speedup_requires_baseline() {
    let blocked = Kernel::Blocked(BlockedConfig::default());
    let mut results = ResultsAggregator::new(&[64], &[Kernel::Vectorized, blocked]);
    results.record(&Kernel::Vectorized, &stats_with_gflops(64, 2.0, 0.0));
    results.record(&blocked, &stats_with_gflops(64, 3.0, 0.0));
    assert_eq!(results.speedup(1, 0), None);
}

#[test]
fn test_record_unknown_size_or_kernel() {
    let mut results = ResultsAggregator::new(&[64], &[Kernel::Naive]);
    assert!(!results.record(&Kernel::Naive, &stats_with_gflops(32, 1.0, 0.0)));
    assert!(!results.record(&Kernel::Vectorized, &stats_with_gflops(64, 1.0, 0.0)));
}

// ============================================================
// Suite
// ============================================================

fn small_config() -> BenchConfig {
    BenchConfig {
        sizes: vec![8, 16, 40],
        run: RunConfig {
            warmup_runs: 1,
            measured_runs: 2,
        },
        blocked: BlockedConfig::with_tile(16),
        memory_budget_mb: 4096,
        thermal_pause_min_size: 16,
        thermal_pause: Duration::from_secs(1),
    }
}

#[test]
fn test_suite_runs_every_pair_and_pauses() {
    let env = FixedEnvironment::new(4, 3.0, SimdCapabilities::detect());
    let profile = SystemProfile::gather(&env);
    let suite = Suite::new(small_config(), profile, SteppingClock::new(0.5));
    assert_eq!(suite.peak().gflops, 192.0);

    let mut finished = 0;
    let results = suite
        .run(&env, |event| {
            if let Progress::KernelFinished { stats, .. } = event {
                assert_eq!(stats.samples.len(), 2);
                finished += 1;
            }
        })
        .unwrap();

    assert_eq!(finished, 9);
    assert_eq!(env.pauses(), vec![Duration::from_secs(1); 2]);
    for m in 0..3 {
        let summary = results.summary(m).unwrap();
        assert_eq!(summary.valid_sizes, 3);
    }
}

#[test]
fn test_suite_skips_sizes_over_budget() {
    let env = FixedEnvironment::new(1, 2.5, SimdCapabilities::scalar());
    let mut config = small_config();
    config.sizes = vec![8, 512];
    // 512: 3 * 512^2 * 8 bytes = 6 MiB
    config.memory_budget_mb = 5;
    config.thermal_pause_min_size = 10_000;

    let suite = Suite::new(config, SystemProfile::gather(&env), SteppingClock::new(0.25));
    let mut skipped = Vec::new();
    let results = suite
        .run(&env, |event| {
            if let Progress::SizeSkipped { n, memory_mb } = event {
                skipped.push((n, memory_mb));
            }
        })
        .unwrap();

    assert_eq!(skipped, vec![(512, 6)]);
    assert!(env.pauses().is_empty());
    assert!(results.get(0, 0).is_some());
    assert!(results.get(0, 1).is_none());
    assert_eq!(results.summary(0).unwrap().valid_sizes, 1);
}
