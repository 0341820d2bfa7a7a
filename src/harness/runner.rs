//! Warm-up, repeat, time, average.

use tracing::debug;

use super::timer::{Clock, MonotonicClock, time_secs};
use crate::matrix::Matrix;

/// Floating-point operations in one N×N×N GEMM: a multiply and an add per
/// term of every dot product.
#[inline]
pub fn flop_count(n: usize) -> f64 {
    let n = n as f64;
    2.0 * n * n * n
}

/// Throughput of one N×N GEMM that took `elapsed_secs`.
///
/// Returns 0 for a non-positive elapsed time instead of infinity.
///
/// ```
/// use dgemm_bench::harness::runner::gflops;
///
/// assert_eq!(gflops(1000, 2.0), 1.0);
/// ```
#[inline]
pub fn gflops(n: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        flop_count(n) / elapsed_secs * 1e-9
    } else {
        0.0
    }
}

/// `mean / peak * 100`, or 0 when the peak is unknown (≤ 0).
#[inline]
pub fn efficiency_percent(gflops: f64, peak_gflops: f64) -> f64 {
    if peak_gflops > 0.0 {
        gflops / peak_gflops * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Untimed runs before measuring.
    pub warmup_runs: usize,
    /// Timed runs that get averaged. Zero is treated as one.
    pub measured_runs: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            warmup_runs: 1,
            measured_runs: 5,
        }
    }
}

/// One timed kernel call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkSample {
    pub elapsed_secs: f64,
    pub gflops: f64,
}

/// Aggregate of all measured runs of one kernel at one size.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub n: usize,
    pub samples: Vec<BenchmarkSample>,
    pub mean_secs: f64,
    pub mean_gflops: f64,
    pub min_secs: f64,
    pub max_secs: f64,
    /// Percentage of the estimated peak; 0 when the peak is unknown.
    pub efficiency: f64,
}

impl RunStats {
    /// Build statistics from per-run elapsed times.
    ///
    /// GFLOPS is averaged per run rather than derived from the mean time,
    /// so one slow outlier moves both means differently.
    ///
    /// # Panics
    ///
    /// Panics if `elapsed` is empty.
    pub fn from_elapsed(n: usize, elapsed: &[f64], peak_gflops: f64) -> Self {
        assert!(!elapsed.is_empty(), "at least one measured run is required");

        let samples: Vec<BenchmarkSample> = elapsed
            .iter()
            .map(|&t| BenchmarkSample {
                elapsed_secs: t,
                gflops: gflops(n, t),
            })
            .collect();

        let runs = samples.len() as f64;
        let mean_secs = samples.iter().map(|s| s.elapsed_secs).sum::<f64>() / runs;
        let mean_gflops = samples.iter().map(|s| s.gflops).sum::<f64>() / runs;
        let min_secs = samples.iter().map(|s| s.elapsed_secs).fold(f64::INFINITY, f64::min);
        let max_secs = samples.iter().map(|s| s.elapsed_secs).fold(0.0, f64::max);

        RunStats {
            n,
            samples,
            mean_secs,
            mean_gflops,
            min_secs,
            max_secs,
            efficiency: efficiency_percent(mean_gflops, peak_gflops),
        }
    }

    /// Half the min-max spread as a percentage of the mean time.
    ///
    /// `None` when every run took the same time.
    pub fn variation_percent(&self) -> Option<f64> {
        (self.max_secs > self.min_secs && self.mean_secs > 0.0)
            .then(|| (self.max_secs - self.min_secs) / self.mean_secs * 50.0)
    }

    pub fn flop_count(&self) -> f64 {
        flop_count(self.n)
    }
}

/// Runs one kernel repeatedly on one matrix triple.
///
/// Generic over the clock so tests can feed synthetic timings.
pub struct BenchmarkRunner<C: Clock = MonotonicClock> {
    config: RunConfig,
    clock: C,
    peak_gflops: f64,
}

impl BenchmarkRunner<MonotonicClock> {
    pub fn new(config: RunConfig, peak_gflops: f64) -> Self {
        Self::with_clock(config, peak_gflops, MonotonicClock::new())
    }
}

impl<C: Clock> BenchmarkRunner<C> {
    pub fn with_clock(config: RunConfig, peak_gflops: f64, clock: C) -> Self {
        Self {
            config,
            clock,
            peak_gflops,
        }
    }

    pub fn config(&self) -> RunConfig {
        self.config
    }

    pub fn peak_gflops(&self) -> f64 {
        self.peak_gflops
    }

    /// Warm up, then time `measured_runs` calls of `kernel(a, b, c)`.
    ///
    /// C is zeroed before every call, warm-up included, and the zeroing is
    /// outside the timed interval. After this returns, C holds the result
    /// of exactly one multiplication.
    pub fn run<F>(&self, a: &Matrix, b: &Matrix, c: &mut Matrix, mut kernel: F) -> RunStats
    where
        F: FnMut(&Matrix, &Matrix, &mut Matrix),
    {
        let n = a.dim();

        for _ in 0..self.config.warmup_runs {
            c.zero();
            kernel(a, b, c);
        }

        let runs = self.config.measured_runs.max(1);
        let mut elapsed = Vec::with_capacity(runs);
        for run in 0..runs {
            c.zero();

            let secs = time_secs(&self.clock, || kernel(a, b, c));

            debug!(n, run = run + 1, secs, gflops = gflops(n, secs), "measured run");
            elapsed.push(secs);
        }

        RunStats::from_elapsed(n, &elapsed, self.peak_gflops)
    }
}
