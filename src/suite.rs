//! The full benchmark: every kernel at every size.

use std::time::Duration;

use tracing::info;

use crate::config::BenchConfig;
use crate::error::Result;
use crate::harness::peak::PeakEstimate;
use crate::harness::results::ResultsAggregator;
use crate::harness::runner::{BenchmarkRunner, RunStats};
use crate::harness::timer::Clock;
use crate::kernels::Kernel;
use crate::matrix::Matrix;
use crate::system::{Environment, SystemProfile};

/// Things worth telling the user while the suite runs.
#[derive(Debug)]
pub enum Progress<'a> {
    /// Size left out because A, B and C would exceed the memory budget.
    SizeSkipped { n: usize, memory_mb: usize },
    SizeStarted { n: usize, memory_mb: usize },
    KernelStarted { n: usize, kernel: Kernel },
    KernelFinished { n: usize, kernel: Kernel, stats: &'a RunStats },
    Pausing { duration: Duration },
}

/// Sequential driver for all (size, kernel) pairs.
pub struct Suite<C: Clock> {
    config: BenchConfig,
    profile: SystemProfile,
    peak: PeakEstimate,
    runner: BenchmarkRunner<C>,
}

impl<C: Clock> Suite<C> {
    pub fn new(config: BenchConfig, profile: SystemProfile, clock: C) -> Self {
        let peak = PeakEstimate::from_profile(&profile);
        let runner = BenchmarkRunner::with_clock(config.run, peak.gflops, clock);
        Self {
            config,
            profile,
            peak,
            runner,
        }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn peak(&self) -> PeakEstimate {
        self.peak
    }

    /// Run everything, one size at a time.
    ///
    /// For each size the three matrices are allocated once, shared by all
    /// kernels, and dropped before the next size. Allocation failure aborts
    /// the whole run.
    pub fn run<E, F>(&self, env: &E, mut on_progress: F) -> Result<ResultsAggregator>
    where
        E: Environment + ?Sized,
        F: FnMut(Progress<'_>),
    {
        let kernels = self.config.kernels();
        let mut results = ResultsAggregator::new(&self.config.sizes, &kernels);
        let caps = self.profile.simd;

        for &n in &self.config.sizes {
            let memory_mb = BenchConfig::memory_mb(n);
            if !self.config.fits_memory_budget(n) {
                info!(n, memory_mb, budget_mb = self.config.memory_budget_mb, "skipping size");
                on_progress(Progress::SizeSkipped { n, memory_mb });
                continue;
            }
            on_progress(Progress::SizeStarted { n, memory_mb });

            let a = Matrix::allocate_initialized(n)?;
            let b = Matrix::allocate_initialized(n)?;
            let mut c = Matrix::allocate_initialized(n)?;

            for kernel in kernels {
                on_progress(Progress::KernelStarted { n, kernel });
                let stats = self
                    .runner
                    .run(&a, &b, &mut c, |a, b, c| kernel.run(caps, a, b, c));
                results.record(&kernel, &stats);
                on_progress(Progress::KernelFinished {
                    n,
                    kernel,
                    stats: &stats,
                });
            }

            drop((a, b, c));

            if self.config.needs_thermal_pause(n) {
                let duration = self.config.thermal_pause;
                info!(n, ?duration, "pausing for thermal stabilization");
                on_progress(Progress::Pausing { duration });
                env.pause(duration);
            }
        }

        Ok(results)
    }
}
