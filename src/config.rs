//! Fixed benchmark settings.
//!
//! The executable takes no flags; everything it does is decided here at
//! compile time.

use std::time::Duration;

use crate::blocked::{BlockedConfig, DEFAULT_TILE};
use crate::harness::runner::RunConfig;
use crate::kernels::Kernel;

/// Matrix sizes, smallest first.
pub const MATRIX_SIZES: [usize; 6] = [64, 128, 256, 512, 1024, 2048];

pub const WARMUP_RUNS: usize = 1;
pub const MEASURED_RUNS: usize = 5;

/// Sizes whose three matrices need more than this are skipped.
pub const MEMORY_BUDGET_MB: usize = 4096;

/// Sizes at or above this get a pause afterwards.
pub const THERMAL_PAUSE_MIN_SIZE: usize = 512;
pub const THERMAL_PAUSE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    pub sizes: Vec<usize>,
    pub run: RunConfig,
    pub blocked: BlockedConfig,
    pub memory_budget_mb: usize,
    pub thermal_pause_min_size: usize,
    pub thermal_pause: Duration,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sizes: MATRIX_SIZES.to_vec(),
            run: RunConfig {
                warmup_runs: WARMUP_RUNS,
                measured_runs: MEASURED_RUNS,
            },
            blocked: BlockedConfig {
                tile: DEFAULT_TILE,
                prefetch: false,
            },
            memory_budget_mb: MEMORY_BUDGET_MB,
            thermal_pause_min_size: THERMAL_PAUSE_MIN_SIZE,
            thermal_pause: THERMAL_PAUSE,
        }
    }
}

impl BenchConfig {
    /// Kernels in report order; the baseline comes first.
    pub fn kernels(&self) -> [Kernel; 3] {
        [Kernel::Naive, Kernel::Vectorized, Kernel::Blocked(self.blocked)]
    }

    /// Approximate MiB needed for the A, B, C triple at size `n`.
    pub fn memory_mb(n: usize) -> usize {
        3 * n * n * size_of::<f64>() / (1024 * 1024)
    }

    pub fn fits_memory_budget(&self, n: usize) -> bool {
        Self::memory_mb(n) <= self.memory_budget_mb
    }

    pub fn needs_thermal_pause(&self, n: usize) -> bool {
        n >= self.thermal_pause_min_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = BenchConfig::default();
        assert_eq!(cfg.run.warmup_runs, 1);
        assert_eq!(cfg.run.measured_runs, 5);
        assert_eq!(cfg.blocked.tile, 32);
        assert!(cfg.kernels()[0].is_baseline());
    }

    #[test]
    fn test_memory_budget() {
        let cfg = BenchConfig::default();
        assert_eq!(BenchConfig::memory_mb(1024), 24);
        assert!(cfg.fits_memory_budget(2048));
        // 3 * 16384^2 * 8 bytes = 6 GiB
        assert!(!cfg.fits_memory_budget(16384));
    }

    #[test]
    fn test_thermal_pause_threshold() {
        let cfg = BenchConfig::default();
        assert!(!cfg.needs_thermal_pause(256));
        assert!(cfg.needs_thermal_pause(512));
    }
}
