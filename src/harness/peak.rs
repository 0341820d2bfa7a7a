//! Theoretical peak estimate.

use crate::system::SystemProfile;

/// FLOPs per core per cycle assumed by the estimate: 4 f64 lanes × 2 ops
/// per FMA, counted twice for multiply and add.
pub const FLOPS_PER_CYCLE: f64 = 8.0 * 2.0;

/// `frequency × cores × 16`.
///
/// This is a heuristic, not a measured ceiling. It ignores turbo, the
/// number of FMA ports and memory bandwidth, so measured efficiency can land
/// above 100%.
///
/// ```
/// use dgemm_bench::harness::peak::estimate_peak_gflops;
///
/// assert_eq!(estimate_peak_gflops(3.0, 8), 384.0);
/// ```
pub fn estimate_peak_gflops(frequency_ghz: f64, core_count: usize) -> f64 {
    frequency_ghz * core_count as f64 * FLOPS_PER_CYCLE
}

/// Peak GFLOPS for a machine, computed once and reused for every
/// efficiency figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakEstimate {
    pub frequency_ghz: f64,
    pub core_count: usize,
    pub gflops: f64,
}

impl PeakEstimate {
    pub fn from_profile(profile: &SystemProfile) -> Self {
        Self {
            frequency_ghz: profile.frequency_ghz,
            core_count: profile.core_count,
            gflops: estimate_peak_gflops(profile.frequency_ghz, profile.core_count),
        }
    }
}
