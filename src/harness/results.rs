//! Method × size result table.

use super::runner::RunStats;
use crate::kernels::Kernel;

/// What the report keeps from one (method, size) run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeResult {
    pub gflops: f64,
    pub mean_secs: f64,
    pub efficiency: f64,
}

impl SizeResult {
    /// Zero, negative or NaN throughput counts as "no result".
    pub fn is_valid(&self) -> bool {
        self.gflops > 0.0
    }
}

impl From<&RunStats> for SizeResult {
    fn from(stats: &RunStats) -> Self {
        Self {
            gflops: stats.mean_gflops,
            mean_secs: stats.mean_secs,
            efficiency: stats.efficiency,
        }
    }
}

/// Results for one kernel, one slot per benchmarked size.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodResult {
    pub kernel: Kernel,
    entries: Vec<Option<SizeResult>>,
}

impl MethodResult {
    pub fn name(&self) -> &'static str {
        self.kernel.name()
    }

    pub fn entry(&self, size_idx: usize) -> Option<&SizeResult> {
        self.entries.get(size_idx)?.as_ref()
    }

    fn valid_entries(&self) -> impl Iterator<Item = &SizeResult> {
        self.entries.iter().flatten().filter(|e| e.is_valid())
    }
}

/// Per-method summary over the sizes that produced a result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodSummary {
    pub max_gflops: f64,
    pub min_gflops: f64,
    pub mean_gflops: f64,
    pub mean_efficiency: f64,
    pub valid_sizes: usize,
}

/// Collects [`RunStats`] for every (kernel, size) pair and derives
/// speedups and summaries.
///
/// Sizes that were skipped, or whose throughput is zero, are left out of
/// every derived figure rather than counted as zero.
#[derive(Debug, Clone)]
pub struct ResultsAggregator {
    sizes: Vec<usize>,
    methods: Vec<MethodResult>,
}

impl ResultsAggregator {
    pub fn new(sizes: &[usize], kernels: &[Kernel]) -> Self {
        let methods = kernels
            .iter()
            .map(|&kernel| MethodResult {
                kernel,
                entries: vec![None; sizes.len()],
            })
            .collect();
        Self {
            sizes: sizes.to_vec(),
            methods,
        }
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn methods(&self) -> &[MethodResult] {
        &self.methods
    }

    pub fn size_index(&self, n: usize) -> Option<usize> {
        self.sizes.iter().position(|&s| s == n)
    }

    pub fn method_index(&self, kernel: &Kernel) -> Option<usize> {
        self.methods.iter().position(|m| m.kernel == *kernel)
    }

    /// Store the result of `kernel` at size `stats.n`.
    ///
    /// Returns false if the kernel or size is not part of this table.
    pub fn record(&mut self, kernel: &Kernel, stats: &RunStats) -> bool {
        let (Some(m), Some(s)) = (self.method_index(kernel), self.size_index(stats.n)) else {
            return false;
        };
        self.methods[m].entries[s] = Some(SizeResult::from(stats));
        true
    }

    pub fn get(&self, method_idx: usize, size_idx: usize) -> Option<&SizeResult> {
        self.methods.get(method_idx)?.entry(size_idx)
    }

    fn baseline_index(&self) -> Option<usize> {
        self.methods.iter().position(|m| m.kernel.is_baseline())
    }

    /// `gflops(method) / gflops(naive)` at one size.
    ///
    /// `None` if either side has no valid result or there is no naive
    /// method in the table.
    pub fn speedup(&self, method_idx: usize, size_idx: usize) -> Option<f64> {
        let base = self.get(self.baseline_index()?, size_idx).filter(|e| e.is_valid())?;
        let this = self.get(method_idx, size_idx).filter(|e| e.is_valid())?;
        Some(this.gflops / base.gflops)
    }

    /// Max, min and mean GFLOPS plus mean efficiency over valid sizes.
    pub fn summary(&self, method_idx: usize) -> Option<MethodSummary> {
        let method = self.methods.get(method_idx)?;
        let valid: Vec<&SizeResult> = method.valid_entries().collect();
        if valid.is_empty() {
            return None;
        }

        let count = valid.len() as f64;
        Some(MethodSummary {
            max_gflops: valid.iter().map(|e| e.gflops).fold(f64::MIN, f64::max),
            min_gflops: valid.iter().map(|e| e.gflops).fold(f64::MAX, f64::min),
            mean_gflops: valid.iter().map(|e| e.gflops).sum::<f64>() / count,
            mean_efficiency: valid.iter().map(|e| e.efficiency).sum::<f64>() / count,
            valid_sizes: valid.len(),
        })
    }
}
