//! Measurement harness: timing, repetition, statistics, comparison.

pub mod peak;
pub mod results;
pub mod runner;
pub mod timer;

pub use peak::{PeakEstimate, estimate_peak_gflops};
pub use results::{MethodResult, MethodSummary, ResultsAggregator, SizeResult};
pub use runner::{BenchmarkRunner, BenchmarkSample, RunConfig, RunStats, flop_count, gflops};
pub use timer::{Clock, MonotonicClock, SteppingClock, Stopwatch, time_secs};
