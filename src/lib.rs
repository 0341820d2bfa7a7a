//! DGEMM micro-benchmark, built from scratch.
//!
//! Three kernels for C += A * B on square f64 matrices, each one step
//! further along the usual optimization path:
//!
//! 1. scalar i-k-j loops (the baseline)
//! 2. the same loops with a 4-wide AVX inner loop
//! 3. L1-sized tiles, an 8-wide unrolled FMA inner loop and optional prefetch
//!
//! plus the harness that times them: warm-up, repeated measured runs,
//! mean/min/max, GFLOPS, and efficiency against a rough peak estimate.
//!
//! ## Usage
//!
//! ```
//! use dgemm_bench::harness::{BenchmarkRunner, RunConfig};
//! use dgemm_bench::kernels::Kernel;
//! use dgemm_bench::matrix::Matrix;
//! use dgemm_bench::system::SimdCapabilities;
//!
//! let a = Matrix::allocate_initialized(64).unwrap();
//! let b = Matrix::allocate_initialized(64).unwrap();
//! let mut c = Matrix::allocate(64).unwrap();
//!
//! let caps = SimdCapabilities::detect();
//! let runner = BenchmarkRunner::new(RunConfig::default(), 384.0);
//! let stats = runner.run(&a, &b, &mut c, |a, b, c| Kernel::Vectorized.run(caps, a, b, c));
//! assert_eq!(stats.samples.len(), 5);
//! ```
//!
//! ## What's inside
//!
//! - 64-byte aligned matrix buffer with a deterministic fill
//! - AVX and AVX+FMA row kernels with a portable fallback
//! - Cache blocking tuned for L1
//! - Host frequency/core detection behind a trait, so the harness can run
//!   against a fixed profile

pub mod blocked;
pub mod config;
pub mod error;
pub mod harness;
pub mod kernels;
pub mod matrix;
pub mod report;
pub mod suite;
pub mod system;

pub use error::{BenchError, Result};
pub use kernels::Kernel;
pub use matrix::Matrix;
