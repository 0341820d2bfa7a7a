//! The benchmarked GEMM kernels.
//!
//! Three variants, each a step up from the last:
//! - [`Kernel::Naive`]: scalar i-k-j loops
//! - [`Kernel::Vectorized`]: same loops, 4-wide AVX inner loop
//! - [`Kernel::Blocked`]: L1-sized tiles, 8-wide unrolled FMA, optional prefetch
//!
//! All of them compute C += A * B on square row-major matrices and all of
//! them have a portable scalar path for CPUs without AVX.

pub mod axpy;
pub mod vectorized;

use std::fmt;

use crate::blocked::{BlockedConfig, dgemm_blocked};
use crate::matrix::Matrix;
use crate::matrix::naive_ikj::dgemm_naive;
use crate::system::SimdCapabilities;

pub use vectorized::dgemm_vectorized;

/// One GEMM implementation under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    Naive,
    Vectorized,
    Blocked(BlockedConfig),
}

impl Kernel {
    /// Label used in the report.
    pub fn name(&self) -> &'static str {
        match self {
            Kernel::Naive => "Naive (IKJ)",
            Kernel::Vectorized => "AVX (Pure)",
            Kernel::Blocked(cfg) if cfg.prefetch => "AVX+Block+Prefetch",
            Kernel::Blocked(_) => "AVX+Blocking+Unroll",
        }
    }

    /// The scalar baseline everything else is compared against.
    pub fn is_baseline(&self) -> bool {
        matches!(self, Kernel::Naive)
    }

    /// C += A * B.
    ///
    /// # Panics
    ///
    /// Panics if the three matrices don't share one dimension.
    ///
    /// # Example
    ///
    /// ```
    /// use dgemm_bench::kernels::Kernel;
    /// use dgemm_bench::matrix::Matrix;
    /// use dgemm_bench::system::SimdCapabilities;
    ///
    /// let a = Matrix::allocate_initialized(8).unwrap();
    /// let b = Matrix::allocate_initialized(8).unwrap();
    /// let mut c = Matrix::allocate(8).unwrap();
    ///
    /// Kernel::Vectorized.run(SimdCapabilities::detect(), &a, &b, &mut c);
    /// assert!(c[(0, 0)] > 0.0);
    /// ```
    pub fn run(&self, caps: SimdCapabilities, a: &Matrix, b: &Matrix, c: &mut Matrix) {
        let n = a.dim();
        assert_eq!(b.dim(), n, "B: expected {}x{}, got {}x{}", n, n, b.dim(), b.dim());
        assert_eq!(c.dim(), n, "C: expected {}x{}, got {}x{}", n, n, c.dim(), c.dim());

        match *self {
            Kernel::Naive => dgemm_naive(a, b, c),
            Kernel::Vectorized => dgemm_vectorized(caps, a, b, c),
            Kernel::Blocked(config) => dgemm_blocked(caps, config, a, b, c),
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
