//! SIMD GEMM without blocking.

use super::axpy::axpy_portable;
use crate::matrix::Matrix;
use crate::system::SimdCapabilities;

/// i-k-j GEMM with a 4-wide vector inner loop.
///
/// Broadcasts `A[i][k]` into a 256-bit register and streams rows of B and
/// C through it four doubles at a time; the last `N % 4` columns are done
/// one by one. No cache blocking, so large matrices still spill out of
/// cache; this variant shows what data-level parallelism alone buys.
///
/// Falls back to [`axpy_portable`] rows when `caps` has no AVX.
pub fn dgemm_vectorized(caps: SimdCapabilities, a: &Matrix, b: &Matrix, c: &mut Matrix) {
    #[cfg(target_arch = "x86_64")]
    {
        if caps.avx() {
            // SAFETY: SimdCapabilities only reports AVX when the CPU has it.
            unsafe { vectorized_avx(a, b, c) };
            return;
        }
    }

    #[cfg(not(target_arch = "x86_64"))]
    let _ = caps;
    let n = a.dim();
    for i in 0..n {
        let c_row = c.row_mut(i);
        for (k, &a_ik) in a.row(i).iter().enumerate() {
            axpy_portable(a_ik, b.row(k), c_row);
        }
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn vectorized_avx(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    use super::axpy::axpy_avx;

    let n = a.dim();
    for i in 0..n {
        let c_row = c.row_mut(i);
        for (k, &a_ik) in a.row(i).iter().enumerate() {
            axpy_avx(a_ik, b.row(k), c_row, false);
        }
    }
}
