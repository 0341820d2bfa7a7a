//! Row update microkernels: `y[j] += alpha * x[j]`.
//!
//! Every GEMM variant in this crate reduces to this operation in its
//! innermost loop: alpha is the broadcast `A[i][k]`, x is (a segment of) row
//! k of B and y is the matching segment of row i of C. The variants only
//! differ in how many lanes they process per step.

/// f64 lanes in one 256-bit register.
pub const LANES: usize = 4;

/// How far ahead of the current position the prefetch hint reaches, in
/// elements (two cache lines).
pub const PREFETCH_DISTANCE: usize = 16;

/// Portable fallback: 4-element groups then a scalar tail.
///
/// Same grouping as the AVX paths, written so the compiler can vectorize
/// it for whatever the target supports.
#[inline]
pub fn axpy_portable(alpha: f64, x: &[f64], y: &mut [f64]) {
    debug_assert_eq!(x.len(), y.len());

    let mut y_chunks = y.chunks_exact_mut(LANES);
    let mut x_chunks = x.chunks_exact(LANES);
    for (y4, x4) in (&mut y_chunks).zip(&mut x_chunks) {
        for (yj, &xj) in y4.iter_mut().zip(x4) {
            *yj += alpha * xj;
        }
    }
    for (yj, &xj) in y_chunks.into_remainder().iter_mut().zip(x_chunks.remainder()) {
        *yj += alpha * xj;
    }
}

/// AVX: one 4-wide multiply and add per step, scalar tail.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx")]
#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn axpy_avx(alpha: f64, x: &[f64], y: &mut [f64], prefetch: bool) {
    use std::arch::x86_64::*;

    debug_assert_eq!(x.len(), y.len());
    let len = x.len().min(y.len());
    let xp = x.as_ptr();
    let yp = y.as_mut_ptr();
    let a_vec = _mm256_set1_pd(alpha);

    let mut j = 0;
    while j + LANES <= len {
        if prefetch {
            _mm_prefetch::<_MM_HINT_T0>(xp.wrapping_add(j + PREFETCH_DISTANCE) as *const i8);
        }
        let c_vec = _mm256_loadu_pd(yp.add(j));
        let b_vec = _mm256_loadu_pd(xp.add(j));
        _mm256_storeu_pd(yp.add(j), _mm256_add_pd(c_vec, _mm256_mul_pd(a_vec, b_vec)));
        j += LANES;
    }
    while j < len {
        *yp.add(j) += alpha * *xp.add(j);
        j += 1;
    }
}

/// AVX+FMA, unrolled: two 4-wide FMAs (8 elements) per step, then one
/// 4-wide FMA, then a scalar tail.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX and FMA.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx,fma")]
#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn axpy_avx_fma_unrolled(alpha: f64, x: &[f64], y: &mut [f64], prefetch: bool) {
    use std::arch::x86_64::*;

    debug_assert_eq!(x.len(), y.len());
    let len = x.len().min(y.len());
    let xp = x.as_ptr();
    let yp = y.as_mut_ptr();
    let a_vec = _mm256_set1_pd(alpha);

    let mut j = 0;
    while j + 2 * LANES <= len {
        if prefetch {
            _mm_prefetch::<_MM_HINT_T0>(xp.wrapping_add(j + PREFETCH_DISTANCE) as *const i8);
        }
        let c0 = _mm256_loadu_pd(yp.add(j));
        let b0 = _mm256_loadu_pd(xp.add(j));
        _mm256_storeu_pd(yp.add(j), _mm256_fmadd_pd(a_vec, b0, c0));

        let c1 = _mm256_loadu_pd(yp.add(j + LANES));
        let b1 = _mm256_loadu_pd(xp.add(j + LANES));
        _mm256_storeu_pd(yp.add(j + LANES), _mm256_fmadd_pd(a_vec, b1, c1));

        j += 2 * LANES;
    }
    while j + LANES <= len {
        let c_vec = _mm256_loadu_pd(yp.add(j));
        let b_vec = _mm256_loadu_pd(xp.add(j));
        _mm256_storeu_pd(yp.add(j), _mm256_fmadd_pd(a_vec, b_vec, c_vec));
        j += LANES;
    }
    while j < len {
        *yp.add(j) += alpha * *xp.add(j);
        j += 1;
    }
}
