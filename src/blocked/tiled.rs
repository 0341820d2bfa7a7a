//! Cache-blocked, unrolled SIMD GEMM.

use std::ops::Range;

use crate::kernels::axpy::axpy_portable;
use crate::matrix::Matrix;
use crate::system::SimdCapabilities;

/// Default tile edge. Three 32×32 f64 tiles are 24 KiB, which fits a
/// typical 32 KiB L1 data cache.
pub const DEFAULT_TILE: usize = 32;

/// Tuning knobs for [`dgemm_blocked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockedConfig {
    /// Edge length of the cubic i/k/j tiles. Zero is treated as one.
    pub tile: usize,
    /// Issue a software prefetch for B ahead of the vector loop.
    pub prefetch: bool,
}

impl Default for BlockedConfig {
    fn default() -> Self {
        Self {
            tile: DEFAULT_TILE,
            prefetch: false,
        }
    }
}

impl BlockedConfig {
    pub fn with_tile(tile: usize) -> Self {
        Self {
            tile,
            ..Self::default()
        }
    }

    pub fn with_prefetch(self, prefetch: bool) -> Self {
        Self { prefetch, ..self }
    }
}

/// Split `0..n` into consecutive ranges of `tile` elements, the last one
/// clamped to `n`.
///
/// ```
/// use dgemm_bench::blocked::tiled::tile_ranges;
///
/// let tiles: Vec<_> = tile_ranges(10, 4).collect();
/// assert_eq!(tiles, vec![0..4, 4..8, 8..10]);
///
/// // A tile larger than the matrix yields one clamped range.
/// assert_eq!(tile_ranges(3, 32).collect::<Vec<_>>(), vec![0..3]);
/// ```
pub fn tile_ranges(n: usize, tile: usize) -> impl Iterator<Item = Range<usize>> {
    let tile = tile.max(1);
    (0..n).step_by(tile).map(move |start| start..(start + tile).min(n))
}

/// Blocked GEMM: C += A * B over cubic tiles, i-k-j order both across and
/// within tiles.
///
/// Within a tile, each (i, k) pair updates `C[i][jb]` from `B[k][jb]`:
/// - with FMA: 8 columns per step (two FMAs), then 4, then scalar
/// - with AVX only: 4 columns per step (multiply + add), then scalar
/// - otherwise: the portable 4-element grouping
///
/// Blocking changes the order partial sums are added in, so results match
/// the naive kernel only up to rounding.
pub fn dgemm_blocked(
    caps: SimdCapabilities,
    config: BlockedConfig,
    a: &Matrix,
    b: &Matrix,
    c: &mut Matrix,
) {
    #[cfg(target_arch = "x86_64")]
    {
        if caps.fma() {
            // SAFETY: SimdCapabilities only reports FMA when the CPU has AVX and FMA.
            unsafe { blocked_avx_fma(config, a, b, c) };
            return;
        }
        if caps.avx() {
            // SAFETY: as above for AVX.
            unsafe { blocked_avx(config, a, b, c) };
            return;
        }
    }

    #[cfg(not(target_arch = "x86_64"))]
    let _ = caps;
    let n = a.dim();
    for ib in tile_ranges(n, config.tile) {
        for kb in tile_ranges(n, config.tile) {
            for jb in tile_ranges(n, config.tile) {
                for i in ib.clone() {
                    let c_seg = &mut c.row_mut(i)[jb.clone()];
                    for k in kb.clone() {
                        axpy_portable(a[(i, k)], &b.row(k)[jb.clone()], c_seg);
                    }
                }
            }
        }
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx,fma")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn blocked_avx_fma(config: BlockedConfig, a: &Matrix, b: &Matrix, c: &mut Matrix) {
    use crate::kernels::axpy::axpy_avx_fma_unrolled;

    let n = a.dim();
    for ib in tile_ranges(n, config.tile) {
        for kb in tile_ranges(n, config.tile) {
            for jb in tile_ranges(n, config.tile) {
                for i in ib.clone() {
                    let c_seg = &mut c.row_mut(i)[jb.clone()];
                    for k in kb.clone() {
                        axpy_avx_fma_unrolled(
                            a[(i, k)],
                            &b.row(k)[jb.clone()],
                            c_seg,
                            config.prefetch,
                        );
                    }
                }
            }
        }
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn blocked_avx(config: BlockedConfig, a: &Matrix, b: &Matrix, c: &mut Matrix) {
    use crate::kernels::axpy::axpy_avx;

    let n = a.dim();
    for ib in tile_ranges(n, config.tile) {
        for kb in tile_ranges(n, config.tile) {
            for jb in tile_ranges(n, config.tile) {
                for i in ib.clone() {
                    let c_seg = &mut c.row_mut(i)[jb.clone()];
                    for k in kb.clone() {
                        axpy_avx(a[(i, k)], &b.row(k)[jb.clone()], c_seg, config.prefetch);
                    }
                }
            }
        }
    }
}
