//! Aligned, owned N×N matrix storage.

use std::alloc::{self, Layout};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::ptr::NonNull;

use tracing::warn;

use crate::error::{BenchError, Result};

/// Byte alignment of every matrix buffer.
///
/// 32 would be enough for 256-bit loads; 64 also keeps each buffer on a
/// cache line boundary.
pub const MATRIX_ALIGN: usize = 64;

/// Dense square matrix of `f64`, row-major, 64-byte aligned.
///
/// Element `(i, j)` lives at flat index `i * n + j`, the same layout the
/// kernels stream through with SIMD loads. The buffer is freed on drop.
///
/// # Example
///
/// ```
/// use dgemm_bench::matrix::Matrix;
///
/// let mut m = Matrix::allocate(3).unwrap();
/// m.initialize();
/// assert_eq!(m[(0, 0)], 0.01);
/// assert_eq!(m.row(1), &[4.0 * 0.01, 5.0 * 0.01, 6.0 * 0.01]);
///
/// m.zero();
/// assert!(m.as_slice().iter().all(|&x| x == 0.0));
/// ```
pub struct Matrix {
    ptr: NonNull<f64>,
    n: usize,
    layout: Layout,
}

impl Matrix {
    /// Allocate an uninitialized-by-contract N×N matrix.
    ///
    /// The memory is zero-filled by the allocator so reading it before
    /// [`initialize`](Self::initialize) is still defined.
    pub fn allocate(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(BenchError::InvalidDimension { n });
        }
        let bytes = n
            .checked_mul(n)
            .and_then(|len| len.checked_mul(size_of::<f64>()))
            .ok_or(BenchError::LayoutOverflow { n })?;
        let layout = Layout::from_size_align(bytes, MATRIX_ALIGN)
            .map_err(|_| BenchError::LayoutOverflow { n })?;

        // SAFETY: layout has non-zero size (n > 0).
        let raw = unsafe { alloc::alloc_zeroed(layout) } as *mut f64;
        let ptr = NonNull::new(raw).ok_or(BenchError::Allocation { n, bytes })?;

        let matrix = Matrix { ptr, n, layout };
        if !matrix.is_aligned() {
            warn!(n, addr = ?matrix.ptr, "matrix buffer is not {MATRIX_ALIGN}-byte aligned");
        }
        Ok(matrix)
    }

    /// Allocate and fill with the deterministic benchmark pattern.
    pub fn allocate_initialized(n: usize) -> Result<Self> {
        let mut m = Self::allocate(n)?;
        m.initialize();
        Ok(m)
    }

    /// Fill with `((i % 100) + 1) * 0.01` over the flat index `i`.
    ///
    /// Not random: every kernel and every rerun sees identical inputs.
    pub fn initialize(&mut self) {
        for (i, x) in self.as_mut_slice().iter_mut().enumerate() {
            *x = ((i % 100) + 1) as f64 * 0.01;
        }
    }

    /// Set every element to exactly `0.0`.
    pub fn zero(&mut self) {
        self.as_mut_slice().fill(0.0);
    }

    /// Side length N.
    #[inline]
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Number of elements, N².
    #[inline]
    pub fn len(&self) -> usize {
        self.n * self.n
    }

    /// Always false; a matrix has at least one element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Size of the buffer in bytes.
    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.layout.size()
    }

    /// Whether the buffer start satisfies [`MATRIX_ALIGN`].
    pub fn is_aligned(&self) -> bool {
        (self.ptr.as_ptr() as usize) % MATRIX_ALIGN == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        // SAFETY: ptr is valid for len() initialized f64s for the lifetime of self.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len()) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        // SAFETY: as above, and &mut self guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len()) }
    }

    /// Row `i` as a contiguous slice of N elements.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.n;
        &self.as_slice()[i * n..(i + 1) * n]
    }

    /// Mutable row `i`.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        let n = self.n;
        &mut self.as_mut_slice()[i * n..(i + 1) * n]
    }

    /// Column `j`, copied out (columns are strided in row-major storage).
    pub fn column(&self, j: usize) -> Vec<f64> {
        assert!(j < self.n, "column {} out of range for {}x{}", j, self.n, self.n);
        self.as_slice().iter().skip(j).step_by(self.n).copied().collect()
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.as_slice().chunks_exact(self.n)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.row(i)[j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.row_mut(i)[j]
    }
}

impl Drop for Matrix {
    fn drop(&mut self) {
        // SAFETY: ptr was allocated with exactly this layout in `allocate`.
        unsafe { alloc::dealloc(self.ptr.as_ptr() as *mut u8, self.layout) }
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("n", &self.n)
            .field("bytes", &self.layout.size())
            .finish()
    }
}
