//! Error type for the benchmark library.

use thiserror::Error;

/// Everything that can go wrong outside the kernels themselves.
///
/// All variants come from matrix allocation. The executable treats any of
/// them as fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BenchError {
    /// Matrix dimension must be at least 1.
    #[error("invalid matrix dimension {n}: must be greater than zero")]
    InvalidDimension { n: usize },

    /// `n * n * size_of::<f64>()` does not fit a valid allocation layout.
    #[error("matrix of dimension {n} overflows the addressable size")]
    LayoutOverflow { n: usize },

    /// The allocator returned null.
    #[error("failed to allocate {n}x{n} matrix ({bytes} bytes)")]
    Allocation { n: usize, bytes: usize },
}

pub type Result<T> = std::result::Result<T, BenchError>;
