//! Matrix storage and the scalar multiplication routines.
//!
//! [`Matrix`] is the aligned buffer every kernel works on. The two scalar
//! routines are the benchmark baseline (i-k-j) and an i-j-k reference used
//! to check results.

pub mod buffer;
pub mod naive_ijk;
pub mod naive_ikj;

pub use buffer::{MATRIX_ALIGN, Matrix};
