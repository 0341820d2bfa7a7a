//! Cache-blocked GEMM.
//!
//! Splits the i, k and j loops into cubic tiles small enough that the A, B
//! and C pieces a tile touches stay in L1 while it runs, then applies the
//! unrolled SIMD row update inside each tile.

pub mod tiled;

pub use tiled::{BlockedConfig, DEFAULT_TILE, dgemm_blocked, tile_ranges};
