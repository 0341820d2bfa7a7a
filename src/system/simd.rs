//! SIMD capability descriptor.

use std::fmt;
use std::sync::OnceLock;

/// What the vector kernels are allowed to use.
///
/// Built once from runtime feature detection. The fields are private so a
/// descriptor can only ever be narrowed ([`scalar`](Self::scalar),
/// [`without_fma`](Self::without_fma)), never claim an instruction set the
/// CPU lacks. The kernels rely on that to call their `#[target_feature]`
/// paths soundly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimdCapabilities {
    avx: bool,
    avx2: bool,
    fma: bool,
}

static DETECTED: OnceLock<SimdCapabilities> = OnceLock::new();

impl SimdCapabilities {
    /// Capabilities of the running CPU, detected on first call and cached.
    pub fn detect() -> Self {
        *DETECTED.get_or_init(Self::query_cpu)
    }

    #[cfg(target_arch = "x86_64")]
    fn query_cpu() -> Self {
        let avx = is_x86_feature_detected!("avx");
        Self {
            avx,
            avx2: avx && is_x86_feature_detected!("avx2"),
            fma: avx && is_x86_feature_detected!("fma"),
        }
    }

    #[cfg(not(target_arch = "x86_64"))]
    fn query_cpu() -> Self {
        Self::scalar()
    }

    /// No vector instructions; every kernel takes its portable path.
    pub const fn scalar() -> Self {
        Self {
            avx: false,
            avx2: false,
            fma: false,
        }
    }

    /// Same capabilities with FMA disabled.
    pub const fn without_fma(self) -> Self {
        Self { fma: false, ..self }
    }

    /// 256-bit double-precision vectors are usable.
    #[inline]
    pub fn avx(&self) -> bool {
        self.avx
    }

    #[inline]
    pub fn avx2(&self) -> bool {
        self.avx2
    }

    /// Fused multiply-add is usable alongside AVX.
    #[inline]
    pub fn fma(&self) -> bool {
        self.fma
    }

    /// f64 lanes per vector register: 4 with AVX, 1 otherwise.
    pub fn vector_width(&self) -> usize {
        if self.avx { 4 } else { 1 }
    }
}

impl fmt::Display for SimdCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        write!(
            f,
            "AVX={}, AVX2={}, FMA={}, vector width={}",
            yes_no(self.avx),
            yes_no(self.avx2),
            yes_no(self.fma),
            self.vector_width()
        )
    }
}
