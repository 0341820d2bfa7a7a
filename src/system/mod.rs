//! Host introspection and the side effects the benchmark needs from the OS.
//!
//! The harness never touches the host directly. It goes through
//! [`SystemInfoProvider`] for core count, clock frequency and SIMD support,
//! and [`Environment`] for the thermal pause between large sizes, so tests
//! can swap in a fixed profile.

pub mod host;
pub mod simd;

use std::time::Duration;

pub use host::{
    FALLBACK_FREQUENCY_GHZ, HostEnvironment, frequency_or_fallback, parse_cpuinfo_frequency_ghz,
};
pub use simd::SimdCapabilities;

/// Read-only facts about the machine.
pub trait SystemInfoProvider {
    /// Logical cores available to the process.
    fn core_count(&self) -> usize;

    /// Current clock frequency in GHz. Never fails: implementations return
    /// a fallback value when the frequency cannot be read.
    fn clock_frequency_ghz(&self) -> f64;

    /// Vector instruction support, resolved once per process.
    fn simd_capabilities(&self) -> SimdCapabilities;
}

/// [`SystemInfoProvider`] plus the real-time side effects.
pub trait Environment: SystemInfoProvider {
    /// Block the current thread for `duration`.
    fn pause(&self, duration: Duration);
}

/// Snapshot of the machine taken at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemProfile {
    pub core_count: usize,
    pub frequency_ghz: f64,
    pub simd: SimdCapabilities,
}

impl SystemProfile {
    pub fn gather<P: SystemInfoProvider + ?Sized>(provider: &P) -> Self {
        Self {
            core_count: provider.core_count(),
            frequency_ghz: provider.clock_frequency_ghz(),
            simd: provider.simd_capabilities(),
        }
    }
}

/// Fixed answers and a no-op pause. Useful anywhere the real host must
/// not leak into the result, e.g. tests.
#[derive(Debug, Clone)]
pub struct FixedEnvironment {
    pub profile: SystemProfile,
    pauses: std::cell::RefCell<Vec<Duration>>,
}

impl FixedEnvironment {
    pub fn new(core_count: usize, frequency_ghz: f64, simd: SimdCapabilities) -> Self {
        Self {
            profile: SystemProfile {
                core_count,
                frequency_ghz,
                simd,
            },
            pauses: Default::default(),
        }
    }

    /// Pauses requested so far, in order.
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.borrow().clone()
    }
}

impl SystemInfoProvider for FixedEnvironment {
    fn core_count(&self) -> usize {
        self.profile.core_count
    }

    fn clock_frequency_ghz(&self) -> f64 {
        self.profile.frequency_ghz
    }

    fn simd_capabilities(&self) -> SimdCapabilities {
        self.profile.simd
    }
}

impl Environment for FixedEnvironment {
    fn pause(&self, duration: Duration) {
        self.pauses.borrow_mut().push(duration);
    }
}
