//! Monotonic timing.

use std::cell::Cell;
use std::time::Instant;

/// A monotonic time source in fractional seconds.
///
/// Only differences between two readings mean anything.
pub trait Clock {
    fn now(&self) -> f64;
}

/// `std::time::Instant`: monotonic, unaffected by wall-clock changes,
/// nanosecond resolution on the platforms we care about.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Fake clock that moves forward by a fixed step on every reading.
///
/// A start/stop pair around one kernel call therefore measures exactly
/// `step` seconds.
#[derive(Debug, Clone)]
pub struct SteppingClock {
    now: Cell<f64>,
    step: f64,
}

impl SteppingClock {
    pub fn new(step: f64) -> Self {
        Self {
            now: Cell::new(0.0),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> f64 {
        let t = self.now.get() + self.step;
        self.now.set(t);
        t
    }
}

/// Measures one interval against a [`Clock`].
pub struct Stopwatch<'c, C: Clock + ?Sized> {
    clock: &'c C,
    start: f64,
}

impl<'c, C: Clock + ?Sized> Stopwatch<'c, C> {
    pub fn start(clock: &'c C) -> Self {
        let start = clock.now();
        Self { clock, start }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.clock.now() - self.start
    }
}

/// Time a single call.
pub fn time_secs<C: Clock + ?Sized>(clock: &C, f: impl FnOnce()) -> f64 {
    let watch = Stopwatch::start(clock);
    f();
    watch.elapsed_secs()
}
