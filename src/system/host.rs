//! The real machine.

use std::time::Duration;

use tracing::info;

use super::{Environment, SimdCapabilities, SystemInfoProvider};

/// Used whenever the clock frequency cannot be read.
pub const FALLBACK_FREQUENCY_GHZ: f64 = 2.5;

const CPUINFO_PATH: &str = "/proc/cpuinfo";

/// Talks to the OS: `num_cpus` for cores, `/proc/cpuinfo` for frequency,
/// `std::thread::sleep` for pauses.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostEnvironment;

impl HostEnvironment {
    pub fn new() -> Self {
        HostEnvironment
    }
}

impl SystemInfoProvider for HostEnvironment {
    fn core_count(&self) -> usize {
        num_cpus::get().max(1)
    }

    fn clock_frequency_ghz(&self) -> f64 {
        let parsed = std::fs::read_to_string(CPUINFO_PATH)
            .ok()
            .and_then(|text| parse_cpuinfo_frequency_ghz(&text));
        frequency_or_fallback(parsed)
    }

    fn simd_capabilities(&self) -> SimdCapabilities {
        SimdCapabilities::detect()
    }
}

impl Environment for HostEnvironment {
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// The parsed frequency, or [`FALLBACK_FREQUENCY_GHZ`] with an info line.
pub fn frequency_or_fallback(parsed: Option<f64>) -> f64 {
    match parsed {
        Some(ghz) => ghz,
        None => {
            info!(
                fallback_ghz = FALLBACK_FREQUENCY_GHZ,
                "could not read CPU frequency from {CPUINFO_PATH}, using fallback"
            );
            FALLBACK_FREQUENCY_GHZ
        }
    }
}

/// Pull a clock frequency in GHz out of `/proc/cpuinfo` text.
///
/// Takes whichever comes first: a `cpu MHz : 2400.000` line, or a
/// `model name` line ending in `@ 3.00GHz`. Values under 100 are read as
/// GHz, anything else as MHz. Returns `None` when neither line yields a
/// positive number.
///
/// ```
/// use dgemm_bench::system::parse_cpuinfo_frequency_ghz;
///
/// assert_eq!(parse_cpuinfo_frequency_ghz("cpu MHz\t\t: 3200.000\n"), Some(3.2));
/// assert_eq!(parse_cpuinfo_frequency_ghz("flags : fpu\n"), None);
/// ```
pub fn parse_cpuinfo_frequency_ghz(text: &str) -> Option<f64> {
    let raw = text.lines().find_map(|line| {
        if line.starts_with("cpu MHz") {
            Some(line.split(':').nth(1)?.trim().parse::<f64>().ok())
        } else if line.starts_with("model name") {
            line.contains("GHz").then(|| model_name_ghz(line))
        } else {
            None
        }
    })??;

    if !raw.is_finite() || raw <= 0.0 {
        return None;
    }
    let mhz = if raw < 100.0 { raw * 1000.0 } else { raw };
    Some(mhz / 1000.0)
}

/// `"Intel(R) Core(TM) i7 CPU @ 2.80GHz"` -> 2.8, also `"@ 2.80 GHz"`.
fn model_name_ghz(line: &str) -> Option<f64> {
    let before = line[..line.find("GHz")?].trim_end();
    let start = before
        .char_indices()
        .rev()
        .find(|&(_, ch)| !(ch.is_ascii_digit() || ch == '.'))
        .map_or(0, |(idx, ch)| idx + ch.len_utf8());
    before[start..].parse().ok()
}
