//! DGEMM benchmark executable.

use std::process::ExitCode;

use dgemm_bench::config::BenchConfig;
use dgemm_bench::harness::timer::{Clock, MonotonicClock};
use dgemm_bench::report;
use dgemm_bench::suite::{Progress, Suite};
use dgemm_bench::system::{HostEnvironment, SystemProfile};
use tracing::error;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let wall = MonotonicClock::new();
    let env = HostEnvironment::new();
    let profile = SystemProfile::gather(&env);
    let config = BenchConfig::default();

    let suite = Suite::new(config, profile, MonotonicClock::new());
    let peak = suite.peak();

    report::print_header();
    report::print_system(&profile, &peak);
    report::print_config(suite.config());

    let results = suite.run(&env, |event| match event {
        Progress::SizeSkipped { n, memory_mb } => report::print_size_skipped(n, memory_mb),
        Progress::SizeStarted { n, memory_mb } => report::print_size_started(n, memory_mb),
        Progress::KernelStarted { kernel, .. } => report::print_kernel_started(&kernel),
        Progress::KernelFinished { stats, .. } => report::print_run_stats(stats, peak.gflops),
        Progress::Pausing { duration } => report::print_pause(duration.as_secs_f64()),
    });

    let results = match results {
        Ok(results) => results,
        Err(e) => {
            error!(error = %e, "aborting benchmark");
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    report::print_results(&results);
    report::print_footer(&peak, &profile, wall.now());
    ExitCode::SUCCESS
}
