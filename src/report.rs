//! Text report on stdout.

use crate::config::BenchConfig;
use crate::harness::peak::PeakEstimate;
use crate::harness::results::ResultsAggregator;
use crate::harness::runner::RunStats;
use crate::kernels::Kernel;
use crate::system::SystemProfile;

const WIDTH: usize = 90;
const CELL: usize = 24;

fn rule(ch: char) -> String {
    ch.to_string().repeat(WIDTH)
}

fn banner(title: &str) {
    println!("\n{}", rule('='));
    println!("{}", title);
    println!("{}", rule('='));
}

fn size_label(n: usize) -> String {
    format!("{}×{}", n, n)
}

pub fn print_header() {
    println!("{}", rule('='));
    println!("DGEMM Benchmark: naive vs AVX vs AVX+blocking");
    println!("{}", rule('='));
}

pub fn print_system(profile: &SystemProfile, peak: &PeakEstimate) {
    println!("\n=== System ===");
    println!("Logical cores:     {}", profile.core_count);
    println!("Clock frequency:   {:.2} GHz", profile.frequency_ghz);
    println!("SIMD:              {}", profile.simd);
    println!("\nEstimated peak:    {:.0} GFLOPS", peak.gflops);
    println!(
        "(≈ {:.2} GHz × {} cores × 16 FLOPs/cycle; a heuristic, not a measured limit)",
        peak.frequency_ghz, peak.core_count
    );
}

pub fn print_config(config: &BenchConfig) {
    let sizes: Vec<String> = config.sizes.iter().map(|n| n.to_string()).collect();
    println!("\n=== Configuration ===");
    println!("Sizes:             {}", sizes.join(", "));
    println!("Tile size:         {} (L1)", config.blocked.tile);
    println!("Prefetch:          {}", if config.blocked.prefetch { "on" } else { "off" });
    println!("Measured runs:     {}", config.run.measured_runs);
    println!("Warm-up runs:      {}", config.run.warmup_runs);
}

pub fn print_size_skipped(n: usize, memory_mb: usize) {
    println!(
        "\nSkipping {} (needs ~{} MB, over budget)",
        size_label(n),
        memory_mb
    );
}

pub fn print_size_started(n: usize, memory_mb: usize) {
    println!("\n{}", rule('-'));
    println!("Matrix {} (~{} MB)", size_label(n), memory_mb);
    println!("{}", rule('-'));
}

pub fn print_kernel_started(kernel: &Kernel) {
    println!("\n--- {} ---", kernel);
}

/// Per-run lines followed by the averaged result.
pub fn print_run_stats(stats: &RunStats, peak_gflops: f64) {
    for (i, s) in stats.samples.iter().enumerate() {
        println!(
            "  Run {}: {:.4} s ({:.2} GFLOPS)",
            i + 1,
            s.elapsed_secs,
            s.gflops
        );
    }
    println!("  Mean time:    {:.4} s", stats.mean_secs);
    println!("  Mean GFLOPS:  {:.2}", stats.mean_gflops);
    if let Some(var) = stats.variation_percent() {
        println!("  Variation:    ±{:.1}%", var);
    }
    if peak_gflops > 0.0 {
        println!("  Efficiency:   {:.1}% of estimated peak", stats.efficiency);
    }
    println!("  Operations:   {:.0} FLOPs", stats.flop_count());
}

pub fn print_pause(secs: f64) {
    println!("\n[Pausing {:.0}s for thermal stabilization]", secs);
}

fn print_table<F>(title: &str, results: &ResultsAggregator, method_ids: &[usize], cell: F)
where
    F: Fn(usize, usize) -> Option<String>,
{
    banner(title);
    print!("{:<12}", "Size");
    for &m in method_ids {
        print!(" {:>CELL$}", results.methods()[m].name());
    }
    println!();
    println!("{}", rule('-'));
    for (s, &n) in results.sizes().iter().enumerate() {
        print!("{:<12}", size_label(n));
        for &m in method_ids {
            let text = cell(m, s).unwrap_or_else(|| "N/A".to_string());
            print!(" {:>CELL$}", text);
        }
        println!();
    }
}

pub fn print_results(results: &ResultsAggregator) {
    let all: Vec<usize> = (0..results.methods().len()).collect();
    let non_baseline: Vec<usize> = all
        .iter()
        .copied()
        .filter(|&m| !results.methods()[m].kernel.is_baseline())
        .collect();

    print_table("RESULTS (GFLOPS, % of peak)", results, &all, |m, s| {
        results
            .get(m, s)
            .filter(|e| e.is_valid())
            .map(|e| format!("{:.2} GF ({:.1}%)", e.gflops, e.efficiency))
    });

    print_table("MEAN TIME (seconds)", results, &all, |m, s| {
        results
            .get(m, s)
            .filter(|e| e.mean_secs > 0.0)
            .map(|e| format!("{:.4} s", e.mean_secs))
    });

    print_table("SPEEDUP (vs naive)", results, &non_baseline, |m, s| {
        results.speedup(m, s).map(|x| format!("{:.2}×", x))
    });

    banner("SUMMARY");
    for (m, method) in results.methods().iter().enumerate() {
        println!("\n{}:", method.name());
        match results.summary(m) {
            Some(sum) => {
                println!("  Max:             {:.2} GFLOPS", sum.max_gflops);
                println!("  Min:             {:.2} GFLOPS", sum.min_gflops);
                println!("  Mean:            {:.2} GFLOPS", sum.mean_gflops);
                println!("  Mean efficiency: {:.1}% of estimated peak", sum.mean_efficiency);
            }
            None => println!("  no results"),
        }
    }
}

pub fn print_footer(peak: &PeakEstimate, profile: &SystemProfile, total_secs: f64) {
    banner("RUN INFO");
    println!("Total benchmark time: {:.1} s", total_secs);
    println!("Estimated peak:       {:.0} GFLOPS", peak.gflops);
    println!("Kernel paths:         {}", profile.simd);

    println!("\nReading the numbers:");
    println!("1. Small matrices (<256): fit in L1/L2, vectorization dominates");
    println!("2. Medium (256-1024): L3 matters, blocking starts to pay off");
    println!("3. Large (>1024): memory bound, access pattern is everything");
    println!("\nEfficiency = achieved GFLOPS / estimated peak GFLOPS × 100%\n");
}
