use dgemm_bench::blocked::{BlockedConfig, dgemm_blocked, tile_ranges};
use dgemm_bench::harness::{RunStats, gflops};
use dgemm_bench::kernels::dgemm_vectorized;
use dgemm_bench::matrix::Matrix;
use dgemm_bench::matrix::naive_ikj::dgemm_naive;
use dgemm_bench::system::SimdCapabilities;
use proptest::prelude::*;

fn filled(n: usize, values: &[f64]) -> Matrix {
    let mut m = Matrix::allocate(n).unwrap();
    for (x, &v) in m.as_mut_slice().iter_mut().zip(values.iter().cycle()) {
        *x = v;
    }
    m
}

fn close(expected: &Matrix, actual: &Matrix) -> bool {
    expected
        .as_slice()
        .iter()
        .zip(actual.as_slice())
        .all(|(&e, &a)| (e - a).abs() <= 1e-9 * e.abs().max(a.abs()).max(1.0))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Tiles cover 0..n exactly once, in order, none longer than `tile`.
    #[test]
    fn tiles_partition_range(n in 0usize..300, tile in 1usize..80) {
        let tiles: Vec<_> = tile_ranges(n, tile).collect();
        let mut next = 0;
        for t in &tiles {
            prop_assert_eq!(t.start, next);
            prop_assert!(t.end > t.start);
            prop_assert!(t.end - t.start <= tile);
            next = t.end;
        }
        prop_assert_eq!(next, n);
    }

    #[test]
    fn vectorized_matches_naive_on_random_input(
        n in 1usize..24,
        values in prop::collection::vec(-10.0f64..10.0, 1..64),
    ) {
        let a = filled(n, &values);
        let b = filled(n, &values[values.len() / 2..]);

        let mut expected = Matrix::allocate(n).unwrap();
        dgemm_naive(&a, &b, &mut expected);

        let mut c = Matrix::allocate(n).unwrap();
        dgemm_vectorized(SimdCapabilities::detect(), &a, &b, &mut c);
        prop_assert!(close(&expected, &c));
    }

    #[test]
    fn blocked_matches_naive_on_random_input(
        n in 1usize..40,
        tile in 1usize..48,
        prefetch in any::<bool>(),
        values in prop::collection::vec(-10.0f64..10.0, 1..64),
    ) {
        let a = filled(n, &values);
        let b = filled(n, &values[values.len() / 2..]);

        let mut expected = Matrix::allocate(n).unwrap();
        dgemm_naive(&a, &b, &mut expected);

        let mut c = Matrix::allocate(n).unwrap();
        dgemm_blocked(SimdCapabilities::detect(), BlockedConfig { tile, prefetch }, &a, &b, &mut c);
        // Cancellation in mixed-sign sums can leave large relative error on
        // near-zero entries, so compare against the magnitude of the inputs.
        let bound = 1e-9 * (n as f64) * 100.0;
        for (&e, &g) in expected.as_slice().iter().zip(c.as_slice()) {
            prop_assert!((e - g).abs() <= bound, "expected {} got {}", e, g);
        }
    }

    #[test]
    fn stats_bounds(times in prop::collection::vec(1e-6f64..10.0, 1..12)) {
        let stats = RunStats::from_elapsed(64, &times, 100.0);
        prop_assert!(stats.min_secs <= stats.mean_secs * (1.0 + 1e-12));
        prop_assert!(stats.mean_secs <= stats.max_secs * (1.0 + 1e-12));
        prop_assert!(stats.mean_gflops >= gflops(64, stats.max_secs) * (1.0 - 1e-12));
        prop_assert!(stats.mean_gflops <= gflops(64, stats.min_secs) * (1.0 + 1e-12));
        if let Some(var) = stats.variation_percent() {
            prop_assert!(var > 0.0);
        }
    }
}
