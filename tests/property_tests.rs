//! Property-based tests for the per-coordinate kernel.
//!
//! Covers execution-order independence, beta-only updates, out-of-bounds
//! tasks and agreement with the reference product on random shapes.

use naive_gemm::GemmParams;
use naive_gemm::launch::{DEFAULT_BLOCK, Grid, launch, launch_ordered};
use naive_gemm::matrix::reference::gemm_reference;
use naive_gemm::threaded::{LaunchOptions, launch_parallel};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────────

/// Small GEMM problem with random flags and scalars plus matching operands.
fn arb_problem() -> impl Strategy<Value = (GemmParams, Vec<f32>, Vec<f32>, Vec<f32>)> {
    (1usize..=9, 1usize..=9, 1usize..=9, any::<bool>(), any::<bool>())
        .prop_flat_map(|(m, n, k, ta, tb)| {
            (
                Just(GemmParams::new(m, n, k).with_transpose(ta, tb)),
                -2.0f32..2.0,
                -2.0f32..2.0,
                prop::collection::vec(-10.0f32..10.0, m * k),
                prop::collection::vec(-10.0f32..10.0, k * n),
                prop::collection::vec(-10.0f32..10.0, m * n),
            )
        })
        .prop_map(|(p, alpha, beta, a, b, c)| (p.with_scalars(alpha, beta), a, b, c))
}

/// A problem plus a shuffled order of its output coordinates.
fn arb_problem_with_order()
-> impl Strategy<Value = ((GemmParams, Vec<f32>, Vec<f32>, Vec<f32>), Vec<(usize, usize)>)> {
    arb_problem().prop_flat_map(|problem| {
        let (m, n) = (problem.0.m, problem.0.n);
        let coords: Vec<(usize, usize)> =
            (0..m).flat_map(|r| (0..n).map(move |c| (r, c))).collect();
        (Just(problem), Just(coords).prop_shuffle())
    })
}

// ── Property tests ───────────────────────────────────────────────────────────

proptest! {
    /// Any permutation of the task order gives bit-identical output.
    #[test]
    fn task_order_does_not_matter(((params, a, b, c0), order) in arb_problem_with_order()) {
        let grid = Grid::exact(params.m, params.n);

        let mut c_in_order = c0.clone();
        launch(&grid, &params, &a, &b, &mut c_in_order).unwrap();

        let mut c_shuffled = c0.clone();
        launch_ordered(order, &params, &a, &b, &mut c_shuffled).unwrap();

        prop_assert_eq!(c_in_order, c_shuffled);
    }

    /// With alpha = 0 the result is beta * C, whatever A and B hold.
    #[test]
    fn alpha_zero_only_scales_c((params, a, b, c0) in arb_problem(), beta in -4.0f32..4.0) {
        prop_assume!(beta != 0.0);
        let params = params.with_scalars(0.0, beta);

        let mut c = c0.clone();
        launch_ordered(Grid::exact(params.m, params.n).tasks(), &params, &a, &b, &mut c).unwrap();

        for (got, before) in c.iter().zip(&c0) {
            prop_assert_eq!(*got, beta * before);
        }
    }

    /// A grid wider and taller than C never writes past C.
    #[test]
    fn oversized_grid_stays_in_bounds(
        (params, a, b, c0) in arb_problem(),
        block in (1usize..=8, 1usize..=8),
        pad in 1usize..16,
    ) {
        let grid = Grid::covering(params.m, params.n, block);
        let mut backing = c0.clone();
        backing.extend(std::iter::repeat_n(f32::MAX, pad));

        let (c, tail) = backing.split_at_mut(c0.len());
        launch(&grid, &params, &a, &b, c).unwrap();

        prop_assert!(tail.iter().all(|&v| v == f32::MAX));
    }

    /// Kernel agrees with the materialise-then-multiply reference.
    #[test]
    fn matches_reference((params, a, b, c0) in arb_problem()) {
        let mut c_ref = c0.clone();
        gemm_reference(&params, &a, &b, &mut c_ref);

        let mut c = c0.clone();
        let grid = Grid::covering(params.m, params.n, DEFAULT_BLOCK);
        launch(&grid, &params, &a, &b, &mut c).unwrap();

        for (x, y) in c.iter().zip(&c_ref) {
            prop_assert!((x - y).abs() <= 1e-3 * (1.0 + y.abs()), "{} vs {}", x, y);
        }
    }

    /// Parallel launch reproduces the serial result exactly.
    #[test]
    fn parallel_equals_serial((params, a, b, c0) in arb_problem(), threads in 1usize..=4) {
        let grid = Grid::covering(params.m, params.n, DEFAULT_BLOCK);

        let mut c_serial = c0.clone();
        launch(&grid, &params, &a, &b, &mut c_serial).unwrap();

        let mut c_parallel = c0.clone();
        let options = LaunchOptions::with_threads(threads).always_parallel();
        launch_parallel(&grid, &params, &a, &b, &mut c_parallel, &options).unwrap();

        prop_assert_eq!(c_serial, c_parallel);
    }
}
