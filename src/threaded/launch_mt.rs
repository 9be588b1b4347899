//! Multi-threaded launch over rayon.

use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::kernels::naive::{compute, compute_in_row};
use crate::launch::{Grid, check_launch};
use crate::params::GemmParams;

/// Below this many FLOPs the pool handoff costs more than the work.
pub const SINGLE_THREAD_THRESHOLD: f64 = 100_000_000.0;

/// How a parallel launch may use threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchOptions {
    /// `None` runs on rayon's global pool. `Some(t)` builds a dedicated
    /// pool of at most `t` threads for this launch.
    pub threads: Option<usize>,
    /// Problems with fewer FLOPs than this run on the calling thread.
    pub min_parallel_flops: f64,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            threads: None,
            min_parallel_flops: SINGLE_THREAD_THRESHOLD,
        }
    }
}

impl LaunchOptions {
    pub fn with_threads(threads: usize) -> Self {
        Self {
            threads: Some(threads),
            ..Self::default()
        }
    }

    /// Go parallel regardless of problem size.
    pub fn always_parallel(mut self) -> Self {
        self.min_parallel_flops = 0.0;
        self
    }
}

/// Run every task of `grid` across a thread pool and wait for all of them.
///
/// C is split into one slice per output row, so each element has exactly
/// one writer and no locking is needed. A and B are shared read-only. Grid
/// rows past `m` own no slice and do nothing; grid columns past `n` are
/// skipped by the kernel.
///
/// Thread count adapts to problem size:
/// - below `min_parallel_flops`: the calling thread only
/// - otherwise: up to the requested threads, never more than `m`
///
/// # Errors
///
/// Same validation as [`crate::launch::launch`], plus
/// [`GemmError::ThreadPool`](crate::GemmError::ThreadPool) when a dedicated
/// pool cannot be built.
pub fn launch_parallel(
    grid: &Grid,
    params: &GemmParams,
    a: &[f32],
    b: &[f32],
    c: &mut [f32],
    options: &LaunchOptions,
) -> Result<()> {
    check_launch(grid, params, a, b, c)?;

    let max_threads = options.threads.unwrap_or_else(rayon::current_num_threads);
    let effective_threads = choose_thread_count(params, max_threads, options.min_parallel_flops);

    debug!(
        m = params.m,
        n = params.n,
        k = params.k,
        transpose_a = params.transpose_a,
        transpose_b = params.transpose_b,
        tasks = grid.task_count(),
        threads = effective_threads,
        "parallel launch"
    );

    if effective_threads == 1 {
        for (row, col) in grid.tasks() {
            compute(row, col, params, a, b, c);
        }
        return Ok(());
    }

    let grid_cols = grid.cols();
    let run = |c: &mut [f32]| {
        c.par_chunks_mut(params.n)
            .enumerate()
            .for_each(|(row, c_row)| {
                for col in 0..grid_cols {
                    compute_in_row(row, col, params, a, b, c_row);
                }
            });
    };

    match options.threads {
        Some(_) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(effective_threads)
                .build()?;
            pool.install(|| run(c));
        }
        None => run(c),
    }
    Ok(())
}

fn choose_thread_count(params: &GemmParams, max_threads: usize, min_parallel_flops: f64) -> usize {
    if params.flops() < min_parallel_flops {
        return 1;
    }
    max_threads.min(params.m).max(1)
}
