//! Kernel launchers.
//!
//! A launch validates the operands once, runs the kernel for every task of a
//! grid and returns only when all of them are done. Returning is the join
//! point: once a launch function returns, C is fully written.
//!
//! - [`launch`]: every grid task on the calling thread, row-major order
//! - [`launch_ordered`]: caller-chosen task order
//! - [`crate::threaded::launch_parallel`]: the same grid spread over rayon

pub mod grid;

pub use grid::{DEFAULT_BLOCK, Grid};

use tracing::debug;

use crate::error::{GemmError, Result};
use crate::kernels::naive::compute;
use crate::params::GemmParams;

/// Run the kernel for every task of `grid` on the calling thread.
///
/// # Errors
///
/// Fails before touching C if a buffer length disagrees with `params` or if
/// `grid` does not cover the `m × n` output.
pub fn launch(
    grid: &Grid,
    params: &GemmParams,
    a: &[f32],
    b: &[f32],
    c: &mut [f32],
) -> Result<()> {
    check_launch(grid, params, a, b, c)?;
    debug!(
        m = params.m,
        n = params.n,
        k = params.k,
        transpose_a = params.transpose_a,
        transpose_b = params.transpose_b,
        tasks = grid.task_count(),
        "serial launch"
    );
    for (row, col) in grid.tasks() {
        compute(row, col, params, a, b, c);
    }
    Ok(())
}

/// Run the kernel once per `(row, col)` yielded by `tasks`, in that order.
///
/// Coordinates outside the output are skipped by the kernel. Nothing checks
/// that `tasks` covers the whole output; that is up to the caller.
pub fn launch_ordered<I>(
    tasks: I,
    params: &GemmParams,
    a: &[f32],
    b: &[f32],
    c: &mut [f32],
) -> Result<()>
where
    I: IntoIterator<Item = (usize, usize)>,
{
    params.validate(a, b, c)?;
    for (row, col) in tasks {
        compute(row, col, params, a, b, c);
    }
    Ok(())
}

pub(crate) fn check_launch(
    grid: &Grid,
    params: &GemmParams,
    a: &[f32],
    b: &[f32],
    c: &[f32],
) -> Result<()> {
    params.validate(a, b, c)?;
    if !grid.covers(params.m, params.n) {
        return Err(GemmError::GridTooSmall {
            rows: grid.rows(),
            cols: grid.cols(),
            m: params.m,
            n: params.n,
        });
    }
    Ok(())
}
