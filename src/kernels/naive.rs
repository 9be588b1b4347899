//! One-output-element GEMM kernel.

use crate::params::GemmParams;

/// Compute `C[row, col] = alpha * (op(A) · op(B))[row, col] + beta * C[row, col]`.
///
/// This is the whole kernel: one call per output coordinate, in any order or
/// in parallel. It reads A, B and `C[row, col]` and writes only
/// `C[row, col]`. Coordinates outside `[0, m) × [0, n)` are ignored, so a
/// launch grid may cover more tasks than there are elements.
///
/// Buffer lengths are not checked here; the launcher validates them once
/// before the first task.
///
/// # Arguments
///
/// * `row` - Output row, in `[0, m)` to have any effect
/// * `col` - Output column, in `[0, n)` to have any effect
/// * `a` - A stored as m × k, or k × m when `transpose_a` is set
/// * `b` - B stored as k × n, or n × k when `transpose_b` is set
/// * `c` - C, m × n, row-major
#[inline]
pub fn compute(row: usize, col: usize, params: &GemmParams, a: &[f32], b: &[f32], c: &mut [f32]) {
    if row >= params.m || col >= params.n {
        return;
    }
    let idx = row * params.n + col;
    c[idx] = write_back(params, dot(row, col, params, a, b), c[idx]);
}

/// Same as [`compute`], but `c_row` is row `row` of C on its own (n elements).
///
/// Used when C has been split into per-row slices for parallel execution.
#[inline]
pub fn compute_in_row(
    row: usize,
    col: usize,
    params: &GemmParams,
    a: &[f32],
    b: &[f32],
    c_row: &mut [f32],
) {
    if row >= params.m || col >= params.n {
        return;
    }
    c_row[col] = write_back(params, dot(row, col, params, a, b), c_row[col]);
}

/// Contraction over `q in 0..k` with the transpose-aware indexing.
///
/// Accumulates in f32, left to right, so every execution order of the
/// surrounding tasks yields bit-identical results.
#[inline]
fn dot(row: usize, col: usize, params: &GemmParams, a: &[f32], b: &[f32]) -> f32 {
    let GemmParams { m, n, k, .. } = *params;
    let mut sum = 0.0f32;
    for q in 0..k {
        let a_val = if params.transpose_a {
            a[q * m + row]
        } else {
            a[row * k + q]
        };
        let b_val = if params.transpose_b {
            b[col * k + q]
        } else {
            b[q * n + col]
        };
        sum += a_val * b_val;
    }
    sum
}

#[inline]
fn write_back(params: &GemmParams, sum: f32, previous: f32) -> f32 {
    params.alpha * sum + params.beta * previous
}
