//! Per-coordinate GEMM in Rust.
//!
//! Computes `C = alpha * op(A) * op(B) + beta * C` the way a naive GPU
//! kernel does: one independent task per output element, each reading A, B
//! and its own element of C, each writing only that element. On the CPU the
//! tasks run on a rayon pool, split by output row so no two threads ever
//! write the same memory.
//!
//! ## Usage
//!
//! ```
//! use naive_gemm::{GemmParams, gemm};
//!
//! let a = vec![1.0f32, 2.0, 3.0, 4.0];
//! let b = vec![5.0f32, 6.0, 7.0, 8.0];
//! let mut c = vec![0.0f32; 4];
//!
//! let params = GemmParams::new(2, 2, 2).with_transpose(true, false);
//! gemm(&params, &a, &b, &mut c).unwrap();
//! assert_eq!(c, vec![26.0, 30.0, 38.0, 44.0]);
//! ```
//!
//! Checking the kernel end to end:
//!
//! ```
//! let report = naive_gemm::verify::run().unwrap();
//! println!("{report}");
//! assert!(report.verdict.is_pass());
//! ```
//!
//! ## What's inside
//!
//! - `kernels`: the one-element kernel with transpose-aware indexing
//! - `launch` / `threaded`: task grids, serial and parallel launch
//! - `verify`: the four-case 2×2 correctness check
//! - `external`: command lines of the out-of-crate sibling kernels

pub mod error;
pub mod external;
pub mod kernels;
pub mod launch;
pub mod matrix;
pub mod params;
pub mod threaded;
pub mod verify;

pub use error::{GemmError, Result};
pub use launch::Grid;
pub use matrix::Matrix;
pub use params::GemmParams;
pub use threaded::LaunchOptions;

/// `C = alpha * op(A) * op(B) + beta * C`, in place.
///
/// Launches one task per output element over rayon's global pool and
/// returns once all of them have finished.
///
/// # Errors
///
/// [`GemmError::DimensionMismatch`], [`GemmError::ZeroDimension`] or
/// [`GemmError::SizeOverflow`] if the buffers don't fit `params`; C is
/// untouched in that case.
pub fn gemm(params: &GemmParams, a: &[f32], b: &[f32], c: &mut [f32]) -> Result<()> {
    gemm_with(params, a, b, c, &LaunchOptions::default())
}

/// Same as [`gemm`] with explicit thread options.
pub fn gemm_with(
    params: &GemmParams,
    a: &[f32],
    b: &[f32],
    c: &mut [f32],
    options: &LaunchOptions,
) -> Result<()> {
    let grid = Grid::covering(params.m, params.n, launch::DEFAULT_BLOCK);
    threaded::launch_parallel(&grid, params, a, b, c, options)
}

/// Out-of-place form: `D = alpha * A * B + beta * C`, no transposes.
///
/// C is only read. D must be m × n and its previous contents are ignored.
///
/// ```
/// use naive_gemm::matmul_into;
///
/// let a = [1.0f32, 2.0, 3.0, 4.0];
/// let b = [5.0f32, 6.0, 7.0, 8.0];
/// let c = [1.0f32; 4];
/// let mut d = [f32::NAN; 4];
///
/// matmul_into(2, 2, 2, 2.0, &a, &b, 1.0, &c, &mut d).unwrap();
/// assert_eq!(d, [39.0, 45.0, 87.0, 101.0]);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn matmul_into(
    m: usize,
    n: usize,
    k: usize,
    alpha: f32,
    a: &[f32],
    b: &[f32],
    beta: f32,
    c: &[f32],
    d: &mut [f32],
) -> Result<()> {
    let params = GemmParams::new(m, n, k).with_scalars(alpha, beta);
    params.validate(a, b, c)?;
    // C passed validation, so c.len() == m * n without overflow.
    if d.len() != c.len() {
        return Err(GemmError::DimensionMismatch {
            operand: "D",
            expected: c.len(),
            actual: d.len(),
        });
    }
    d.copy_from_slice(c);
    gemm(&params, a, b, d)
}
