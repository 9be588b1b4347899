//! Error type shared by the kernel launcher, the matrix helpers and the
//! external sibling runner.

use thiserror::Error;

/// Everything that can go wrong before, around or outside a kernel launch.
///
/// Numeric divergence is deliberately absent: a verification run that misses
/// the tolerance is reported as [`crate::verify::Verdict::Fail`], not raised.
#[derive(Error, Debug)]
pub enum GemmError {
    #[error("{operand}: expected {expected} elements, got {actual}")]
    DimensionMismatch {
        operand: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{operand}: {rows}x{cols} elements overflow usize")]
    SizeOverflow {
        operand: &'static str,
        rows: usize,
        cols: usize,
    },

    #[error("dimensions must be positive, got m={m} n={n} k={k}")]
    ZeroDimension { m: usize, n: usize, k: usize },

    #[error("matrix {rows}x{cols} needs {expected} elements, got {len}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        len: usize,
    },

    #[error("launch grid {rows}x{cols} does not cover a {m}x{n} output")]
    GridTooSmall {
        rows: usize,
        cols: usize,
        m: usize,
        n: usize,
    },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {}", describe_exit(.code))]
    ExternalFailure { program: String, code: Option<i32> },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("code {c}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, GemmError>;
