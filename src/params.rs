//! GEMM launch parameters and operand validation.

use crate::error::{GemmError, Result};

/// Parameters of one `C = alpha * op(A) * op(B) + beta * C` invocation.
///
/// Stored operand shapes follow the transpose flags:
///
/// | operand | flag off | flag on |
/// |---------|----------|---------|
/// | A       | m × k    | k × m   |
/// | B       | k × n    | n × k   |
/// | C       | m × n    | m × n   |
///
/// The flags change how a buffer is read, never how it is stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GemmParams {
    pub m: usize,
    pub n: usize,
    pub k: usize,
    pub alpha: f32,
    pub beta: f32,
    pub transpose_a: bool,
    pub transpose_b: bool,
}

impl GemmParams {
    /// Plain product: alpha = 1, beta = 0, no transposes.
    pub fn new(m: usize, n: usize, k: usize) -> Self {
        Self {
            m,
            n,
            k,
            alpha: 1.0,
            beta: 0.0,
            transpose_a: false,
            transpose_b: false,
        }
    }

    pub fn with_scalars(mut self, alpha: f32, beta: f32) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    pub fn with_transpose(mut self, transpose_a: bool, transpose_b: bool) -> Self {
        self.transpose_a = transpose_a;
        self.transpose_b = transpose_b;
        self
    }

    /// Stored (rows, cols) of A.
    pub fn a_shape(&self) -> (usize, usize) {
        if self.transpose_a {
            (self.k, self.m)
        } else {
            (self.m, self.k)
        }
    }

    /// Stored (rows, cols) of B.
    pub fn b_shape(&self) -> (usize, usize) {
        if self.transpose_b {
            (self.n, self.k)
        } else {
            (self.k, self.n)
        }
    }

    pub fn c_shape(&self) -> (usize, usize) {
        (self.m, self.n)
    }

    /// Floating point operations of one invocation, counting a multiply-add
    /// as two.
    pub fn flops(&self) -> f64 {
        2.0 * self.m as f64 * self.n as f64 * self.k as f64
    }

    /// Check buffer lengths against the declared shapes.
    ///
    /// Runs before any task is launched so a bad call never leaves C
    /// partially written.
    pub fn validate(&self, a: &[f32], b: &[f32], c: &[f32]) -> Result<()> {
        if self.m == 0 || self.n == 0 || self.k == 0 {
            return Err(GemmError::ZeroDimension {
                m: self.m,
                n: self.n,
                k: self.k,
            });
        }
        check_len("A", self.a_shape(), a.len())?;
        check_len("B", self.b_shape(), b.len())?;
        check_len("C", self.c_shape(), c.len())?;
        Ok(())
    }
}

fn check_len(operand: &'static str, (rows, cols): (usize, usize), actual: usize) -> Result<()> {
    let expected = rows.checked_mul(cols).ok_or(GemmError::SizeOverflow {
        operand,
        rows,
        cols,
    })?;
    if actual != expected {
        return Err(GemmError::DimensionMismatch {
            operand,
            expected,
            actual,
        });
    }
    Ok(())
}
