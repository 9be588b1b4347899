//! Owned row-major matrix.

use std::fmt;

use crate::error::{GemmError, Result};

/// A flat row-major buffer of `f32` plus its dimensions.
///
/// `data.len() == rows * cols` always holds; every constructor checks it.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// Wrap an existing row-major buffer.
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        let expected = rows.checked_mul(cols).ok_or(GemmError::SizeOverflow {
            operand: "matrix",
            rows,
            cols,
        })?;
        if data.len() != expected {
            return Err(GemmError::ShapeMismatch {
                rows,
                cols,
                expected,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build from nested rows. All rows must have the same length.
    ///
    /// ```
    /// use naive_gemm::Matrix;
    ///
    /// let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// assert_eq!(a.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    /// ```
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            data.extend_from_slice(row.as_ref());
        }
        Self::new(rows.len(), cols, data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Largest `|self - other|` over all elements.
    ///
    /// Returns `None` when the shapes differ. A NaN on either side makes the
    /// result NaN, so a poisoned output can never look like a match.
    pub fn max_abs_diff(&self, other: &Matrix) -> Option<f32> {
        if self.rows != other.rows || self.cols != other.cols {
            return None;
        }
        Some(max_abs_diff(&self.data, &other.data))
    }
}

/// `max |a[i] - b[i]|` over the common prefix of two slices.
pub fn max_abs_diff(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).fold(0.0f32, |acc, (x, y)| {
        let d = (x - y).abs();
        if d.is_nan() || acc.is_nan() {
            f32::NAN
        } else {
            acc.max(d)
        }
    })
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            let row = &self.data[r * self.cols..(r + 1) * self.cols];
            write!(f, "[")?;
            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{v:8.3}")?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        let err = Matrix::new(2, 3, vec![0.0; 5]).unwrap_err();
        assert!(matches!(
            err,
            GemmError::ShapeMismatch {
                expected: 6,
                len: 5,
                ..
            }
        ));
    }

    #[test]
    fn overflowing_shape_is_rejected() {
        let err = Matrix::new(usize::MAX, 2, vec![]).unwrap_err();
        assert!(matches!(err, GemmError::SizeOverflow { operand: "matrix", .. }));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows: Vec<Vec<f32>> = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(Matrix::from_rows(&rows[..]).is_err());
    }

    #[test]
    fn max_abs_diff_propagates_nan() {
        let a = Matrix::from_rows(&[[1.0, f32::NAN]]).unwrap();
        let b = Matrix::from_rows(&[[1.0, 2.0]]).unwrap();
        assert!(a.max_abs_diff(&b).unwrap().is_nan());
    }

    #[test]
    fn max_abs_diff_needs_same_shape() {
        let a = Matrix::zeros(2, 2);
        let b = Matrix::zeros(1, 4);
        assert_eq!(a.max_abs_diff(&b), None);
    }
}
