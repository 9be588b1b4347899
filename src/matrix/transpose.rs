/// Return `src^T` as a new row-major buffer.
///
/// `src` is `rows × cols`; the result is `cols × rows`, so element `(r, c)`
/// of `src` lands at `(c, r)`. The kernel reads transposed operands by
/// reindexing instead; only the reference product materialises them.
///
/// ```
/// use naive_gemm::matrix::transpose::transposed;
///
/// let src = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]; // 2×3
/// assert_eq!(transposed(&src, 2, 3), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
/// ```
pub fn transposed(src: &[f32], rows: usize, cols: usize) -> Vec<f32> {
    debug_assert_eq!(src.len(), rows * cols);
    (0..cols)
        .flat_map(|c| src[c..].iter().step_by(cols).take(rows).copied())
        .collect()
}
